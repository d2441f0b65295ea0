//! Strict attribute extraction shared by every element parser.
//!
//! An [`ElementSchema`] lists the tag name and the attributes an element may
//! carry, each flagged mandatory or optional.  [`ElementSchema::extract`]
//! refuses anything else: a different tag, an attribute outside the list, or
//! a missing mandatory attribute.  No field of the source data is ever
//! ignored or defaulted silently.

use crate::error::SchemaError;
use crate::trace::TraceSink;
use crate::xml::element::Element;

/// One expected attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub mandatory: bool,
}

/// A mandatory attribute.
pub const fn required(name: &'static str) -> AttributeSpec {
    AttributeSpec {
        name,
        mandatory: true,
    }
}

/// An attribute that may be absent.
pub const fn optional(name: &'static str) -> AttributeSpec {
    AttributeSpec {
        name,
        mandatory: false,
    }
}

/// Tag name and attribute list of one element kind.
#[derive(Debug, Clone, Copy)]
pub struct ElementSchema<const N: usize> {
    pub tag: &'static str,
    pub attributes: [AttributeSpec; N],
}

impl<const N: usize> ElementSchema<N> {
    pub const fn new(tag: &'static str, attributes: [AttributeSpec; N]) -> Self {
        Self { tag, attributes }
    }

    /// Validates `element` and returns its attribute values in schema order.
    ///
    /// The element name and the resolved values (absent optional ones
    /// included) are reported to `trace`.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::TagMismatch`] if the tag is not [`ElementSchema::tag`].
    /// - [`SchemaError::UnknownAttribute`] for any attribute outside the schema.
    /// - [`SchemaError::MissingAttribute`] if a mandatory attribute is absent.
    pub fn extract<'e>(
        &self,
        element: &'e Element,
        trace: &mut dyn TraceSink,
    ) -> Result<Attributes<'e, N>, SchemaError> {
        if element.tag != self.tag {
            return Err(SchemaError::TagMismatch {
                expected: self.tag,
                found: element.tag.clone(),
            });
        }

        let mut values: [Option<&'e str>; N] = [None; N];
        for (name, value) in &element.attributes {
            let index = self
                .attributes
                .iter()
                .position(|spec| spec.name == name)
                .ok_or_else(|| SchemaError::UnknownAttribute {
                    tag: element.tag.clone(),
                    attribute: name.clone(),
                })?;
            values[index] = Some(value.as_str());
        }

        for (spec, value) in self.attributes.iter().zip(&values) {
            if spec.mandatory && value.is_none() {
                return Err(SchemaError::MissingAttribute {
                    tag: self.tag,
                    attribute: spec.name,
                });
            }
        }

        let resolved: Vec<(&str, Option<&str>)> = self
            .attributes
            .iter()
            .zip(values)
            .map(|(spec, value)| (spec.name, value))
            .collect();
        trace.record(self.tag, &resolved);

        Ok(Attributes {
            tag: self.tag,
            specs: self.attributes,
            values,
        })
    }
}

/// Attribute values of a validated element.
#[derive(Debug, Clone, Copy)]
pub struct Attributes<'e, const N: usize> {
    tag: &'static str,
    specs: [AttributeSpec; N],
    values: [Option<&'e str>; N],
}

impl<'e, const N: usize> Attributes<'e, N> {
    /// Value of an optional attribute.
    pub fn optional(&self, name: &str) -> Option<&'e str> {
        self.specs
            .iter()
            .position(|spec| spec.name == name)
            .and_then(|index| self.values[index])
    }

    /// Value of a mandatory attribute.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingAttribute`] if the value is absent, which
    /// [`ElementSchema::extract`] already rules out for mandatory attributes.
    pub fn required(&self, name: &'static str) -> Result<&'e str, SchemaError> {
        self.optional(name).ok_or(SchemaError::MissingAttribute {
            tag: self.tag,
            attribute: name,
        })
    }

    /// All values in schema order.
    pub fn values(&self) -> [Option<&'e str>; N] {
        self.values
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
