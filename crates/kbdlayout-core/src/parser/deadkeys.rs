//! Dead-key table resolution.
//!
//! ```text
//! <DeadKeyTable Accent="´" Name="ACUTE">
//!   <Result Text="á" With="a"/>
//!   <Result With="¨">                       <!-- double dead key -->
//!     <DeadKeyTable Accent="¨">
//!       <Result Text="ǘ" With="u"/>
//!     </DeadKeyTable>
//!   </Result>
//! </DeadKeyTable>
//! ```

use crate::domain::deadkey::{DeadKey, DeadKeyResult, DeadKeyTable};
use crate::error::{InvariantViolation, LayoutError};
use crate::parser::codepoint_of;
use crate::trace::TraceSink;
use crate::xml::{optional, required, Element, ElementSchema};

const DEAD_KEY_TABLE: ElementSchema<2> =
    ElementSchema::new("DeadKeyTable", [required("Accent"), optional("Name")]);

const DEAD_KEY_RESULT: ElementSchema<2> =
    ElementSchema::new("Result", [optional("Text"), required("With")]);

/// Reads `element` into `deadkeys` and returns the table's accent.
///
/// A result with a `Text` attribute is a final composition (an empty text
/// stands for "no output").  A result without one must contain exactly one
/// nested `DeadKeyTable`, which is resolved recursively into a double dead
/// key.
///
/// # Errors
///
/// - [`LayoutError::Schema`] for any element that does not match its schema.
/// - [`InvariantViolation::InvalidAccent`] if the accent is not one character.
/// - [`InvariantViolation::DeadKeyChildCount`] if a text-less result does not
///   hold exactly one nested table.
/// - [`InvariantViolation::UnexpectedChildren`] if a result has both text and
///   nested elements.
/// - [`InvariantViolation::DuplicateDeadKey`] for a repeated `With`.
/// - [`InvariantViolation::EmptyDeadKeyTable`] if no entry was produced.
pub fn resolve_dead_keys(
    element: &Element,
    deadkeys: &mut DeadKeyTable,
    trace: &mut dyn TraceSink,
) -> Result<String, LayoutError> {
    let attrs = DEAD_KEY_TABLE.extract(element, trace)?;
    let accent = attrs.required("Accent")?;
    if accent.chars().count() != 1 {
        return Err(InvariantViolation::InvalidAccent(accent.to_string()).into());
    }

    for result in &element.children {
        let attrs = DEAD_KEY_RESULT.extract(result, trace)?;
        let with = attrs.required("With")?;

        let outcome = match attrs.optional("Text") {
            Some(text) => {
                if !result.children.is_empty() {
                    return Err(InvariantViolation::UnexpectedChildren {
                        tag: result.tag.clone(),
                    }
                    .into());
                }
                DeadKeyResult::Literal {
                    text: text.to_string(),
                    codepoint: codepoint_of(text),
                }
            }
            None => {
                let [table] = result.children.as_slice() else {
                    return Err(InvariantViolation::DeadKeyChildCount {
                        found: result.children.len(),
                    }
                    .into());
                };
                let mut nested = DeadKeyTable::new();
                resolve_dead_keys(table, &mut nested, trace)?;
                DeadKeyResult::Composite(nested)
            }
        };

        deadkeys
            .insert(DeadKey {
                accent: accent.to_string(),
                with: with.to_string(),
                result: outcome,
            })
            .map_err(|dk| InvariantViolation::DuplicateDeadKey {
                accent: dk.accent,
                with: dk.with,
            })?;
    }

    if deadkeys.is_empty() {
        return Err(InvariantViolation::EmptyDeadKeyTable(accent.to_string()).into());
    }

    Ok(accent.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
