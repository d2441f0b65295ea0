//! Minimal element tree read from layout source bytes.
//!
//! Layout documents only carry information in element names, attributes and
//! nesting, so text content, comments and processing instructions are
//! dropped while reading.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::LayoutError;

/// Deepest element nesting accepted by [`Element::parse_document`].
///
/// Layout documents need eight levels for a double dead key; every stage
/// after reading walks the tree recursively, so depth must stay bounded.
pub const MAX_DEPTH: usize = 64;

/// An XML element with its attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    /// Value of attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Reads `source` and returns its root element.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Xml`] when the bytes are not well-formed XML,
    /// contain no element, contain more than one root element, nest elements
    /// deeper than [`MAX_DEPTH`], or end inside an open element.
    pub fn parse_document(source: &[u8]) -> Result<Element, LayoutError> {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut buf = Vec::new();

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| xml_error(position, e))?;

            match event {
                Event::Start(ref start) => {
                    check_depth(stack.len(), position)?;
                    stack.push(open_element(&reader, start, position)?);
                }
                Event::Empty(ref start) => {
                    check_depth(stack.len(), position)?;
                    let element = open_element(&reader, start, position)?;
                    attach(&mut stack, &mut root, element, position)?;
                }
                Event::End(_) => {
                    // quick-xml already checked that the end tag matches.
                    let element = stack.pop().ok_or_else(|| LayoutError::Xml {
                        position,
                        message: "unexpected end tag".to_string(),
                    })?;
                    attach(&mut stack, &mut root, element, position)?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(LayoutError::Xml {
                position: reader.buffer_position(),
                message: format!("element <{}> is never closed", open.tag),
            });
        }

        root.ok_or_else(|| LayoutError::Xml {
            position: reader.buffer_position(),
            message: "document has no root element".to_string(),
        })
    }
}

fn open_element(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    position: usize,
) -> Result<Element, LayoutError> {
    let tag = reader
        .decoder()
        .decode(start.name().as_ref())
        .map_err(|e| xml_error(position, e))?
        .into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error(position, e))?;
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_err(|e| xml_error(position, e))?
            .into_owned();
        let value = attr
            .decode_and_unescape_value(reader)
            .map_err(|e| xml_error(position, e))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        tag,
        attributes,
        children: Vec::new(),
    })
}

/// Hands a completed element to its parent, or makes it the root.
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: usize,
) -> Result<(), LayoutError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(LayoutError::Xml {
                position,
                message: format!("second root element <{}>", element.tag),
            })
        }
    }
    Ok(())
}

/// Fails if an element opened below `open` ancestors exceeds [`MAX_DEPTH`].
fn check_depth(open: usize, position: usize) -> Result<(), LayoutError> {
    if open >= MAX_DEPTH {
        return Err(LayoutError::Xml {
            position,
            message: format!("elements nested deeper than {MAX_DEPTH} levels"),
        });
    }
    Ok(())
}

fn xml_error(position: usize, error: impl std::fmt::Display) -> LayoutError {
    LayoutError::Xml {
        position,
        message: error.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
