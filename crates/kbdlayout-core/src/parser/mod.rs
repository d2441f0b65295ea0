//! Layout document parsing.
//!
//! [`parse_layout`] is the single entry point of the crate: source bytes in,
//! a validated and merged [`KeyLayout`] (or a typed failure) out.

pub mod builder;
pub mod deadkeys;

use crate::domain::layout::KeyLayout;
use crate::error::LayoutError;
use crate::trace::{NoTrace, TraceSink};
use crate::xml::Element;

/// Parses a layout document without tracing.
///
/// # Errors
///
/// Returns the first [`LayoutError`] found; no partial layout is produced.
pub fn parse_layout(source: &[u8]) -> Result<KeyLayout, LayoutError> {
    parse_layout_with_trace(source, &mut NoTrace)
}

/// Parses a layout document, reporting every validated element to `trace`.
///
/// # Errors
///
/// Returns the first [`LayoutError`] found; no partial layout is produced.
pub fn parse_layout_with_trace(
    source: &[u8],
    trace: &mut dyn TraceSink,
) -> Result<KeyLayout, LayoutError> {
    let root = Element::parse_document(source)?;
    builder::build_layout(&root, trace)
}

/// Code point of a one-character text, 0 for empty or longer text.
pub(crate) fn codepoint_of(text: &str) -> u32 {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => u32::from(c),
        _ => 0,
    }
}
