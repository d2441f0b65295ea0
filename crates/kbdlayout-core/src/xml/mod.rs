//! XML reading and strict per-element attribute validation.

pub mod element;
pub mod schema;

pub use element::Element;
pub use schema::{optional, required, AttributeSpec, Attributes, ElementSchema};
