//! Layout model types.
//!
//! Everything here is plain data with no knowledge of the XML source format:
//! the parser in [`crate::parser`] fills these types, [`crate::merge`]
//! completes the modifier states, and downstream code only reads them.

pub mod deadkey;
pub mod keymap;
pub mod layout;
pub mod modifier;
pub mod scancode;
