//! # kbdlayout-core
//!
//! Strict parser for vendor XML keyboard-layout descriptions.
//!
//! A layout document lists every physical key of a keyboard together with
//! the text it produces under each modifier combination, including dead keys
//! that compose with the next keystroke.  This crate turns such a document
//! into an immutable [`KeyLayout`] and refuses anything it does not fully
//! understand: unknown attributes, duplicate keys, malformed scancodes and
//! inconsistent modifier states all abort the parse with a typed error.
//!
//! # Architecture overview
//!
//! - **`xml`** – Reads the document into an element tree and validates each
//!   element against a fixed attribute schema.
//!
//! - **`parser`** – Walks the element tree.  The builder fills one 256-slot
//!   keymap per modifier state, and the dead-key resolver reads the
//!   (possibly nested) dead-key tables.
//!
//! - **`merge`** – Synthesizes the CapsLock+NumLock states and folds NumLock
//!   keymaps into their base states once every key is known.
//!
//! - **`domain`** – The resulting model: scancodes, modifier states, keys,
//!   keymaps, dead keys and the layout itself.
//!
//! - **`trace`** – Optional per-element trace of what the validator saw.
//!
//! ```no_run
//! let source = std::fs::read("KBDUS.xml")?;
//! let layout = kbdlayout_core::parse_layout(&source)?;
//! println!("{} ({})", layout.display_name(), layout.locale_name());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod domain;
pub mod error;
pub mod locale;
pub mod merge;
pub mod parser;
pub mod trace;
pub mod xml;

// Re-export the most-used types at the crate root so callers can write
// `kbdlayout_core::KeyLayout` instead of `kbdlayout_core::domain::layout::KeyLayout`.
pub use domain::deadkey::{DeadKey, DeadKeyResult, DeadKeyTable};
pub use domain::keymap::{Key, Keymap};
pub use domain::layout::KeyLayout;
pub use domain::modifier::{ModifierState, Modifiers};
pub use error::{InvariantViolation, LayoutError, SchemaError};
pub use parser::{parse_layout, parse_layout_with_trace};
pub use trace::{NoTrace, RecordingTrace, TraceSink, TracingSink};
