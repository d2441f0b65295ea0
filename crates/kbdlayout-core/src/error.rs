//! Typed failures produced while building a [`crate::KeyLayout`].
//!
//! Every error is a structural problem in the source document.  None of them
//! are transient, so callers never retry: the document is rejected as a whole
//! and no partial model is returned.

use thiserror::Error;

use crate::domain::modifier::ModifierState;

/// Top-level error returned by [`crate::parse_layout`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The source bytes are not a well-formed XML document.
    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: usize, message: String },

    /// An element does not match its expected attribute schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A `(modifier state, scancode)` slot was written twice.
    #[error("key 0x{scancode:02X} already set for modifiers '{modifiers}'")]
    DuplicateKey {
        modifiers: ModifierState,
        scancode: u8,
    },

    /// Any other structural rule of the layout format was broken.
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Attribute schema failures raised by [`crate::xml::schema::ElementSchema`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The element is not the one the caller expected at this position.
    #[error("tag = {found}, but {expected} expected")]
    TagMismatch {
        expected: &'static str,
        found: String,
    },

    /// The element carries an attribute that is not part of its schema.
    #[error("{tag}: unknown attribute {attribute}")]
    UnknownAttribute { tag: String, attribute: String },

    /// A mandatory attribute is absent.
    #[error("{tag}: {attribute} is missing")]
    MissingAttribute {
        tag: &'static str,
        attribute: &'static str,
    },

    /// The document lacks a structural child element (metadata, key list).
    #[error("{parent}: missing child element {expected}")]
    MissingElement {
        parent: String,
        expected: &'static str,
    },
}

/// Broken layout rules that are not plain attribute-schema problems.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// An attribute that must hold a hexadecimal number does not.
    #[error("{attribute}: '{value}' is not a hexadecimal number")]
    InvalidHex {
        attribute: &'static str,
        value: String,
    },

    /// A raw scancode has a zero low byte or an unknown prefix byte.
    #[error("scancode 0x{0:04X} is neither plain nor 0xE0/0xE1 extended")]
    InvalidScancode(u32),

    /// A 0xE1-prefixed scancode other than Pause.
    #[error("unexpected 0xE1 scancode 0x{0:04X} (only Pause 0xE11D is known)")]
    UnknownExtraScancode(u16),

    /// A keyless `VK_OEM_8` key outside the right-Control position.
    #[error("keyless VK_OEM_8 key at scancode 0x{0:04X}, expected right Control 0xE01D")]
    Oem8NotOnRightControl(u16),

    /// Right Control is declared as `VK_OEM_8` before any OEM8 modifier level exists.
    #[error("right Control declared as VK_OEM_8 but no key uses the VK_OEM_8 modifier")]
    RightControlWithoutOem8Level,

    /// A result declares the OEM8 modifier after right Control became OEM8.
    #[error("VK_OEM_8 modifier declared after right Control was mapped to VK_OEM_8")]
    Oem8AfterRightControl,

    /// A `With` attribute names a modifier combination that is not modelled.
    #[error("unknown modifier combination '{0}'")]
    UnknownModifierState(String),

    /// A result carries both `Text` and `TextCodepoints`.
    #[error("scancode 0x{scancode:02X}: Text and TextCodepoints are mutually exclusive")]
    ConflictingText { scancode: u8 },

    /// A `TextCodepoints` value is not a Unicode scalar value.
    #[error("0x{0:X} is not a Unicode scalar value")]
    InvalidCodepoint(u32),

    /// A dead-key result also overrides the virtual key.
    #[error("scancode 0x{scancode:02X}: dead key result must not carry a VK")]
    DeadKeyWithVirtualKey { scancode: u8 },

    /// A result without text must wrap exactly one dead-key table.
    #[error("dead key result must contain exactly one DeadKeyTable, found {found}")]
    DeadKeyChildCount { found: usize },

    /// A result that already produces text also nests elements.
    #[error("{tag} with text must not contain child elements")]
    UnexpectedChildren { tag: String },

    /// The Pause key is declared twice.
    #[error("extra scancode 0x{0:04X} declared twice")]
    DuplicateExtraScancode(u16),

    /// The accent of a dead-key table is not exactly one character.
    #[error("dead key accent '{0}' must be exactly one character")]
    InvalidAccent(String),

    /// A dead-key table produced no entries.
    #[error("dead key table for accent '{0}' is empty")]
    EmptyDeadKeyTable(String),

    /// The same `(accent, with)` pair appears twice in one table.
    #[error("dead key '{accent}' + '{with}' defined twice")]
    DuplicateDeadKey { accent: String, with: String },

    /// Two modifier states that must be disjoint both populate a slot.
    #[error("slot 0x{scancode:02X} is populated in both '{first}' and '{second}'")]
    MergeCollision {
        first: ModifierState,
        second: ModifierState,
        scancode: u8,
    },

    /// A derived modifier state already exists before it is synthesized.
    #[error("modifier state '{0}' is already defined")]
    StateAlreadyDefined(ModifierState),

    /// A merge rule refers to a modifier state with no keymap.
    #[error("modifier state '{0}' has no keymap")]
    MissingState(ModifierState),
}
