//! Raw scancode classification and normalization.
//!
//! Layout documents carry 16-bit "set 1" scancodes:
//!
//! - `0x00XX`: a plain key,
//! - `0xE0XX`: an extended key (navigation cluster, right Control/Alt, keypad Enter, …),
//! - `0xE11D`: Pause, the only key with the `0xE1` prefix.
//!
//! Plain and extended keys fold into one 8-bit index: the low 7 bits, with
//! bit `0x80` set for extended keys.  `0x0010` becomes `0x10` and `0xE010`
//! becomes `0x90`.  Pause does not fit that grid and is kept aside.

use crate::error::InvariantViolation;

/// Raw scancode of the Pause key.
pub const PAUSE: u16 = 0xE11D;

/// Raw scancode of the right Control key.
pub const RIGHT_CONTROL: u16 = 0xE01D;

/// Where a raw scancode belongs in the layout model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScancodeSlot {
    /// A slot of the 256-entry keymaps (already normalized).
    Keymap(u8),
    /// An entry of the extra-scancode table, keyed by the raw value.
    Extra(u16),
}

/// Folds a raw plain or extended scancode into its 8-bit keymap index.
pub fn normalize(raw: u16) -> u8 {
    let extended = if raw >> 8 != 0 { 0x80 } else { 0x00 };
    (raw & 0x7F) as u8 | extended
}

/// Returns `true` if the raw scancode carries an extension prefix.
pub fn is_extended(raw: u16) -> bool {
    raw >> 8 != 0
}

/// Validates a raw scancode and decides where it is stored.
///
/// # Errors
///
/// - [`InvariantViolation::InvalidScancode`] if the low byte is zero, the
///   value does not fit 16 bits, or the prefix is not `0x00`, `0xE0` or `0xE1`.
/// - [`InvariantViolation::UnknownExtraScancode`] for a `0xE1` scancode
///   other than [`PAUSE`].
pub fn classify(raw: u32) -> Result<ScancodeSlot, InvariantViolation> {
    let sc = u16::try_from(raw).map_err(|_| InvariantViolation::InvalidScancode(raw))?;
    if sc & 0xFF == 0 || !matches!(sc >> 8, 0x00 | 0xE0 | 0xE1) {
        return Err(InvariantViolation::InvalidScancode(raw));
    }

    if sc > 0xE100 {
        if sc != PAUSE {
            return Err(InvariantViolation::UnknownExtraScancode(sc));
        }
        return Ok(ScancodeSlot::Extra(sc));
    }

    Ok(ScancodeSlot::Keymap(normalize(sc)))
}

/// Parses a hexadecimal attribute value, with or without a `0x` prefix.
///
/// # Errors
///
/// Returns [`InvariantViolation::InvalidHex`] naming `attribute` when the
/// value is empty or not hexadecimal.
pub fn parse_hex(attribute: &'static str, value: &str) -> Result<u32, InvariantViolation> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).map_err(|_| InvariantViolation::InvalidHex {
        attribute,
        value: value.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
