//! Modifier tokens and the fixed set of modifier states a layout can describe.
//!
//! A layout document names the modifier combination of each result with a
//! space-separated list of virtual-key tokens (`With="VK_SHIFT VK_CONTROL"`).
//! The tokens form an unordered set; [`Modifiers`] holds that set as bits and
//! [`ModifierState`] is the closed enumeration of combinations that are
//! actually modelled.  Any other combination is rejected.
//!
//! Token meanings:
//!
//! | Token        | Key                                   |
//! |--------------|---------------------------------------|
//! | `VK_SHIFT`   | Shift                                 |
//! | `VK_CONTROL` | Control                               |
//! | `VK_MENU`    | Alt (`VK_CONTROL VK_MENU` is AltGr)   |
//! | `VK_CAPITAL` | CapsLock                              |
//! | `VK_KANA`    | Kana                                  |
//! | `VK_OEM_8`   | locale-specific OEM8 level            |
//! | `VK_NUMLOCK` | NumLock                               |

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::InvariantViolation;

/// A set of held modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const SHIFT: u8 = 1 << 0;
    pub const CONTROL: u8 = 1 << 1;
    pub const MENU: u8 = 1 << 2;
    pub const CAPITAL: u8 = 1 << 3;
    pub const KANA: u8 = 1 << 4;
    pub const OEM_8: u8 = 1 << 5;
    pub const NUMLOCK: u8 = 1 << 6;

    /// Token names in canonical order.
    const TOKENS: [(u8, &'static str); 7] = [
        (Self::SHIFT, "VK_SHIFT"),
        (Self::CONTROL, "VK_CONTROL"),
        (Self::MENU, "VK_MENU"),
        (Self::CAPITAL, "VK_CAPITAL"),
        (Self::KANA, "VK_KANA"),
        (Self::OEM_8, "VK_OEM_8"),
        (Self::NUMLOCK, "VK_NUMLOCK"),
    ];

    /// Parses a space-separated token list in any order.
    ///
    /// Returns `None` for an unknown or repeated token.  An empty string is
    /// the empty set.
    pub fn parse(tokens: &str) -> Option<Self> {
        let mut bits = 0u8;
        for token in tokens.split_whitespace() {
            let (bit, _) = Self::TOKENS.iter().find(|(_, name)| *name == token)?;
            if bits & bit != 0 {
                return None;
            }
            bits |= bit;
        }
        Some(Self(bits))
    }

    /// Returns `true` if every bit of `flag` is set.
    pub fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    /// Returns `true` if no modifier is held.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the held tokens in canonical order.
    pub fn tokens(self) -> impl Iterator<Item = &'static str> {
        Self::TOKENS
            .into_iter()
            .filter(move |(bit, _)| self.0 & bit != 0)
            .map(|(_, name)| name)
    }
}

/// Every modifier combination a layout can carry a keymap for.
///
/// The first 22 variants ([`ModifierState::SOURCE`]) may appear in a layout
/// document.  The last four ([`ModifierState::DERIVED`]) combine CapsLock and
/// NumLock and only ever come out of [`crate::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModifierState {
    Base,
    Shift,
    ShiftControl,
    ShiftCapital,
    ShiftNumLock,
    ShiftKana,
    ShiftOem8,
    ShiftControlMenu,
    ShiftControlKana,
    ShiftKanaNumLock,
    ShiftControlMenuCapital,
    ShiftControlMenuNumLock,
    Control,
    ControlMenu,
    ControlKana,
    ControlMenuNumLock,
    ControlMenuCapital,
    Capital,
    NumLock,
    Oem8,
    Kana,
    KanaNumLock,
    // Derived
    ShiftCapitalNumLock,
    ShiftControlMenuCapitalNumLock,
    ControlMenuCapitalNumLock,
    CapitalNumLock,
}

impl ModifierState {
    /// States a document may declare, in the order their keymaps are created.
    pub const SOURCE: [ModifierState; 22] = [
        Self::Base,
        Self::Shift,
        Self::ShiftControl,
        Self::ShiftCapital,
        Self::ShiftNumLock,
        Self::ShiftKana,
        Self::ShiftOem8,
        Self::ShiftControlMenu,
        Self::ShiftControlKana,
        Self::ShiftKanaNumLock,
        Self::ShiftControlMenuCapital,
        Self::ShiftControlMenuNumLock,
        Self::Control,
        Self::ControlMenu,
        Self::ControlKana,
        Self::ControlMenuNumLock,
        Self::ControlMenuCapital,
        Self::Capital,
        Self::NumLock,
        Self::Oem8,
        Self::Kana,
        Self::KanaNumLock,
    ];

    /// CapsLock+NumLock states synthesized after the document is read.
    pub const DERIVED: [ModifierState; 4] = [
        Self::ShiftCapitalNumLock,
        Self::ShiftControlMenuCapitalNumLock,
        Self::ControlMenuCapitalNumLock,
        Self::CapitalNumLock,
    ];

    /// The set of held modifiers this state stands for.
    pub const fn modifiers(self) -> Modifiers {
        const S: u8 = Modifiers::SHIFT;
        const C: u8 = Modifiers::CONTROL;
        const M: u8 = Modifiers::MENU;
        const CAP: u8 = Modifiers::CAPITAL;
        const K: u8 = Modifiers::KANA;
        const O: u8 = Modifiers::OEM_8;
        const N: u8 = Modifiers::NUMLOCK;
        Modifiers(match self {
            Self::Base => 0,
            Self::Shift => S,
            Self::ShiftControl => S | C,
            Self::ShiftCapital => S | CAP,
            Self::ShiftNumLock => S | N,
            Self::ShiftKana => S | K,
            Self::ShiftOem8 => S | O,
            Self::ShiftControlMenu => S | C | M,
            Self::ShiftControlKana => S | C | K,
            Self::ShiftKanaNumLock => S | K | N,
            Self::ShiftControlMenuCapital => S | C | M | CAP,
            Self::ShiftControlMenuNumLock => S | C | M | N,
            Self::Control => C,
            Self::ControlMenu => C | M,
            Self::ControlKana => C | K,
            Self::ControlMenuNumLock => C | M | N,
            Self::ControlMenuCapital => C | M | CAP,
            Self::Capital => CAP,
            Self::NumLock => N,
            Self::Oem8 => O,
            Self::Kana => K,
            Self::KanaNumLock => K | N,
            Self::ShiftCapitalNumLock => S | CAP | N,
            Self::ShiftControlMenuCapitalNumLock => S | C | M | CAP | N,
            Self::ControlMenuCapitalNumLock => C | M | CAP | N,
            Self::CapitalNumLock => CAP | N,
        })
    }

    /// Canonical token string, identical to the spelling used by layout documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base => "",
            Self::Shift => "VK_SHIFT",
            Self::ShiftControl => "VK_SHIFT VK_CONTROL",
            Self::ShiftCapital => "VK_SHIFT VK_CAPITAL",
            Self::ShiftNumLock => "VK_SHIFT VK_NUMLOCK",
            Self::ShiftKana => "VK_SHIFT VK_KANA",
            Self::ShiftOem8 => "VK_SHIFT VK_OEM_8",
            Self::ShiftControlMenu => "VK_SHIFT VK_CONTROL VK_MENU",
            Self::ShiftControlKana => "VK_SHIFT VK_CONTROL VK_KANA",
            Self::ShiftKanaNumLock => "VK_SHIFT VK_KANA VK_NUMLOCK",
            Self::ShiftControlMenuCapital => "VK_SHIFT VK_CONTROL VK_MENU VK_CAPITAL",
            Self::ShiftControlMenuNumLock => "VK_SHIFT VK_CONTROL VK_MENU VK_NUMLOCK",
            Self::Control => "VK_CONTROL",
            Self::ControlMenu => "VK_CONTROL VK_MENU",
            Self::ControlKana => "VK_CONTROL VK_KANA",
            Self::ControlMenuNumLock => "VK_CONTROL VK_MENU VK_NUMLOCK",
            Self::ControlMenuCapital => "VK_CONTROL VK_MENU VK_CAPITAL",
            Self::Capital => "VK_CAPITAL",
            Self::NumLock => "VK_NUMLOCK",
            Self::Oem8 => "VK_OEM_8",
            Self::Kana => "VK_KANA",
            Self::KanaNumLock => "VK_KANA VK_NUMLOCK",
            Self::ShiftCapitalNumLock => "VK_SHIFT VK_CAPITAL VK_NUMLOCK",
            Self::ShiftControlMenuCapitalNumLock => "VK_SHIFT VK_CONTROL VK_MENU VK_CAPITAL VK_NUMLOCK",
            Self::ControlMenuCapitalNumLock => "VK_CONTROL VK_MENU VK_CAPITAL VK_NUMLOCK",
            Self::CapitalNumLock => "VK_CAPITAL VK_NUMLOCK",
        }
    }

    /// Returns `true` for the CapsLock+NumLock states produced by the merger.
    pub fn is_derived(self) -> bool {
        Self::DERIVED.contains(&self)
    }

    /// Returns `true` if the OEM8 modifier is part of this state.
    pub fn has_oem8(self) -> bool {
        self.modifiers().contains(Modifiers::OEM_8)
    }

    /// Looks up the state matching exactly `modifiers`, derived states included.
    pub fn from_modifiers(modifiers: Modifiers) -> Option<Self> {
        Self::SOURCE
            .into_iter()
            .chain(Self::DERIVED)
            .find(|state| state.modifiers() == modifiers)
    }

    /// Resolves the `With` attribute of a result into a declarable state.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::UnknownModifierState`] for unknown tokens
    /// and for combinations outside [`ModifierState::SOURCE`].
    pub fn parse_declared(with: &str) -> Result<Self, InvariantViolation> {
        Modifiers::parse(with)
            .and_then(Self::from_modifiers)
            .filter(|state| !state.is_derived())
            .ok_or_else(|| InvariantViolation::UnknownModifierState(with.to_string()))
    }
}

impl fmt::Display for ModifierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("normal"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl Serialize for ModifierState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
