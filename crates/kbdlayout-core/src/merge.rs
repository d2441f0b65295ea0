//! Post-processing of the per-modifier keymaps.
//!
//! Runs once after every physical key has been read:
//!
//! 1. [`combine`] synthesizes the CapsLock+NumLock states by taking the
//!    union of the CapsLock and NumLock keymaps.
//! 2. [`fold`] copies NumLock keys into the matching state without NumLock,
//!    so numpad keys resolve the same way whichever lock is active.
//!
//! Both passes require their two input keymaps to be disjoint; a slot set on
//! both sides is a [`InvariantViolation::MergeCollision`].

use tracing::debug;

use crate::domain::keymap::Keymap;
use crate::domain::layout::Keymaps;
use crate::domain::modifier::ModifierState;
use crate::error::InvariantViolation;

/// One CapsLock+NumLock synthesis rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combine {
    pub numlock: ModifierState,
    pub capslock: ModifierState,
    pub combined: ModifierState,
}

/// One NumLock folding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fold {
    pub numlock: ModifierState,
    pub target: ModifierState,
}

pub const COMBINE_RULES: [Combine; 4] = [
    Combine {
        numlock: ModifierState::ShiftNumLock,
        capslock: ModifierState::ShiftCapital,
        combined: ModifierState::ShiftCapitalNumLock,
    },
    Combine {
        numlock: ModifierState::ShiftControlMenuNumLock,
        capslock: ModifierState::ShiftControlMenuCapital,
        combined: ModifierState::ShiftControlMenuCapitalNumLock,
    },
    Combine {
        numlock: ModifierState::ControlMenuNumLock,
        capslock: ModifierState::ControlMenuCapital,
        combined: ModifierState::ControlMenuCapitalNumLock,
    },
    Combine {
        numlock: ModifierState::NumLock,
        capslock: ModifierState::Capital,
        combined: ModifierState::CapitalNumLock,
    },
];

pub const FOLD_RULES: [Fold; 6] = [
    Fold {
        numlock: ModifierState::ShiftNumLock,
        target: ModifierState::Shift,
    },
    Fold {
        numlock: ModifierState::ShiftKanaNumLock,
        target: ModifierState::ShiftKana,
    },
    Fold {
        numlock: ModifierState::ShiftControlMenuNumLock,
        target: ModifierState::ShiftControlMenu,
    },
    Fold {
        numlock: ModifierState::ControlMenuNumLock,
        target: ModifierState::ControlMenu,
    },
    Fold {
        numlock: ModifierState::NumLock,
        target: ModifierState::Base,
    },
    Fold {
        numlock: ModifierState::KanaNumLock,
        target: ModifierState::Kana,
    },
];

/// Runs every [`COMBINE_RULES`] entry, then every [`FOLD_RULES`] entry.
///
/// The source keymaps are still unfolded here, so each fold pair must be
/// fully disjoint: a slot set in both maps is a collision even when the two
/// keys are equal.
///
/// # Errors
///
/// Returns the first collision or missing/duplicate state encountered.
/// `keymaps` may be partially merged on error and must be discarded.
pub fn merge_modifier_states(keymaps: &mut Keymaps) -> Result<(), InvariantViolation> {
    for rule in COMBINE_RULES {
        combine(keymaps, rule)?;
    }
    for rule in FOLD_RULES {
        ensure_disjoint(keymaps, rule.numlock, rule.target)?;
        fold(keymaps, rule)?;
    }
    Ok(())
}

/// Checks that no slot is populated in both `first` and `second`.
///
/// # Errors
///
/// - [`InvariantViolation::MissingState`] if either keymap is absent.
/// - [`InvariantViolation::MergeCollision`] naming the first shared slot.
pub fn ensure_disjoint(
    keymaps: &Keymaps,
    first: ModifierState,
    second: ModifierState,
) -> Result<(), InvariantViolation> {
    let a = source(keymaps, first)?;
    let b = source(keymaps, second)?;
    match a.iter().find(|key| b.is_occupied(key.scancode)) {
        Some(key) => Err(InvariantViolation::MergeCollision {
            first,
            second,
            scancode: key.scancode,
        }),
        None => Ok(()),
    }
}

/// Adds `rule.combined` as the slot-wise union of the NumLock and CapsLock keymaps.
///
/// # Errors
///
/// - [`InvariantViolation::StateAlreadyDefined`] if `rule.combined` exists.
/// - [`InvariantViolation::MissingState`] if a source keymap is absent.
/// - [`InvariantViolation::MergeCollision`] if both sources populate a slot.
pub fn combine(keymaps: &mut Keymaps, rule: Combine) -> Result<(), InvariantViolation> {
    if keymaps.contains_key(&rule.combined) {
        return Err(InvariantViolation::StateAlreadyDefined(rule.combined));
    }
    ensure_disjoint(keymaps, rule.numlock, rule.capslock)?;
    let numlock = source(keymaps, rule.numlock)?;
    let capslock = source(keymaps, rule.capslock)?;

    let mut combined = Keymap::new();
    for key in numlock.iter().chain(capslock.iter()) {
        *combined.slot_mut(key.scancode) = Some(key.clone());
    }

    debug!(
        state = %rule.combined,
        keys = combined.len(),
        "combined CapsLock and NumLock keymaps"
    );
    keymaps.insert(rule.combined, combined);
    Ok(())
}

/// Copies keys of `rule.numlock` into the empty slots of `rule.target`.
///
/// Slots already holding the same key are left alone, so a second run over
/// the same pair changes nothing.
///
/// # Errors
///
/// - [`InvariantViolation::MissingState`] if either keymap is absent.
/// - [`InvariantViolation::MergeCollision`] if both keymaps hold different
///   keys in one slot.  Nothing is copied in that case.
pub fn fold(keymaps: &mut Keymaps, rule: Fold) -> Result<(), InvariantViolation> {
    let numlock = source(keymaps, rule.numlock)?.clone();
    let target = keymaps
        .get_mut(&rule.target)
        .ok_or(InvariantViolation::MissingState(rule.target))?;

    for key in numlock.iter() {
        if let Some(existing) = target.get(key.scancode) {
            if existing != key {
                return Err(InvariantViolation::MergeCollision {
                    first: rule.numlock,
                    second: rule.target,
                    scancode: key.scancode,
                });
            }
        }
    }

    let mut copied = 0usize;
    for key in numlock.iter() {
        let slot = target.slot_mut(key.scancode);
        if slot.is_none() {
            *slot = Some(key.clone());
            copied += 1;
        }
    }

    debug!(from = %rule.numlock, into = %rule.target, copied, "folded NumLock keymap");
    Ok(())
}

fn source(keymaps: &Keymaps, state: ModifierState) -> Result<&Keymap, InvariantViolation> {
    keymaps
        .get(&state)
        .ok_or(InvariantViolation::MissingState(state))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
