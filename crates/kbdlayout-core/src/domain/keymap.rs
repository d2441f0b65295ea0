//! Keys and the 256-slot keymap of one modifier state.

use serde::Serialize;

use crate::domain::deadkey::DeadKeyTable;

/// Number of slots in a [`Keymap`], one per normalized scancode.
pub const KEYMAP_SIZE: usize = 256;

/// What one physical key produces under one modifier state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Key {
    /// Normalized scancode (see [`crate::domain::scancode::normalize`]).
    pub scancode: u8,
    /// Code point of the output.  0 for multi-character or empty text; the
    /// accent's code point for a dead key.
    pub codepoint: u32,
    /// Output text.  The accent mark for a dead key, empty for a key that
    /// produces nothing.
    pub text: String,
    /// Virtual key name, e.g. `VK_A`.  `None` for dead keys.
    pub vk: Option<String>,
    /// Composition rules, empty unless this key is a dead key.
    pub deadkeys: DeadKeyTable,
}

impl Key {
    /// A key that exists physically but produces no text (Shift, F1, …).
    pub fn keyless(scancode: u8, vk: &str) -> Self {
        Self {
            scancode,
            codepoint: 0,
            text: String::new(),
            vk: Some(vk.to_string()),
            deadkeys: DeadKeyTable::new(),
        }
    }

    /// Returns `true` if pressing this key starts a composition.
    pub fn is_dead_key(&self) -> bool {
        !self.deadkeys.is_empty()
    }
}

/// Keys of one modifier state, indexed by normalized scancode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    slots: Vec<Option<Key>>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

impl Keymap {
    /// Creates a keymap with all 256 slots empty.
    pub fn new() -> Self {
        Self {
            slots: vec![None; KEYMAP_SIZE],
        }
    }

    pub fn get(&self, scancode: u8) -> Option<&Key> {
        self.slots[scancode as usize].as_ref()
    }

    pub fn is_occupied(&self, scancode: u8) -> bool {
        self.slots[scancode as usize].is_some()
    }

    /// Stores `key` at its scancode, handing it back if the slot is taken.
    pub fn insert(&mut self, key: Key) -> Result<(), Key> {
        let slot = &mut self.slots[key.scancode as usize];
        if slot.is_some() {
            return Err(key);
        }
        *slot = Some(key);
        Ok(())
    }

    /// All 256 slots in scancode order.
    pub fn slots(&self) -> &[Option<Key>] {
        &self.slots
    }

    /// Occupied slots in scancode order.
    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.slots.iter().flatten()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Mutable slot access for the merger.
    pub(crate) fn slot_mut(&mut self, scancode: u8) -> &mut Option<Key> {
        &mut self.slots[scancode as usize]
    }
}

impl Serialize for Keymap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.slots)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text_key(scancode: u8, text: &str) -> Key {
        Key {
            scancode,
            codepoint: text.chars().next().map_or(0, u32::from),
            text: text.to_string(),
            vk: None,
            deadkeys: DeadKeyTable::new(),
        }
    }

    #[test]
    fn test_new_keymap_has_256_empty_slots() {
        let map = Keymap::new();
        assert_eq!(map.slots().len(), KEYMAP_SIZE);
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_insert_then_get() {
        let mut map = Keymap::new();
        map.insert(text_key(0x1E, "a")).unwrap();
        assert_eq!(map.get(0x1E).unwrap().text, "a");
        assert!(map.is_occupied(0x1E));
        assert!(map.get(0x1F).is_none());
    }

    #[test]
    fn test_insert_rejects_second_write_to_same_slot() {
        let mut map = Keymap::new();
        map.insert(text_key(0x1E, "a")).unwrap();
        let rejected = map.insert(text_key(0x1E, "q")).unwrap_err();
        assert_eq!(rejected.text, "q");
        assert_eq!(map.get(0x1E).unwrap().text, "a", "first write must survive");
    }

    #[test]
    fn test_highest_slot_is_addressable() {
        let mut map = Keymap::new();
        map.insert(text_key(0xFF, "x")).unwrap();
        assert_eq!(map.iter().map(|k| k.scancode).collect::<Vec<_>>(), [0xFF]);
    }

    #[test]
    fn test_keyless_key_is_not_a_dead_key() {
        let key = Key::keyless(0x2A, "VK_LSHIFT");
        assert_eq!(key.codepoint, 0);
        assert!(key.text.is_empty());
        assert_eq!(key.vk.as_deref(), Some("VK_LSHIFT"));
        assert!(!key.is_dead_key());
    }
}
