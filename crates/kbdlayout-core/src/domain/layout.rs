//! The finished keyboard layout model.
//!
//! A [`KeyLayout`] is built once by [`crate::parse_layout`] and never mutated
//! afterwards: all fields are private and only readable through accessors.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::keymap::{Key, Keymap};
use crate::domain::modifier::ModifierState;

/// Keymaps by modifier state, in creation order.
pub type Keymaps = IndexMap<ModifierState, Keymap>;

/// A validated keyboard layout with one keymap per modifier state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyLayout {
    klid: String,
    locale_name: String,
    display_name: String,
    proxy_name: Option<&'static str>,
    keymaps: Keymaps,
    extra_scancodes: BTreeMap<u16, Key>,
    has_right_ctrl_like_oem8: bool,
}

impl KeyLayout {
    pub(crate) fn new(
        metadata: LayoutMetadata,
        keymaps: Keymaps,
        extra_scancodes: BTreeMap<u16, Key>,
        has_right_ctrl_like_oem8: bool,
    ) -> Self {
        let proxy_name = crate::locale::proxy_name(&metadata.display_name);
        Self {
            klid: metadata.klid,
            locale_name: metadata.locale_name,
            display_name: metadata.display_name,
            proxy_name,
            keymaps,
            extra_scancodes,
            has_right_ctrl_like_oem8,
        }
    }

    /// Keyboard layout identifier as written in the document (e.g. `0x00000409`).
    pub fn klid(&self) -> &str {
        &self.klid
    }

    /// Locale name, e.g. `en-US`.
    pub fn locale_name(&self) -> &str {
        &self.locale_name
    }

    /// Human-readable layout name, e.g. `US`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Canonical locale alias resolved from the display name, if known.
    pub fn proxy_name(&self) -> Option<&'static str> {
        self.proxy_name
    }

    pub fn keymaps(&self) -> &Keymaps {
        &self.keymaps
    }

    pub fn keymap(&self, state: ModifierState) -> Option<&Keymap> {
        self.keymaps.get(&state)
    }

    /// Key produced by `scancode` (normalized) under `state`.
    pub fn key(&self, state: ModifierState, scancode: u8) -> Option<&Key> {
        self.keymap(state)?.get(scancode)
    }

    /// Keys outside the 256-slot grid, keyed by raw scancode (only Pause).
    pub fn extra_scancodes(&self) -> &BTreeMap<u16, Key> {
        &self.extra_scancodes
    }

    /// `true` when right Control doubles as the `VK_OEM_8` modifier.
    pub fn has_right_ctrl_like_oem8(&self) -> bool {
        self.has_right_ctrl_like_oem8
    }
}

/// Identity of a layout, read from the document's metadata element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMetadata {
    pub klid: String,
    pub locale_name: String,
    pub display_name: String,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(display_name: &str) -> LayoutMetadata {
        LayoutMetadata {
            klid: "0x00000409".to_string(),
            locale_name: "en-US".to_string(),
            display_name: display_name.to_string(),
        }
    }

    #[test]
    fn test_new_resolves_proxy_name_from_display_name() {
        let layout = KeyLayout::new(metadata("US"), Keymaps::new(), BTreeMap::new(), false);
        assert_eq!(layout.proxy_name(), Some("en-US"));
        assert_eq!(layout.klid(), "0x00000409");
        assert_eq!(layout.locale_name(), "en-US");
        assert_eq!(layout.display_name(), "US");
    }

    #[test]
    fn test_new_leaves_proxy_name_empty_for_unknown_display_name() {
        let layout = KeyLayout::new(metadata("Klingon"), Keymaps::new(), BTreeMap::new(), false);
        assert_eq!(layout.proxy_name(), None);
    }

    #[test]
    fn test_key_looks_up_state_then_slot() {
        let mut keymaps = Keymaps::new();
        let mut base = Keymap::new();
        base.insert(Key::keyless(0x01, "VK_ESCAPE")).unwrap();
        keymaps.insert(ModifierState::Base, base);

        let layout = KeyLayout::new(metadata("US"), keymaps, BTreeMap::new(), true);

        assert_eq!(
            layout.key(ModifierState::Base, 0x01).and_then(|k| k.vk.as_deref()),
            Some("VK_ESCAPE")
        );
        assert!(layout.key(ModifierState::Base, 0x02).is_none());
        assert!(layout.key(ModifierState::Shift, 0x01).is_none());
        assert!(layout.has_right_ctrl_like_oem8());
    }
}
