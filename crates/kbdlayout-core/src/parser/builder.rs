//! Builds the per-modifier keymaps from a layout document.
//!
//! Expected document shape:
//!
//! ```text
//! <KeyboardLayout>
//!   <metadata KLID="0x00000409" LocaleName="en-US" LayoutDisplayName="US"/>
//!   <PhysicalKeys>
//!     <PK SC="1E" VK="VK_A" Name="A">
//!       <Result Text="a"/>
//!       <Result Text="A" With="VK_SHIFT"/>
//!       <Result With="VK_CONTROL VK_MENU">
//!         <DeadKeyTable Accent="´"> … </DeadKeyTable>
//!       </Result>
//!     </PK>
//!     <PK SC="2A" VK="VK_LSHIFT"/>
//!   </PhysicalKeys>
//! </KeyboardLayout>
//! ```
//!
//! The first child of the root is the metadata, the second the list of
//! physical keys.  A `PK` without results is a key that types nothing; it is
//! recorded in the unmodified keymap only.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::deadkey::DeadKeyTable;
use crate::domain::keymap::{Key, Keymap};
use crate::domain::layout::{KeyLayout, Keymaps, LayoutMetadata};
use crate::domain::modifier::ModifierState;
use crate::domain::scancode::{self, ScancodeSlot, RIGHT_CONTROL};
use crate::error::{InvariantViolation, LayoutError, SchemaError};
use crate::merge;
use crate::parser::codepoint_of;
use crate::parser::deadkeys::resolve_dead_keys;
use crate::trace::TraceSink;
use crate::xml::{optional, required, Element, ElementSchema};

const METADATA: ElementSchema<3> = ElementSchema::new(
    "metadata",
    [
        required("KLID"),
        required("LocaleName"),
        required("LayoutDisplayName"),
    ],
);

const PHYSICAL_KEY: ElementSchema<3> =
    ElementSchema::new("PK", [required("SC"), required("VK"), optional("Name")]);

const KEY_RESULT: ElementSchema<4> = ElementSchema::new(
    "Result",
    [
        optional("Text"),
        optional("TextCodepoints"),
        optional("VK"),
        optional("With"),
    ],
);

/// Virtual key the right-Control quirk is recognised by.
const VK_OEM_8: &str = "VK_OEM_8";

/// Builds a complete [`KeyLayout`] from the root element of a document.
///
/// Runs the modifier-state merge once all keys are read.
///
/// # Errors
///
/// Returns the first schema, duplicate-key or invariant failure.
pub fn build_layout(root: &Element, trace: &mut dyn TraceSink) -> Result<KeyLayout, LayoutError> {
    let metadata_element = child(root, 0, "metadata")?;
    let keys_element = child(root, 1, "PhysicalKeys")?;

    let attrs = METADATA.extract(metadata_element, trace)?;
    let metadata = LayoutMetadata {
        klid: attrs.required("KLID")?.to_string(),
        locale_name: attrs.required("LocaleName")?.to_string(),
        display_name: attrs.required("LayoutDisplayName")?.to_string(),
    };

    let mut builder = LayoutBuilder::new(trace);
    for pk in &keys_element.children {
        builder.add_physical_key(pk)?;
    }
    builder.finish(metadata)
}

fn child<'e>(
    parent: &'e Element,
    index: usize,
    expected: &'static str,
) -> Result<&'e Element, SchemaError> {
    parent
        .children
        .get(index)
        .ok_or_else(|| SchemaError::MissingElement {
            parent: parent.tag.clone(),
            expected,
        })
}

/// Mutable state while the physical-key list is walked.
struct LayoutBuilder<'t> {
    trace: &'t mut dyn TraceSink,
    keymaps: Keymaps,
    extra_scancodes: BTreeMap<u16, Key>,
    /// Some result declared a modifier combination containing `VK_OEM_8`.
    has_oem8_level: bool,
    /// Right Control was declared as a keyless `VK_OEM_8` key.
    right_ctrl_like_oem8: bool,
}

impl<'t> LayoutBuilder<'t> {
    fn new(trace: &'t mut dyn TraceSink) -> Self {
        let keymaps = ModifierState::SOURCE
            .into_iter()
            .map(|state| (state, Keymap::new()))
            .collect();
        Self {
            trace,
            keymaps,
            extra_scancodes: BTreeMap::new(),
            has_oem8_level: false,
            right_ctrl_like_oem8: false,
        }
    }

    fn add_physical_key(&mut self, pk: &Element) -> Result<(), LayoutError> {
        let attrs = PHYSICAL_KEY.extract(pk, self.trace)?;
        let raw = scancode::parse_hex("SC", attrs.required("SC")?)?;
        let vk = attrs.required("VK")?;

        let scancode = match scancode::classify(raw)? {
            ScancodeSlot::Keymap(sc) => sc,
            ScancodeSlot::Extra(raw) => {
                reject_children(pk)?;
                debug!(scancode = raw, vk, "routing key to extra scancodes");
                let key = Key::keyless(scancode::normalize(raw), vk);
                if self.extra_scancodes.insert(raw, key).is_some() {
                    return Err(InvariantViolation::DuplicateExtraScancode(raw).into());
                }
                return Ok(());
            }
        };

        if pk.children.is_empty() && vk == VK_OEM_8 {
            // The OEM8 level must already be declared by earlier keys.
            if !self.has_oem8_level {
                return Err(InvariantViolation::RightControlWithoutOem8Level.into());
            }
            // `raw` fits 16 bits once classify() accepted it.
            if raw != u32::from(RIGHT_CONTROL) {
                return Err(InvariantViolation::Oem8NotOnRightControl(raw as u16).into());
            }
            debug!("right Control acts as VK_OEM_8");
            self.right_ctrl_like_oem8 = true;
        }

        if pk.children.is_empty() {
            return self.insert(ModifierState::Base, Key::keyless(scancode, vk));
        }

        for result in &pk.children {
            self.add_result(scancode, vk, result)?;
        }
        Ok(())
    }

    fn add_result(&mut self, scancode: u8, pk_vk: &str, result: &Element) -> Result<(), LayoutError> {
        let attrs = KEY_RESULT.extract(result, self.trace)?;
        let state = ModifierState::parse_declared(attrs.optional("With").unwrap_or(""))?;
        let vk = attrs.optional("VK");

        if state.has_oem8() {
            if self.right_ctrl_like_oem8 {
                return Err(InvariantViolation::Oem8AfterRightControl.into());
            }
            self.has_oem8_level = true;
        }

        let text = attrs.optional("Text").filter(|t| !t.is_empty());
        let codepoints = attrs.optional("TextCodepoints").filter(|c| !c.is_empty());

        let key = match (text, codepoints) {
            (Some(_), Some(_)) => {
                return Err(InvariantViolation::ConflictingText { scancode }.into());
            }
            (Some(text), None) => {
                reject_children(result)?;
                Key {
                    scancode,
                    codepoint: codepoint_of(text),
                    text: text.to_string(),
                    vk: Some(vk.unwrap_or(pk_vk).to_string()),
                    deadkeys: DeadKeyTable::new(),
                }
            }
            (None, Some(hex)) => {
                reject_children(result)?;
                let codepoint = scancode::parse_hex("TextCodepoints", hex)?;
                let c = char::from_u32(codepoint)
                    .ok_or(InvariantViolation::InvalidCodepoint(codepoint))?;
                Key {
                    scancode,
                    codepoint,
                    text: c.to_string(),
                    vk: Some(vk.unwrap_or(pk_vk).to_string()),
                    deadkeys: DeadKeyTable::new(),
                }
            }
            (None, None) if !result.children.is_empty() => {
                if vk.is_some() {
                    return Err(InvariantViolation::DeadKeyWithVirtualKey { scancode }.into());
                }
                let [table] = result.children.as_slice() else {
                    return Err(InvariantViolation::DeadKeyChildCount {
                        found: result.children.len(),
                    }
                    .into());
                };
                let mut deadkeys = DeadKeyTable::new();
                let accent = resolve_dead_keys(table, &mut deadkeys, self.trace)?;
                Key {
                    scancode,
                    codepoint: codepoint_of(&accent),
                    text: accent,
                    vk: None,
                    deadkeys,
                }
            }
            (None, None) => {
                debug!(scancode, modifiers = %state, "result without output skipped");
                return Ok(());
            }
        };

        self.insert(state, key)
    }

    fn insert(&mut self, state: ModifierState, key: Key) -> Result<(), LayoutError> {
        let keymap = self
            .keymaps
            .get_mut(&state)
            .ok_or(InvariantViolation::MissingState(state))?;
        keymap.insert(key).map_err(|key| LayoutError::DuplicateKey {
            modifiers: state,
            scancode: key.scancode,
        })
    }

    fn finish(mut self, metadata: LayoutMetadata) -> Result<KeyLayout, LayoutError> {
        merge::merge_modifier_states(&mut self.keymaps)?;
        Ok(KeyLayout::new(
            metadata,
            self.keymaps,
            self.extra_scancodes,
            self.right_ctrl_like_oem8,
        ))
    }
}

fn reject_children(result: &Element) -> Result<(), InvariantViolation> {
    if result.children.is_empty() {
        Ok(())
    } else {
        Err(InvariantViolation::UnexpectedChildren {
            tag: result.tag.clone(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{NoTrace, RecordingTrace};

    /// Wraps physical-key markup into a complete US-English document.
    fn document(keys: &str) -> String {
        format!(
            r#"<KeyboardLayout>
                 <metadata KLID="0x00000409" LocaleName="en-US" LayoutDisplayName="US"/>
                 <PhysicalKeys>{keys}</PhysicalKeys>
               </KeyboardLayout>"#
        )
    }

    fn build(keys: &str) -> Result<KeyLayout, LayoutError> {
        let root = Element::parse_document(document(keys).as_bytes())?;
        build_layout(&root, &mut NoTrace)
    }

    // ── Metadata ──────────────────────────────────────────────────────────────

    #[test]
    fn test_metadata_is_copied_into_layout() {
        let layout = build("").unwrap();
        assert_eq!(layout.klid(), "0x00000409");
        assert_eq!(layout.locale_name(), "en-US");
        assert_eq!(layout.display_name(), "US");
        assert_eq!(layout.proxy_name(), Some("en-US"));
    }

    #[test]
    fn test_missing_metadata_attribute_is_schema_error() {
        let root = Element::parse_document(
            br#"<KeyboardLayout><metadata KLID="1" LocaleName="x"/><PhysicalKeys/></KeyboardLayout>"#,
        )
        .unwrap();
        let err = build_layout(&root, &mut NoTrace).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Schema(SchemaError::MissingAttribute {
                tag: "metadata",
                attribute: "LayoutDisplayName"
            })
        );
    }

    #[test]
    fn test_wrong_first_child_is_tag_mismatch() {
        let root = Element::parse_document(
            br#"<KeyboardLayout><PhysicalKeys/><metadata/></KeyboardLayout>"#,
        )
        .unwrap();
        let err = build_layout(&root, &mut NoTrace).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Schema(SchemaError::TagMismatch { expected: "metadata", .. })
        ));
    }

    #[test]
    fn test_missing_key_list_is_schema_error() {
        let root = Element::parse_document(
            br#"<KeyboardLayout><metadata KLID="1" LocaleName="x" LayoutDisplayName="y"/></KeyboardLayout>"#,
        )
        .unwrap();
        let err = build_layout(&root, &mut NoTrace).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Schema(SchemaError::MissingElement { expected: "PhysicalKeys", .. })
        ));
    }

    // ── Text results ──────────────────────────────────────────────────────────

    #[test]
    fn test_single_character_text_derives_codepoint_and_inherits_vk() {
        let layout = build(r#"<PK SC="1E" VK="VK_A"><Result Text="a"/></PK>"#).unwrap();
        let key = layout.key(ModifierState::Base, 0x1E).unwrap();
        assert_eq!(key.codepoint, 0x61);
        assert_eq!(key.text, "a");
        assert_eq!(key.vk.as_deref(), Some("VK_A"));
        assert!(!key.is_dead_key());
    }

    #[test]
    fn test_result_vk_overrides_physical_key_vk() {
        let layout = build(
            r#"<PK SC="53" VK="VK_DELETE"><Result Text="," VK="VK_DECIMAL" With="VK_NUMLOCK"/></PK>"#,
        )
        .unwrap();
        let key = layout.key(ModifierState::NumLock, 0x53).unwrap();
        assert_eq!(key.vk.as_deref(), Some("VK_DECIMAL"));
    }

    #[test]
    fn test_multi_character_text_has_zero_codepoint() {
        let layout =
            build(r#"<PK SC="28" VK="VK_OEM_7"><Result Text="ae" With="VK_SHIFT"/></PK>"#).unwrap();
        let key = layout.key(ModifierState::Shift, 0x28).unwrap();
        assert_eq!(key.codepoint, 0);
        assert_eq!(key.text, "ae");
    }

    #[test]
    fn test_text_codepoints_is_decoded_as_scalar_value() {
        let layout = build(
            r#"<PK SC="12" VK="VK_E"><Result TextCodepoints="20AC" With="VK_CONTROL VK_MENU"/></PK>"#,
        )
        .unwrap();
        let key = layout.key(ModifierState::ControlMenu, 0x12).unwrap();
        assert_eq!(key.codepoint, 0x20AC);
        assert_eq!(key.text, "€");
    }

    #[test]
    fn test_text_codepoints_rejects_surrogate() {
        let err = build(r#"<PK SC="12" VK="VK_E"><Result TextCodepoints="D800"/></PK>"#).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Invariant(InvariantViolation::InvalidCodepoint(0xD800))
        );
    }

    #[test]
    fn test_text_codepoints_rejects_out_of_range_value() {
        let err =
            build(r#"<PK SC="12" VK="VK_E"><Result TextCodepoints="110000"/></PK>"#).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Invariant(InvariantViolation::InvalidCodepoint(0x11_0000))
        );
    }

    #[test]
    fn test_text_and_text_codepoints_together_are_rejected() {
        let err = build(r#"<PK SC="12" VK="VK_E"><Result Text="e" TextCodepoints="65"/></PK>"#)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::Invariant(InvariantViolation::ConflictingText { scancode: 0x12 })
        );
    }

    #[test]
    fn test_extended_scancode_is_normalized() {
        let layout =
            build(r#"<PK SC="E035" VK="VK_DIVIDE"><Result Text="/"/></PK>"#).unwrap();
        assert_eq!(layout.key(ModifierState::Base, 0xB5).unwrap().text, "/");
    }

    #[test]
    fn test_result_without_output_is_skipped() {
        let layout = build(r#"<PK SC="1E" VK="VK_A"><Result With="VK_CONTROL"/></PK>"#).unwrap();
        assert!(layout.key(ModifierState::Control, 0x1E).is_none());
        assert!(layout.key(ModifierState::Base, 0x1E).is_none());
    }

    // ── Keyless keys and duplicates ───────────────────────────────────────────

    #[test]
    fn test_physical_key_without_results_is_keyless_marker_in_base_map() {
        let layout = build(r#"<PK SC="2A" VK="VK_LSHIFT" Name="Shift"/>"#).unwrap();
        let key = layout.key(ModifierState::Base, 0x2A).unwrap();
        assert_eq!(key, &Key::keyless(0x2A, "VK_LSHIFT"));
        assert!(layout.key(ModifierState::Shift, 0x2A).is_none());
    }

    #[test]
    fn test_duplicate_keyless_marker_is_rejected() {
        let err = build(r#"<PK SC="2A" VK="VK_LSHIFT"/><PK SC="2A" VK="VK_LSHIFT"/>"#).unwrap_err();
        assert_eq!(
            err,
            LayoutError::DuplicateKey {
                modifiers: ModifierState::Base,
                scancode: 0x2A
            }
        );
    }

    #[test]
    fn test_duplicate_result_under_same_modifiers_is_rejected() {
        let err = build(
            r#"<PK SC="1E" VK="VK_A"><Result Text="a" With="VK_SHIFT"/><Result Text="b" With="VK_SHIFT"/></PK>"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LayoutError::DuplicateKey {
                modifiers: ModifierState::Shift,
                scancode: 0x1E
            }
        );
    }

    #[test]
    fn test_plain_and_extended_keys_with_same_low_bits_do_not_collide() {
        let layout = build(r#"<PK SC="1C" VK="VK_RETURN"/><PK SC="E01C" VK="VK_RETURN"/>"#).unwrap();
        assert!(layout.key(ModifierState::Base, 0x1C).is_some());
        assert!(layout.key(ModifierState::Base, 0x9C).is_some());
    }

    // ── Scancode validation ───────────────────────────────────────────────────

    #[test]
    fn test_scancode_with_zero_low_byte_is_rejected() {
        let err = build(r#"<PK SC="E000" VK="VK_X"/>"#).unwrap_err();
        assert_eq!(err, LayoutError::Invariant(InvariantViolation::InvalidScancode(0xE000)));
    }

    #[test]
    fn test_scancode_with_unknown_prefix_is_rejected() {
        let err = build(r#"<PK SC="E51D" VK="VK_X"/>"#).unwrap_err();
        assert_eq!(err, LayoutError::Invariant(InvariantViolation::InvalidScancode(0xE51D)));
    }

    #[test]
    fn test_non_hex_scancode_is_rejected() {
        let err = build(r#"<PK SC="one" VK="VK_X"/>"#).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Invariant(InvariantViolation::InvalidHex { attribute: "SC", .. })
        ));
    }

    #[test]
    fn test_pause_goes_to_extra_scancodes() {
        let layout = build(r#"<PK SC="E11D" VK="VK_PAUSE"/>"#).unwrap();
        let pause = layout.extra_scancodes().get(&0xE11D).expect("pause entry");
        assert_eq!(pause.vk.as_deref(), Some("VK_PAUSE"));
        assert!(layout.keymap(ModifierState::Base).unwrap().is_empty());
    }

    #[test]
    fn test_pause_with_results_is_rejected() {
        let err = build(r#"<PK SC="E11D" VK="VK_PAUSE"><Result Text="x" Bogus="1"/></PK>"#)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::Invariant(InvariantViolation::UnexpectedChildren {
                tag: "PK".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_pause_is_rejected() {
        let err = build(r#"<PK SC="E11D" VK="VK_PAUSE"/><PK SC="E11D" VK="VK_PAUSE"/>"#)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::Invariant(InvariantViolation::DuplicateExtraScancode(0xE11D))
        );
    }

    #[test]
    fn test_unknown_e1_scancode_is_rejected() {
        let err = build(r#"<PK SC="E130" VK="VK_X"/>"#).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Invariant(InvariantViolation::UnknownExtraScancode(0xE130))
        );
    }

    // ── Modifier combinations ─────────────────────────────────────────────────

    #[test]
    fn test_with_tokens_in_any_order_select_same_state() {
        let layout = build(
            r#"<PK SC="10" VK="VK_Q"><Result Text="@" With="VK_MENU VK_CONTROL"/></PK>"#,
        )
        .unwrap();
        assert_eq!(layout.key(ModifierState::ControlMenu, 0x10).unwrap().text, "@");
    }

    #[test]
    fn test_unknown_modifier_combination_is_rejected() {
        let err =
            build(r#"<PK SC="10" VK="VK_Q"><Result Text="q" With="VK_MENU"/></PK>"#).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Invariant(InvariantViolation::UnknownModifierState("VK_MENU".to_string()))
        );
    }

    #[test]
    fn test_derived_state_cannot_be_declared() {
        let err = build(
            r#"<PK SC="10" VK="VK_Q"><Result Text="Q" With="VK_CAPITAL VK_NUMLOCK"/></PK>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Invariant(InvariantViolation::UnknownModifierState(_))
        ));
    }

    // ── Right Control as OEM8 ─────────────────────────────────────────────────

    #[test]
    fn test_right_control_as_oem8_sets_flag_after_oem8_level() {
        let layout = build(
            r#"<PK SC="1E" VK="VK_A"><Result Text="æ" With="VK_OEM_8"/></PK>
               <PK SC="E01D" VK="VK_OEM_8"/>"#,
        )
        .unwrap();
        assert!(layout.has_right_ctrl_like_oem8());
        assert!(layout.key(ModifierState::Base, 0x9D).is_some());
    }

    #[test]
    fn test_right_control_as_oem8_without_oem8_level_is_rejected() {
        let err = build(r#"<PK SC="E01D" VK="VK_OEM_8"/>"#).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Invariant(InvariantViolation::RightControlWithoutOem8Level)
        );
    }

    #[test]
    fn test_keyless_oem8_outside_right_control_is_rejected() {
        let err = build(
            r#"<PK SC="1E" VK="VK_A"><Result Text="æ" With="VK_OEM_8"/></PK>
               <PK SC="1D" VK="VK_OEM_8"/>"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LayoutError::Invariant(InvariantViolation::Oem8NotOnRightControl(0x1D))
        );
    }

    #[test]
    fn test_oem8_level_after_right_control_quirk_is_rejected() {
        let err = build(
            r#"<PK SC="1E" VK="VK_A"><Result Text="æ" With="VK_OEM_8"/></PK>
               <PK SC="E01D" VK="VK_OEM_8"/>
               <PK SC="1F" VK="VK_S"><Result Text="ß" With="VK_SHIFT VK_OEM_8"/></PK>"#,
        )
        .unwrap_err();
        assert_eq!(err, LayoutError::Invariant(InvariantViolation::Oem8AfterRightControl));
    }

    // ── Dead keys ─────────────────────────────────────────────────────────────

    #[test]
    fn test_dead_key_result_records_accent_and_table() {
        let layout = build(
            r#"<PK SC="0D" VK="VK_OEM_PLUS">
                 <Result With="VK_SHIFT">
                   <DeadKeyTable Accent="`" Name="GRAVE">
                     <Result Text="à" With="a"/>
                     <Result Text="`" With=" "/>
                   </DeadKeyTable>
                 </Result>
               </PK>"#,
        )
        .unwrap();

        let key = layout.key(ModifierState::Shift, 0x0D).unwrap();
        assert!(key.is_dead_key());
        assert_eq!(key.text, "`");
        assert_eq!(key.codepoint, 0x60);
        assert_eq!(key.vk, None);
        assert_eq!(key.deadkeys.len(), 2);
        assert_eq!(key.deadkeys.get("`", "a").unwrap().text(), "à");
    }

    #[test]
    fn test_dead_key_result_with_vk_is_rejected() {
        let err = build(
            r#"<PK SC="0D" VK="VK_OEM_PLUS">
                 <Result VK="VK_OEM_PLUS"><DeadKeyTable Accent="`"><Result Text="à" With="a"/></DeadKeyTable></Result>
               </PK>"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LayoutError::Invariant(InvariantViolation::DeadKeyWithVirtualKey { scancode: 0x0D })
        );
    }

    #[test]
    fn test_dead_key_result_with_two_tables_is_rejected() {
        let err = build(
            r#"<PK SC="0D" VK="VK_OEM_PLUS">
                 <Result>
                   <DeadKeyTable Accent="`"><Result Text="à" With="a"/></DeadKeyTable>
                   <DeadKeyTable Accent="´"><Result Text="á" With="a"/></DeadKeyTable>
                 </Result>
               </PK>"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LayoutError::Invariant(InvariantViolation::DeadKeyChildCount { found: 2 })
        );
    }

    #[test]
    fn test_text_result_with_children_is_rejected() {
        let err = build(
            r#"<PK SC="0D" VK="VK_OEM_PLUS">
                 <Result Text="="><DeadKeyTable Accent="`"><Result Text="à" With="a"/></DeadKeyTable></Result>
               </PK>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Invariant(InvariantViolation::UnexpectedChildren { .. })
        ));
    }

    // ── Schema strictness and trace ───────────────────────────────────────────

    #[test]
    fn test_unknown_result_attribute_is_schema_error() {
        let err = build(r#"<PK SC="1E" VK="VK_A"><Result Text="a" Colour="red"/></PK>"#).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Schema(SchemaError::UnknownAttribute {
                tag: "Result".to_string(),
                attribute: "Colour".to_string()
            })
        );
    }

    #[test]
    fn test_unexpected_element_in_key_list_is_tag_mismatch() {
        let err = build(r#"<Key SC="1E" VK="VK_A"/>"#).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Schema(SchemaError::TagMismatch { expected: "PK", .. })
        ));
    }

    #[test]
    fn test_trace_sees_every_validated_element() {
        let root = Element::parse_document(
            document(r#"<PK SC="1E" VK="VK_A"><Result Text="a"/><Result Text="A" With="VK_SHIFT"/></PK>"#)
                .as_bytes(),
        )
        .unwrap();
        let mut trace = RecordingTrace::new();
        build_layout(&root, &mut trace).unwrap();

        let names: Vec<_> = trace.records.iter().map(|r| r.element.as_str()).collect();
        assert_eq!(names, ["metadata", "PK", "Result", "Result"]);
    }
}
