//! Human-readable layout dump.
//!
//! ```text
//! KLID: 0x00000409
//! LocaleName: en-US
//! DisplayName: US
//! ProxyName: en-US
//! RightCtrlLikeOem8: no
//! normal
//!   0x00 -
//!   0x1E: codepoint=0x0061 text='a' vk='VK_A'
//!   ...
//! extra:
//!   0xE11D Key(vk='VK_PAUSE')
//! ```

use std::fmt;

use kbdlayout_core::{DeadKeyResult, DeadKeyTable, Key, KeyLayout};

/// Formats every keymap of a layout, one line per slot.
pub struct LayoutReport<'a>(pub &'a KeyLayout);

impl fmt::Display for LayoutReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = self.0;
        writeln!(f, "KLID: {}", layout.klid())?;
        writeln!(f, "LocaleName: {}", layout.locale_name())?;
        writeln!(f, "DisplayName: {}", layout.display_name())?;
        writeln!(f, "ProxyName: {}", layout.proxy_name().unwrap_or("-"))?;
        writeln!(
            f,
            "RightCtrlLikeOem8: {}",
            if layout.has_right_ctrl_like_oem8() { "yes" } else { "no" }
        )?;

        for (state, keymap) in layout.keymaps() {
            writeln!(f, "{state}")?;
            for (index, slot) in keymap.slots().iter().enumerate() {
                match slot {
                    Some(key) => write_key(f, index, key)?,
                    None => writeln!(f, "  0x{index:02X} -")?,
                }
            }
        }

        writeln!(f, "extra:")?;
        for (raw, key) in layout.extra_scancodes() {
            writeln!(f, "  0x{raw:04X} Key(vk='{}')", key.vk.as_deref().unwrap_or(""))?;
        }
        Ok(())
    }
}

fn write_key(f: &mut fmt::Formatter<'_>, index: usize, key: &Key) -> fmt::Result {
    writeln!(
        f,
        "  0x{index:02X}: codepoint=0x{:04x} text='{}' vk='{}'",
        key.codepoint,
        printable(key.codepoint, &key.text),
        key.vk.as_deref().unwrap_or("")
    )?;
    if key.is_dead_key() {
        writeln!(f, "       DeadKeys:")?;
        write_dead_keys(f, &key.deadkeys, 1)?;
    }
    Ok(())
}

fn write_dead_keys(f: &mut fmt::Formatter<'_>, table: &DeadKeyTable, depth: usize) -> fmt::Result {
    let indent = "    ".repeat(depth);
    for dk in table.iter() {
        match &dk.result {
            DeadKeyResult::Literal { text, codepoint } => writeln!(
                f,
                "       {indent}{} + {} => '{}' (0x{codepoint:04x})",
                dk.accent,
                dk.with,
                printable(*codepoint, text)
            )?,
            DeadKeyResult::Composite(nested) => {
                writeln!(f, "       {indent}{} + {} =>", dk.accent, dk.with)?;
                write_dead_keys(f, nested, depth + 1)?;
            }
        }
    }
    Ok(())
}

/// Text safe to print on one line: C escapes for BEL..CR, nothing for other
/// control characters and DEL.
fn printable(codepoint: u32, text: &str) -> &str {
    const ESCAPES: [&str; 7] = ["\\a", "\\b", "\\t", "\\n", "\\v", "\\f", "\\r"];
    match codepoint {
        0x07..=0x0D => ESCAPES[(codepoint - 0x07) as usize],
        0x01..=0x1F | 0x7F => "",
        _ => text,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
