//! Dead-key composition tables.
//!
//! A dead key produces no output when pressed; it waits for the next key and
//! composes with it.  Each entry of a [`DeadKeyTable`] is keyed by
//! `(accent, with)`: the accent of the table and the character typed next.
//! The entry either yields text ([`DeadKeyResult::Literal`]) or, for a double
//! dead key, opens another table ([`DeadKeyResult::Composite`]).

use indexmap::IndexMap;
use serde::Serialize;

/// What a dead-key entry produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadKeyResult {
    /// Final output.  `codepoint` is 0 for empty or multi-character text.
    Literal { text: String, codepoint: u32 },
    /// A further dead key: one more keystroke is needed.
    Composite(DeadKeyTable),
}

/// One composition rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadKey {
    pub accent: String,
    pub with: String,
    pub result: DeadKeyResult,
}

impl DeadKey {
    /// Output text, empty for a double dead key.
    pub fn text(&self) -> &str {
        match &self.result {
            DeadKeyResult::Literal { text, .. } => text,
            DeadKeyResult::Composite(_) => "",
        }
    }

    /// Output codepoint, 0 for a double dead key.
    pub fn codepoint(&self) -> u32 {
        match &self.result {
            DeadKeyResult::Literal { codepoint, .. } => *codepoint,
            DeadKeyResult::Composite(_) => 0,
        }
    }

    /// Nested table of a double dead key.
    pub fn nested(&self) -> Option<&DeadKeyTable> {
        match &self.result {
            DeadKeyResult::Literal { .. } => None,
            DeadKeyResult::Composite(table) => Some(table),
        }
    }
}

/// Composition rules in document order, keyed by `(accent, with)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadKeyTable {
    entries: IndexMap<(String, String), DeadKey>,
}

impl DeadKeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `dead_key`, returning it back if its `(accent, with)` pair is taken.
    pub fn insert(&mut self, dead_key: DeadKey) -> Result<(), DeadKey> {
        let id = (dead_key.accent.clone(), dead_key.with.clone());
        if self.entries.contains_key(&id) {
            return Err(dead_key);
        }
        self.entries.insert(id, dead_key);
        Ok(())
    }

    pub fn get(&self, accent: &str, with: &str) -> Option<&DeadKey> {
        self.entries.get(&(accent.to_string(), with.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the rules in document order.
    pub fn iter(&self) -> impl Iterator<Item = &DeadKey> {
        self.entries.values()
    }
}

impl Serialize for DeadKeyTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
