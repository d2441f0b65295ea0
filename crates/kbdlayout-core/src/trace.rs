//! Injectable trace of every validated element.
//!
//! Each time the schema validator accepts an element it reports the element
//! name and its resolved attributes (including absent optional ones) to a
//! [`TraceSink`].  The sink is supplied by the caller; the parser owns no
//! logging state of its own.

/// Receiver of per-element trace records.
pub trait TraceSink {
    /// Called once per validated element, attributes in schema order.
    fn record(&mut self, element: &str, attributes: &[(&str, Option<&str>)]);
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn record(&mut self, _element: &str, _attributes: &[(&str, Option<&str>)]) {}
}

/// Forwards records to `tracing` as `TRACE` events on target `kbdlayout::schema`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&mut self, element: &str, attributes: &[(&str, Option<&str>)]) {
        tracing::trace!(target: "kbdlayout::schema", element, attributes = ?attributes);
    }
}

/// One element seen by a [`RecordingTrace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    pub element: String,
    pub attributes: Vec<(String, Option<String>)>,
}

/// Keeps every record in memory, in the order the elements were validated.
#[derive(Debug, Default, Clone)]
pub struct RecordingTrace {
    pub records: Vec<TraceRecord>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for elements named `element`.
    pub fn of(&self, element: &str) -> impl Iterator<Item = &TraceRecord> {
        let element = element.to_string();
        self.records.iter().filter(move |r| r.element == element)
    }
}

impl TraceSink for RecordingTrace {
    fn record(&mut self, element: &str, attributes: &[(&str, Option<&str>)]) {
        self.records.push(TraceRecord {
            element: element.to_string(),
            attributes: attributes
                .iter()
                .map(|(name, value)| (name.to_string(), value.map(str::to_string)))
                .collect(),
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
