//! Output sink boundary: write-only rendering of delivered values.
//!
//! The loader treats the sink purely as a collaborator it writes
//! `(identifier, text)` pairs to; nothing in the core ever reads a sink.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use ersatz_types::OutputId;

/// Accepts `(identifier, text)` and renders `text` at the slot named by
/// `identifier`.
pub trait OutputSink: Send + Sync {
    fn render(&self, target: &OutputId, text: &str);
}

/// In-memory sink with a monotonic revision counter.
///
/// The revision is bumped on every render, so consumers (and tests) can use
/// it as a cheap change detector without diffing the entries.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(OutputId, String)>>,
    revision: AtomicUsize,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn revision(&self) -> usize {
        self.revision.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    /// Snapshot of all rendered entries, in render order.
    #[must_use]
    pub fn entries(&self) -> Vec<(OutputId, String)> {
        self.lock_entries().clone()
    }

    /// Most recently rendered text for `target`, if any.
    #[must_use]
    pub fn text_for(&self, target: &OutputId) -> Option<String> {
        self.lock_entries()
            .iter()
            .rev()
            .find(|(id, _)| id == target)
            .map(|(_, text)| text.clone())
    }

    fn lock_entries(&self) -> MutexGuard<'_, Vec<(OutputId, String)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputSink for MemorySink {
    fn render(&self, target: &OutputId, text: &str) {
        self.lock_entries().push((target.clone(), text.to_string()));
        self.revision.fetch_add(1, Ordering::Release);
    }
}

/// Line-oriented sink for the demo binary: one `identifier: text` line per
/// render.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn render(&self, target: &OutputId, text: &str) {
        println!("{target}: {text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(name: &str) -> OutputId {
        OutputId::new(name).expect("non-empty slot name")
    }

    #[test]
    fn starts_empty_at_revision_zero() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.revision(), 0);
        assert_eq!(sink.text_for(&slot("output")), None);
    }

    #[test]
    fn render_records_entry_and_bumps_revision() {
        let sink = MemorySink::new();
        sink.render(&slot("output"), "Data loaded");

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.revision(), 1);
        assert_eq!(sink.text_for(&slot("output")), Some("Data loaded".into()));
    }

    #[test]
    fn text_for_returns_latest_render() {
        let sink = MemorySink::new();
        sink.render(&slot("output"), "first");
        sink.render(&slot("other"), "elsewhere");
        sink.render(&slot("output"), "second");

        assert_eq!(sink.text_for(&slot("output")), Some("second".into()));
        assert_eq!(sink.text_for(&slot("other")), Some("elsewhere".into()));
        assert_eq!(sink.revision(), 3);
    }

    #[test]
    fn entries_preserve_render_order() {
        let sink = MemorySink::new();
        sink.render(&slot("a"), "1");
        sink.render(&slot("b"), "2");

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (slot("a"), "1".into()));
        assert_eq!(entries[1], (slot("b"), "2".into()));
    }
}
