//! In-memory shared chronicle adapter

use std::sync::RwLock;

use crate::application::ports::outbound::ChroniclePort;
use crate::domain::events::ChronicleEntry;

/// An append-only in-memory chronicle with a bounded retained window.
///
/// The session only ever needs the recent tail for display; older entries
/// are dropped oldest-first once the capacity is exceeded.
pub struct InMemoryChronicle {
    entries: RwLock<Vec<ChronicleEntry>>,
    max_entries: usize,
}

impl InMemoryChronicle {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Snapshot of the retained entries, oldest first.
    pub fn entries(&self) -> Vec<ChronicleEntry> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryChronicle {
    fn default() -> Self {
        Self::new(200)
    }
}

impl ChroniclePort for InMemoryChronicle {
    fn append(&self, entry: ChronicleEntry) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.push(entry);
        if entries.len() > self.max_entries {
            let excess = entries.len() - self.max_entries;
            entries.drain(0..excess);
        }
    }
}
