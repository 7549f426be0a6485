use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::model::analysis::Analysis;
use crate::model::parameters::GenerationParameters;

pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub story: String,
    pub parameters: GenerationParameters,
    pub timestamp: DateTime<Local>,
    pub analysis: Analysis,
    pub is_fallback: bool,
}

/// Most-recent-first ledger of generation attempts.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl HistoryStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        if self.entries.len() > self.capacity {
            let evicted = self.entries.len() - self.capacity;
            self.entries.truncate(self.capacity);
            tracing::debug!(evicted, "history trimmed to capacity");
        }
    }

    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            story: format!("story {n}"),
            parameters: GenerationParameters::default(),
            timestamp: Local::now(),
            analysis: Analysis::default(),
            is_fallback: false,
        }
    }

    #[test]
    fn eleventh_insert_evicts_oldest() {
        let mut store = HistoryStore::default();
        for n in 1..=11 {
            store.record(entry(n));
        }

        assert_eq!(store.len(), 10);
        assert_eq!(store.list()[0].story, "story 11");
        assert_eq!(store.list()[9].story, "story 2");
        assert!(store.list().iter().all(|e| e.story != "story 1"));

        store.clear();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
    }

    #[test]
    fn get_indexes_from_most_recent() {
        let mut store = HistoryStore::default();
        store.record(entry(1));
        store.record(entry(2));
        assert_eq!(store.get(0).map(|e| e.story.as_str()), Some("story 2"));
        assert!(store.get(2).is_none());
    }
}
