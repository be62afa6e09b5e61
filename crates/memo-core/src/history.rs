//! Bounded, newest-first log of past conversions.
//!
//! A `HistoryLog` belongs to one session. The pipeline only appends to it;
//! the presentation layer reads and clears it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    timestamp: String,
    input: String,
    output: String,
    unconfirmed: Option<String>,
}

impl HistoryEntry {
    /// Stamp a new entry with the local time.
    pub fn new(
        input: impl Into<String>,
        output: impl Into<String>,
        unconfirmed: Option<String>,
    ) -> Self {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self::with_timestamp(timestamp, input, output, unconfirmed)
    }

    pub fn with_timestamp(
        timestamp: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        unconfirmed: Option<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            input: input.into(),
            output: output.into(),
            unconfirmed,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn unconfirmed(&self) -> Option<&str> {
        self.unconfirmed.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// A zero capacity is raised to one so the latest entry is always kept.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the head, then drop entries past capacity from the tail.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> + '_ {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the log, newest first.
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}
