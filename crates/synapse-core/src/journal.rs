//! The player's journal: a bounded log of timestamped entries.
//!
//! Once the journal is full, appending evicts the oldest entry.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of entries kept.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 20;

/// What produced a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Written by the player with `journal add`.
    Note,
    /// Recorded automatically on discovering a room or a document.
    Discovery,
    /// Recorded automatically when a facility event fires.
    Event,
}

/// A single journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Where the entry came from.
    pub kind: EntryKind,
    /// The text.
    pub text: String,
    /// Turn number when the entry was written.
    pub turn: u32,
    /// Wall-clock time when the entry was written.
    pub timestamp: DateTime<Utc>,
}

impl JournalEntry {
    /// Create an entry stamped with the current time.
    pub fn now(kind: EntryKind, text: impl Into<String>, turn: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            turn,
            timestamp: Utc::now(),
        }
    }
}

/// A bounded, chronological journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    entries: VecDeque<JournalEntry>,
    capacity: usize,
}

impl Default for Journal {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_JOURNAL_CAPACITY)
    }
}

impl Journal {
    /// Create an empty journal keeping at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Append an entry, evicting the oldest when full. Returns the evicted entry.
    pub fn append(&mut self, entry: JournalEntry) -> Option<JournalEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    /// Maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the journal as plain text.
    pub fn export_text(&self) -> String {
        let mut out = String::from("Journal\n=======\n");
        for entry in &self.entries {
            let tag = match entry.kind {
                EntryKind::Note => "note",
                EntryKind::Discovery => "found",
                EntryKind::Event => "event",
            };
            out.push_str(&format!(
                "[turn {:>3}] {} ({tag}) {}\n",
                entry.turn,
                entry.timestamp.format("%H:%M:%S"),
                entry.text
            ));
        }
        out
    }
}
