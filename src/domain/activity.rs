//! Bounded, newest-first activity log.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ActivityId;
use super::stakes::ACTIVITY_LOG_BOUND;

/// One human-readable activity line. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    id: ActivityId,
    message: String,
    timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    pub(crate) fn new(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: ActivityId::new(),
            message: message.into(),
            timestamp: now,
        }
    }

    /// Get the activity ID.
    #[must_use]
    pub const fn id(&self) -> &ActivityId {
        &self.id
    }

    /// Get the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Append-only ring of the most recent activity entries, newest first.
///
/// Entries are never edited or removed except by eviction from the back
/// when the bound is exceeded.
#[derive(Debug)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    bound: usize,
}

impl ActivityLog {
    /// Create an empty log with the standard bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_bound(ACTIVITY_LOG_BOUND)
    }

    /// Create an empty log with an explicit bound.
    #[must_use]
    pub fn with_bound(bound: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(bound),
            bound,
        }
    }

    /// Append a new entry at the front, evicting the oldest past the bound.
    pub(crate) fn push(&mut self, message: impl Into<String>, now: DateTime<Utc>) -> ActivityEntry {
        let entry = ActivityEntry::new(message, now);
        self.entries.push_front(entry.clone());
        self.entries.truncate(self.bound);
        entry
    }

    /// Get the retained entries, newest first.
    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    /// Get the `n` most recent entries, newest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<ActivityEntry> {
        self.entries.iter().take(n).cloned().collect()
    }

    /// Get the number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}
