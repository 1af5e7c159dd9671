//! Arena and entry records.
//!
//! - [`Arena`] - one time-boxed contest with its competing entries
//! - [`Entry`] - a competing submission and the stake backing it
//! - [`ArenaStatus`] - `Active` until the deadline passes, then `Resolved`
//!
//! Mutation is `pub(crate)`: everything outside the engine goes through
//! the store contract, never direct field mutation.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

use super::id::{ArenaId, EntryId, ParticipantId};
use super::identity::Identity;
use super::stakes::{ARENA_DURATION_SECS, CREATION_STAKE, ENTRY_FEE};

/// Lifecycle state of an arena. Monotonic: `Active` → `Resolved`, once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArenaStatus {
    Active,
    Resolved,
}

/// A competing submission within an arena.
///
/// `backed_total` is the aggregate stake across all backers and always
/// equals the sum of the per-backer attribution map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    id: EntryId,
    author: Identity,
    content: String,
    entry_stake: Decimal,
    backed_total: Decimal,
    backers: HashMap<ParticipantId, Decimal>,
}

impl Entry {
    pub(crate) fn new(author: Identity, content: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            author,
            content: content.into(),
            entry_stake: ENTRY_FEE,
            backed_total: Decimal::ZERO,
            backers: HashMap::new(),
        }
    }

    /// Get the entry ID.
    #[must_use]
    pub const fn id(&self) -> &EntryId {
        &self.id
    }

    /// Get the entrant's identity.
    #[must_use]
    pub const fn author(&self) -> &Identity {
        &self.author
    }

    /// Get the entry content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the fixed fee paid at submission.
    #[must_use]
    pub const fn entry_stake(&self) -> Decimal {
        self.entry_stake
    }

    /// Get the aggregate stake backing this entry.
    #[must_use]
    pub const fn backed_total(&self) -> Decimal {
        self.backed_total
    }

    /// Get the per-backer attribution map (participant id → cumulative amount).
    #[must_use]
    pub const fn backers(&self) -> &HashMap<ParticipantId, Decimal> {
        &self.backers
    }

    pub(crate) fn add_backing(&mut self, backer: &ParticipantId, amount: Decimal) {
        *self.backers.entry(backer.clone()).or_insert(Decimal::ZERO) += amount;
        self.backed_total += amount;
    }
}

/// One time-boxed contest: a staked statement, its competing entries, and
/// the stake backing each.
///
/// The deadline is fixed at creation (`created_at + 5min`) and never
/// mutated. Entries and backing may only be added while `Active`; once
/// `Resolved` every mutation is rejected, never silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    id: ArenaId,
    originator: Identity,
    statement: String,
    originator_stake: Decimal,
    created_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
    status: ArenaStatus,
    winning_entry_id: Option<EntryId>,
    entries: Vec<Entry>,
}

impl Arena {
    pub(crate) fn new(originator: Identity, statement: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: ArenaId::new(),
            originator,
            statement: statement.into(),
            originator_stake: CREATION_STAKE,
            created_at: now,
            deadline: now + Duration::seconds(ARENA_DURATION_SECS),
            status: ArenaStatus::Active,
            winning_entry_id: None,
            entries: Vec::new(),
        }
    }

    /// Get the arena ID.
    #[must_use]
    pub const fn id(&self) -> &ArenaId {
        &self.id
    }

    /// Get the originator's identity.
    #[must_use]
    pub const fn originator(&self) -> &Identity {
        &self.originator
    }

    /// Get the statement under contest.
    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Get the deposit paid at creation.
    #[must_use]
    pub const fn originator_stake(&self) -> Decimal {
        self.originator_stake
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the fixed resolution deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Get the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ArenaStatus {
        self.status
    }

    /// Get the winning entry ID, set only on resolution with ≥1 entry.
    #[must_use]
    pub const fn winning_entry_id(&self) -> Option<&EntryId> {
        self.winning_entry_id.as_ref()
    }

    /// Get all entries in submission order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Look up an entry by ID.
    #[must_use]
    pub fn entry(&self, entry_id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id() == entry_id)
    }

    /// Check whether the arena still accepts entries and backing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ArenaStatus::Active
    }

    /// Check whether the arena is active with an expired deadline.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && now >= self.deadline
    }

    pub(crate) fn push_entry(
        &mut self,
        author: Identity,
        content: impl Into<String>,
    ) -> Result<&Entry, EngineError> {
        if !self.is_active() {
            return Err(EngineError::ArenaClosed {
                id: self.id.to_string(),
            });
        }
        self.entries.push(Entry::new(author, content));
        Ok(self.entries.last().expect("entry just pushed"))
    }

    pub(crate) fn back_entry(
        &mut self,
        entry_id: &EntryId,
        backer: &ParticipantId,
        amount: Decimal,
    ) -> Result<&Entry, EngineError> {
        if !self.is_active() {
            return Err(EngineError::ArenaClosed {
                id: self.id.to_string(),
            });
        }
        if amount <= Decimal::ZERO {
            return Err(EngineError::NonPositiveStake { amount });
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id() == entry_id)
            .ok_or_else(|| EngineError::EntryNotFound {
                id: entry_id.to_string(),
            })?;
        entry.add_backing(backer, amount);
        Ok(entry)
    }

    /// Transition to `Resolved`. Caller guards that the arena is active.
    pub(crate) fn resolve(&mut self, winning_entry_id: Option<EntryId>) {
        debug_assert!(self.is_active(), "arena resolved twice");
        self.status = ArenaStatus::Resolved;
        self.winning_entry_id = winning_entry_id;
    }
}
