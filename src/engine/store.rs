//! Authoritative arena store.
//!
//! Owns the arena-id → arena mapping plus creation order. Every mutation is
//! atomic with respect to the single arena it touches: a failed command
//! returns a typed error and leaves the store unchanged.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::domain::{Arena, ArenaId, Entry, EntryId, Identity, ParticipantId};
use crate::error::EngineError;

/// Index of all arenas, live and resolved, by ID and by creation order.
///
/// Arenas are never deleted: a `Resolved` arena remains addressable for
/// audit and history even though it drops out of the live view.
#[derive(Debug, Default)]
pub struct ArenaStore {
    arenas: HashMap<ArenaId, Arena>,
    order: Vec<ArenaId>,
}

impl ArenaStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            arenas: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Create a new active arena with a fixed deadline.
    pub fn create_arena(
        &mut self,
        originator: Identity,
        statement: impl Into<String>,
        now: DateTime<Utc>,
    ) -> &Arena {
        let arena = Arena::new(originator, statement, now);
        let id = arena.id().clone();
        self.order.push(id.clone());
        self.arenas.entry(id).or_insert(arena)
    }

    /// Append a competing entry to an active arena.
    ///
    /// # Errors
    ///
    /// `ArenaNotFound` for an unknown ID, `ArenaClosed` once resolved.
    pub fn submit_entry(
        &mut self,
        arena_id: &ArenaId,
        author: Identity,
        content: impl Into<String>,
    ) -> Result<&Entry, EngineError> {
        self.arena_mut(arena_id)?.push_entry(author, content)
    }

    /// Add backing stake to an entry of an active arena, recording the
    /// per-backer contribution.
    ///
    /// # Errors
    ///
    /// `ArenaNotFound` / `EntryNotFound` for unknown IDs, `ArenaClosed`
    /// once resolved, `NonPositiveStake` for amounts ≤ 0.
    pub fn add_backing(
        &mut self,
        arena_id: &ArenaId,
        entry_id: &EntryId,
        backer: &ParticipantId,
        amount: Decimal,
    ) -> Result<&Entry, EngineError> {
        self.arena_mut(arena_id)?.back_entry(entry_id, backer, amount)
    }

    /// Transition an active arena to `Resolved`.
    pub(crate) fn resolve_arena(
        &mut self,
        arena_id: &ArenaId,
        winning_entry_id: Option<EntryId>,
    ) -> Result<(), EngineError> {
        let arena = self.arena_mut(arena_id)?;
        if !arena.is_active() {
            return Err(EngineError::ArenaClosed {
                id: arena_id.to_string(),
            });
        }
        arena.resolve(winning_entry_id);
        Ok(())
    }

    /// Look up an arena by ID.
    #[must_use]
    pub fn get(&self, arena_id: &ArenaId) -> Option<&Arena> {
        self.arenas.get(arena_id)
    }

    /// Get all active arenas, most recently created first.
    #[must_use]
    pub fn list_active(&self) -> Vec<&Arena> {
        self.in_reverse_creation_order()
            .filter(|a| a.is_active())
            .collect()
    }

    /// Get all resolved arenas, most recently created first.
    #[must_use]
    pub fn list_resolved(&self) -> Vec<&Arena> {
        self.in_reverse_creation_order()
            .filter(|a| !a.is_active())
            .collect()
    }

    /// Get IDs of active arenas whose deadline has passed.
    #[must_use]
    pub fn due_arenas(&self, now: DateTime<Utc>) -> Vec<ArenaId> {
        self.order
            .iter()
            .filter_map(|id| self.arenas.get(id))
            .filter(|a| a.is_due(now))
            .map(|a| a.id().clone())
            .collect()
    }

    /// Clone the full arena collection, most recently created first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arena> {
        self.in_reverse_creation_order().cloned().collect()
    }

    /// Get the number of arenas, live and resolved.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the store holds no arenas.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn in_reverse_creation_order(&self) -> impl Iterator<Item = &Arena> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.arenas.get(id))
    }

    fn arena_mut(&mut self, arena_id: &ArenaId) -> Result<&mut Arena, EngineError> {
        self.arenas
            .get_mut(arena_id)
            .ok_or_else(|| EngineError::ArenaNotFound {
                id: arena_id.to_string(),
            })
    }
}
