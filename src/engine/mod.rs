//! Arena Resolution & Settlement Engine.
//!
//! [`Engine`] is the single serialization point over the arena store and
//! activity log: every mutation, observer-driven or clock-driven, takes the
//! one state lock, runs to completion, and only then fans events out. No
//! lock is ever held across an await point, and no mutating operation does
//! blocking work.

mod clock;
mod resolution;
mod store;

pub use clock::SettlementClock;
pub use resolution::{resolve, Payout, PayoutReason, Resolution};
pub use store::ArenaStore;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::domain::stakes::ACTIVITY_REPLAY;
use crate::domain::{
    ActivityEntry, ActivityLog, Arena, ArenaId, EntryId, Identity, ParticipantId,
};
use crate::error::EngineError;
use crate::gateway::messages::ServerEvent;

/// Outbound event channel capacity. A lagging observer skips ahead to the
/// next full snapshot rather than stalling the engine.
const EVENT_CHANNEL_CAPACITY: usize = 256;

struct EngineState {
    store: ArenaStore,
    log: ActivityLog,
    settlements: Vec<Resolution>,
}

/// Owned engine handle: authoritative store, activity log, and the event
/// fan-out channel. Constructed once per running service and shared by
/// `Arc`, never a module-level global.
pub struct Engine {
    state: Mutex<EngineState>,
    events: broadcast::Sender<ServerEvent>,
}

impl Engine {
    /// Create an engine with an empty store and log.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(EngineState {
                store: ArenaStore::new(),
                log: ActivityLog::new(),
                settlements: Vec::new(),
            }),
            events,
        }
    }

    /// Subscribe to the outbound event stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.events.subscribe()
    }

    /// Snapshot served to a newly connected observer: the full arena
    /// collection plus the most recent activity backlog, newest first.
    #[must_use]
    pub fn connect_state(&self) -> (Vec<Arena>, Vec<ActivityEntry>) {
        let state = self.state.lock();
        (state.store.snapshot(), state.log.recent(ACTIVITY_REPLAY))
    }

    /// Record an observer joining. Activity only, no state mutation.
    pub fn join(&self, identity: &Identity, now: DateTime<Utc>) {
        let entry = {
            let mut state = self.state.lock();
            state
                .log
                .push(format!("{} joined the arena floor", identity.name()), now)
        };
        info!(participant = %identity.id(), "Observer joined");
        let _ = self.events.send(ServerEvent::ActivityUpdate { entry });
    }

    /// Create a new arena and broadcast the updated collection.
    pub fn create_arena(
        &self,
        originator: Identity,
        statement: impl Into<String>,
        now: DateTime<Utc>,
    ) -> ArenaId {
        let (arena_id, entry, arenas) = {
            let mut state = self.state.lock();
            let name = originator.name().to_string();
            let arena_id = state
                .store
                .create_arena(originator, statement, now)
                .id()
                .clone();
            let entry = state.log.push(format!("{name} dropped a new arena"), now);
            (arena_id, entry, state.store.snapshot())
        };
        info!(arena = %arena_id, "Arena created");
        self.broadcast_mutation(entry, arenas);
        arena_id
    }

    /// Submit a competing entry and broadcast the updated collection.
    ///
    /// # Errors
    ///
    /// `ArenaNotFound` / `ArenaClosed`. A failed command produces no
    /// broadcast and leaves the store unchanged.
    pub fn submit_entry(
        &self,
        arena_id: &ArenaId,
        author: Identity,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<EntryId, EngineError> {
        let (entry_id, entry, arenas) = {
            let mut state = self.state.lock();
            let name = author.name().to_string();
            let entry_id = state
                .store
                .submit_entry(arena_id, author, content)?
                .id()
                .clone();
            let entry = state.log.push(format!("{name} stepped into the arena"), now);
            (entry_id, entry, state.store.snapshot())
        };
        debug!(arena = %arena_id, entry = %entry_id, "Entry submitted");
        self.broadcast_mutation(entry, arenas);
        Ok(entry_id)
    }

    /// Add backing stake to an entry and broadcast the updated collection.
    ///
    /// # Errors
    ///
    /// `ArenaNotFound` / `EntryNotFound` / `ArenaClosed` /
    /// `NonPositiveStake`. A failed command produces no broadcast and
    /// leaves the store unchanged.
    pub fn add_backing(
        &self,
        arena_id: &ArenaId,
        entry_id: &EntryId,
        backer: &Identity,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let (entry, arenas) = {
            let mut state = self.state.lock();
            let author = state
                .store
                .add_backing(arena_id, entry_id, backer.id(), amount)?
                .author()
                .name()
                .to_string();
            let entry = state.log.push(
                format!("{} backed {author}'s take", backer.name()),
                now,
            );
            (entry, state.store.snapshot())
        };
        debug!(arena = %arena_id, entry = %entry_id, %amount, "Backing added");
        self.broadcast_mutation(entry, arenas);
        Ok(())
    }

    /// Resolve every active arena whose deadline has passed.
    ///
    /// Each arena resolves at most once: the `Resolved` transition is the
    /// guard against re-processing on later ticks. One `state_update` is
    /// broadcast only if at least one arena resolved.
    pub fn settle_due(&self, now: DateTime<Utc>) -> Vec<Resolution> {
        let (resolutions, activity, arenas) = {
            let mut state = self.state.lock();
            let due = state.store.due_arenas(now);
            let mut resolutions = Vec::with_capacity(due.len());
            let mut activity = Vec::with_capacity(due.len());

            for arena_id in due {
                let Some(arena) = state.store.get(&arena_id) else {
                    continue;
                };
                let resolution = resolution::resolve(arena);
                let message = match resolution.winning_entry_id() {
                    Some(winner_id) => {
                        let winner = arena
                            .entry(winner_id)
                            .map_or("an unknown entrant", |e| e.author().name());
                        format!("{winner} won the pool!")
                    }
                    None => format!("Arena by {} closed with no entries.", arena.originator().name()),
                };
                let winning = resolution.winning_entry_id().cloned();
                if state.store.resolve_arena(&arena_id, winning).is_err() {
                    continue;
                }
                activity.push(state.log.push(message, now));
                resolutions.push(resolution);
            }

            state.settlements.extend(resolutions.iter().cloned());
            let arenas = if resolutions.is_empty() {
                None
            } else {
                Some(state.store.snapshot())
            };
            (resolutions, activity, arenas)
        };

        for (resolution, entry) in resolutions.iter().zip(activity) {
            info!(
                arena = %resolution.arena_id(),
                winner = ?resolution.winning_entry_id().map(EntryId::as_str),
                payouts = resolution.payouts().len(),
                "Arena resolved"
            );
            let _ = self.events.send(ServerEvent::ActivityUpdate { entry });
            let _ = self.events.send(ServerEvent::Settlement {
                arena_id: resolution.arena_id().clone(),
                payouts: resolution.payouts().to_vec(),
            });
        }
        if let Some(arenas) = arenas {
            let _ = self.events.send(ServerEvent::StateUpdate { arenas });
        }

        resolutions
    }

    /// Every settlement computed so far, oldest first. Arenas are never
    /// deleted, so this is the complete audit trail; sessions that lagged
    /// behind the event stream use it to catch up on missed payouts.
    #[must_use]
    pub fn settlements(&self) -> Vec<Resolution> {
        self.state.lock().settlements.clone()
    }

    /// Read-only view of an arena, for tests and diagnostics.
    #[must_use]
    pub fn arena(&self, arena_id: &ArenaId) -> Option<Arena> {
        self.state.lock().store.get(arena_id).cloned()
    }

    /// Per-backer attribution for one entry, read from the authoritative
    /// store rather than reconstructed by any observer.
    #[must_use]
    pub fn backing_of(
        &self,
        arena_id: &ArenaId,
        entry_id: &EntryId,
        backer: &ParticipantId,
    ) -> Option<Decimal> {
        let state = self.state.lock();
        state
            .store
            .get(arena_id)
            .and_then(|a| a.entry(entry_id))
            .and_then(|e| e.backers().get(backer).copied())
    }

    fn broadcast_mutation(&self, entry: ActivityEntry, arenas: Vec<Arena>) {
        let _ = self.events.send(ServerEvent::ActivityUpdate { entry });
        let _ = self.events.send(ServerEvent::StateUpdate { arenas });
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
