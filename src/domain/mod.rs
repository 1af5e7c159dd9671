//! Transport-agnostic domain types for arenas, entries, and activity.

mod activity;
mod arena;
mod id;
mod identity;

pub mod stakes;

// Core domain types
pub use activity::{ActivityEntry, ActivityLog};
pub use arena::{Arena, ArenaStatus, Entry};
pub use id::{ActivityId, ArenaId, EntryId, ParticipantId};
pub use identity::Identity;
