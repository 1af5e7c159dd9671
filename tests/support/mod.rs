//! Shared builders for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};

use hotseat::domain::stakes::ARENA_DURATION_SECS;
use hotseat::domain::{Identity, ParticipantId};

pub fn identity(id: &str, name: &str) -> Identity {
    Identity::new(ParticipantId::new(id), name, format!("@{name}"))
}

/// A creation timestamp far enough in the past that the arena is already
/// due for settlement.
pub fn expired_creation_time() -> DateTime<Utc> {
    Utc::now() - Duration::seconds(ARENA_DURATION_SECS + 1)
}
