//! Participant identity.

use serde::{Deserialize, Serialize};

use super::id::ParticipantId;

/// A self-asserted participant identity.
///
/// Nothing here is verified: the display name and handle are whatever the
/// observer claimed at join time. The `id` is the only field the engine
/// keys on (backing attribution, payout addressing).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    id: ParticipantId,
    name: String,
    handle: String,
}

impl Identity {
    /// Create a new identity.
    pub fn new(id: ParticipantId, name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            handle: handle.into(),
        }
    }

    /// Get the participant ID.
    #[must_use]
    pub const fn id(&self) -> &ParticipantId {
        &self.id
    }

    /// Get the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the handle.
    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }
}
