//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for an arena.
///
/// Generated as UUID v4 at creation, or constructed from an existing
/// string for deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArenaId(String);

impl ArenaId {
    /// Create a new `ArenaId` with a generated UUID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the arena ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ArenaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ArenaId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ArenaId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a competing entry within an arena.
///
/// Generated as UUID v4 at submission, or constructed from an existing
/// string for deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    /// Create a new `EntryId` with a generated UUID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the entry ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for an activity log entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityId(String);

impl ActivityId {
    /// Create a new `ActivityId` with a generated UUID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the activity ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ActivityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Participant identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors. Identity is self-asserted, so this is the
/// key for backing attribution and payout addressing, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a new `ParticipantId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the participant ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_id_generates_unique_ids() {
        let id1 = ArenaId::new();
        let id2 = ArenaId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn arena_id_as_str_returns_uuid_format() {
        let id = ArenaId::new();
        // UUID v4 format: 8-4-4-4-12 hex chars
        assert_eq!(id.as_str().len(), 36);
        assert!(id.as_str().chars().filter(|c| *c == '-').count() == 4);
    }

    #[test]
    fn arena_id_from_string() {
        let id = ArenaId::from("existing-arena".to_string());
        assert_eq!(id.as_str(), "existing-arena");
    }

    #[test]
    fn arena_id_display() {
        let id = ArenaId::from("display-test");
        assert_eq!(format!("{}", id), "display-test");
    }

    #[test]
    fn entry_id_generates_unique_ids() {
        let id1 = EntryId::new();
        let id2 = EntryId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn entry_id_from_str() {
        let id = EntryId::from("entry-7");
        assert_eq!(id.as_str(), "entry-7");
    }

    #[test]
    fn activity_id_generates_unique_ids() {
        let id1 = ActivityId::new();
        let id2 = ActivityId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn participant_id_new_and_as_str() {
        let id = ParticipantId::new("user-42");
        assert_eq!(id.as_str(), "user-42");
    }

    #[test]
    fn participant_id_display() {
        let id = ParticipantId::new("user-42");
        assert_eq!(format!("{}", id), "user-42");
    }
}
