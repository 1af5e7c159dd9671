//! Wire messages carried between observers and the engine.
//!
//! Both directions are closed, internally tagged unions so the command and
//! event sets are exhaustive at compile time - never an open-ended untyped
//! payload.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{ActivityEntry, Arena, ArenaId, EntryId, Identity};
use crate::engine::Payout;

/// Observer-initiated commands relayed into the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Announce presence. Activity only, no state mutation.
    Join { identity: Identity },

    /// Open a new arena around a statement.
    CreateArena { identity: Identity, statement: String },

    /// Submit a competing entry to an active arena.
    SubmitEntry {
        arena_id: ArenaId,
        identity: Identity,
        content: String,
    },

    /// Back an entry with additional stake.
    AddBacking {
        arena_id: ArenaId,
        entry_id: EntryId,
        identity: Identity,
        amount: Decimal,
    },
}

/// Engine events fanned out to every connected observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Full snapshot of the arena collection, newest first. Sent to a
    /// newly connected observer and after every successful mutation.
    StateUpdate { arenas: Vec<Arena> },

    /// One new activity log line. New observers additionally receive a
    /// bounded backlog at connect time.
    ActivityUpdate { entry: ActivityEntry },

    /// Advisory payout instructions for one resolved arena.
    Settlement {
        arena_id: ArenaId,
        payouts: Vec<Payout>,
    },

    /// A command from this session failed. Sent only to the offending
    /// session, never broadcast.
    CommandFailed { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::domain::ParticipantId;

    fn identity(id: &str, name: &str) -> Identity {
        Identity::new(ParticipantId::new(id), name, format!("@{name}"))
    }

    #[test]
    fn commands_round_trip_through_json() {
        let command = ClientCommand::AddBacking {
            arena_id: ArenaId::from("arena-1"),
            entry_id: EntryId::from("entry-1"),
            identity: identity("u-1", "Dana"),
            amount: dec!(0.01),
        };

        let json = serde_json::to_string(&command).unwrap();
        let back: ClientCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, command);
    }

    #[test]
    fn command_tag_is_snake_case() {
        let command = ClientCommand::CreateArena {
            identity: identity("u-1", "Dana"),
            statement: "hot take".into(),
        };

        let value: serde_json::Value = serde_json::to_value(&command).unwrap();
        assert_eq!(value["type"], "create_arena");
        assert_eq!(value["statement"], "hot take");
    }

    #[test]
    fn unknown_command_tag_is_rejected() {
        let result: Result<ClientCommand, _> =
            serde_json::from_str(r#"{"type":"drop_table","identity":null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn state_update_carries_full_arenas() {
        let event = ServerEvent::StateUpdate { arenas: Vec::new() };
        let value: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "state_update");
        assert!(value["arenas"].as_array().unwrap().is_empty());
    }

    #[test]
    fn command_failed_round_trips() {
        let event = ServerEvent::CommandFailed {
            reason: "arena not found: a".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ServerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
