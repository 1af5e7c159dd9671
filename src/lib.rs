//! Hotseat - real-time settlement engine for staked hot-take arenas.
//!
//! A participant posts a provocative statement and stakes a deposit;
//! others respond with competing entries and back any entry with
//! additional stake. After a fixed five-minute window the arena resolves:
//! a single winner is selected deterministically and advisory payout
//! shares are computed for backers, the winning entrant, and the
//! originator. Every connected observer converges on the same state
//! through full-snapshot broadcasts.
//!
//! # Architecture
//!
//! - **[`domain`]** - arenas, entries, identities, the bounded activity
//!   log, and the fixed stake constants
//! - **[`engine`]** - the authoritative store, the pure resolution and
//!   payout algorithm, and the periodic settlement clock
//! - **[`gateway`]** - WebSocket fan-out of state/activity events and
//!   relay of observer commands, with per-session advisory balances
//! - **[`config`]** - TOML configuration for the serving surface
//! - **[`error`]** - error types for the crate
//!
//! State is process-lifetime only: nothing is persisted, balances are
//! advisory, and identity is self-asserted.

pub mod app;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod gateway;
