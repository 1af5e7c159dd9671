//! Per-connection session state.
//!
//! Balances are advisory and live at the session boundary, not in the
//! store: `InsufficientStake` is checked here before a command is relayed,
//! and settlement events credit the session whose identity they name. The
//! engine itself never holds or transfers funds.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::domain::stakes::STARTING_GRANT;
use crate::domain::{ArenaId, Identity};
use crate::engine::Payout;
use crate::error::EngineError;

/// One observer's connection-scoped state: claimed identity, advisory
/// balance, and the arenas whose settlements have already been credited.
#[derive(Debug)]
pub struct Session {
    identity: Option<Identity>,
    balance: Decimal,
    credited: HashSet<ArenaId>,
}

impl Session {
    /// Create a fresh session with the starting grant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            identity: None,
            balance: STARTING_GRANT,
            credited: HashSet::new(),
        }
    }

    /// Get the identity claimed at join time, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Get the advisory balance.
    #[must_use]
    pub const fn balance(&self) -> Decimal {
        self.balance
    }

    /// Record the identity this session asserted.
    pub fn join(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Check the advisory balance covers `required`.
    ///
    /// # Errors
    ///
    /// `InsufficientStake` when it does not. The balance is untouched;
    /// call [`Session::debit`] after the relayed command succeeds.
    pub fn ensure_funds(&self, required: Decimal) -> Result<(), EngineError> {
        if self.balance < required {
            return Err(EngineError::InsufficientStake {
                required,
                available: self.balance,
            });
        }
        Ok(())
    }

    /// Debit the advisory balance after a successful command.
    pub fn debit(&mut self, amount: Decimal) {
        self.balance -= amount;
    }

    /// Credit every payout addressed to this session's identity.
    ///
    /// Each arena settles exactly once, so the session credits it at most
    /// once no matter how often its settlement is seen (live, then again
    /// during a lag resync). Returns the total credited, or `None` when
    /// this arena was already observed.
    pub fn observe_settlement(
        &mut self,
        arena_id: &ArenaId,
        payouts: &[Payout],
    ) -> Option<Decimal> {
        if !self.credited.insert(arena_id.clone()) {
            return None;
        }
        let Some(identity) = &self.identity else {
            return Some(Decimal::ZERO);
        };
        let credited: Decimal = payouts
            .iter()
            .filter(|p| p.recipient() == identity.id())
            .map(Payout::amount)
            .sum();
        self.balance += credited;
        Some(credited)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
