//! Fixed economic constants for the arena economy.
//!
//! Amounts are `Decimal` for precision, never floats. These are
//! compile-time constants: the arena economy is not runtime-configurable.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// How long an arena stays open for entries and backing.
pub const ARENA_DURATION_SECS: i64 = 300;

/// Deposit paid by the originator when creating an arena.
pub const CREATION_STAKE: Decimal = dec!(0.05);

/// Fee paid by an entrant when submitting an entry.
pub const ENTRY_FEE: Decimal = dec!(0.01);

/// Stake placed per backing action by the reference client.
pub const BACKING_UNIT: Decimal = dec!(0.01);

/// Advisory balance granted to every newly connected session.
pub const STARTING_GRANT: Decimal = dec!(1.00);

/// Cadence of the settlement scan.
pub const SETTLEMENT_TICK: Duration = Duration::from_secs(1);

/// Maximum number of retained activity log entries.
pub const ACTIVITY_LOG_BOUND: usize = 15;

/// Number of activity entries replayed to a newly connected observer.
pub const ACTIVITY_REPLAY: usize = 10;

/// Fraction of the losing pool distributed to the winning entry's backers.
pub const BACKER_CUT: Decimal = dec!(0.9);

/// Fraction applied to the creation stake and per-competitor fees for the
/// winning entrant's reward.
pub const ENTRANT_CUT: Decimal = dec!(0.7);

/// Fraction of total backed stake returned to the originator, win or lose.
pub const ORIGINATOR_CUT: Decimal = dec!(0.05);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stakes_are_positive() {
        assert!(CREATION_STAKE > Decimal::ZERO);
        assert!(ENTRY_FEE > Decimal::ZERO);
        assert!(BACKING_UNIT > Decimal::ZERO);
        assert!(STARTING_GRANT > Decimal::ZERO);
    }

    #[test]
    fn cuts_are_proper_fractions() {
        assert!(BACKER_CUT > Decimal::ZERO && BACKER_CUT < Decimal::ONE);
        assert!(ENTRANT_CUT > Decimal::ZERO && ENTRANT_CUT < Decimal::ONE);
        assert!(ORIGINATOR_CUT > Decimal::ZERO && ORIGINATOR_CUT < Decimal::ONE);
    }

    #[test]
    fn replay_fits_inside_log_bound() {
        assert!(ACTIVITY_REPLAY <= ACTIVITY_LOG_BOUND);
    }
}
