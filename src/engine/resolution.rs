//! Pure winner selection and payout computation.
//!
//! [`resolve`] is a pure function over an arena's data: it never touches
//! the clock, the store, or any transport. The caller (the settlement
//! clock via the engine) guards that the arena is active and due, applies
//! the status transition, and broadcasts the result.
//!
//! The three payout pools deliberately do not normalize to the total stake
//! in the arena, and the same identity can collect from more than one pool
//! (an originator who also entered and won). Both are specified behavior,
//! not defects to correct here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::stakes::{BACKER_CUT, ENTRANT_CUT, ORIGINATOR_CUT};
use crate::domain::{Arena, ArenaId, Entry, EntryId, ParticipantId};

/// Which pool a payout instruction draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutReason {
    /// Backer of the winning entry: principal plus a proportional cut of
    /// the losing pool.
    BackerReturn,
    /// Winning entrant's fixed share of the creation stake and
    /// per-competitor fees.
    EntrantReward,
    /// Originator's fixed percentage of all backed stake, win or lose.
    OriginatorReward,
}

/// One advisory payout instruction.
///
/// The engine never holds or transfers funds; these describe how much each
/// identity's advisory balance should increase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    recipient: ParticipantId,
    amount: Decimal,
    reason: PayoutReason,
}

impl Payout {
    fn new(recipient: ParticipantId, amount: Decimal, reason: PayoutReason) -> Self {
        Self {
            recipient,
            amount,
            reason,
        }
    }

    /// Get the identity the payout is addressed to.
    #[must_use]
    pub const fn recipient(&self) -> &ParticipantId {
        &self.recipient
    }

    /// Get the payout amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Get the pool the payout draws from.
    #[must_use]
    pub const fn reason(&self) -> PayoutReason {
        self.reason
    }
}

/// Outcome of resolving one expired arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    arena_id: ArenaId,
    winning_entry_id: Option<EntryId>,
    payouts: Vec<Payout>,
}

impl Resolution {
    /// Get the resolved arena's ID.
    #[must_use]
    pub const fn arena_id(&self) -> &ArenaId {
        &self.arena_id
    }

    /// Get the winning entry ID, absent for an arena with no entries.
    #[must_use]
    pub const fn winning_entry_id(&self) -> Option<&EntryId> {
        self.winning_entry_id.as_ref()
    }

    /// Get the advisory payout instructions.
    #[must_use]
    pub fn payouts(&self) -> &[Payout] {
        &self.payouts
    }
}

/// Select the winner of an expired arena and compute all payout shares.
///
/// With no entries the arena resolves without a winner and without
/// payouts. Otherwise the winner is the entry with the strictly greatest
/// backed total; ties resolve to the earliest-submitted entry, never
/// randomly.
#[must_use]
pub fn resolve(arena: &Arena) -> Resolution {
    let Some(winner) = select_winner(arena.entries()) else {
        return Resolution {
            arena_id: arena.id().clone(),
            winning_entry_id: None,
            payouts: Vec::new(),
        };
    };

    let winning_pool = winner.backed_total();
    let losing_pool: Decimal = arena
        .entries()
        .iter()
        .filter(|e| e.id() != winner.id())
        .map(Entry::backed_total)
        .sum();

    let mut payouts = backer_payouts(winner, winning_pool, losing_pool);
    payouts.push(Payout::new(
        winner.author().id().clone(),
        entrant_reward(arena),
        PayoutReason::EntrantReward,
    ));
    payouts.push(Payout::new(
        arena.originator().id().clone(),
        ORIGINATOR_CUT * (losing_pool + winning_pool),
        PayoutReason::OriginatorReward,
    ));

    Resolution {
        arena_id: arena.id().clone(),
        winning_entry_id: Some(winner.id().clone()),
        payouts,
    }
}

/// Earliest entry with the maximal backed total. Strict comparison keeps
/// the first-submitted entry on ties.
fn select_winner(entries: &[Entry]) -> Option<&Entry> {
    let mut winner: Option<&Entry> = None;
    for entry in entries {
        match winner {
            Some(best) if entry.backed_total() > best.backed_total() => winner = Some(entry),
            None => winner = Some(entry),
            _ => {}
        }
    }
    winner
}

/// Principal plus a proportional cut of the losing pool, per backer.
/// No profit term when nothing backed the winner.
fn backer_payouts(winner: &Entry, winning_pool: Decimal, losing_pool: Decimal) -> Vec<Payout> {
    let mut payouts: Vec<Payout> = winner
        .backers()
        .iter()
        .map(|(backer, contribution)| {
            let contribution = *contribution;
            let profit = if winning_pool.is_zero() {
                Decimal::ZERO
            } else {
                (contribution / winning_pool) * BACKER_CUT * losing_pool
            };
            Payout::new(backer.clone(), contribution + profit, PayoutReason::BackerReturn)
        })
        .collect();
    // HashMap iteration order is arbitrary; fix it for deterministic output.
    payouts.sort_by(|a, b| a.recipient.as_str().cmp(b.recipient.as_str()));
    payouts
}

fn entrant_reward(arena: &Arena) -> Decimal {
    let competitors = Decimal::from(arena.entries().len().saturating_sub(1));
    let per_entry_fee = arena
        .entries()
        .first()
        .map_or(Decimal::ZERO, Entry::entry_stake);
    ENTRANT_CUT * arena.originator_stake() + ENTRANT_CUT * competitors * per_entry_fee
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::domain::Identity;

    fn identity(id: &str, name: &str) -> Identity {
        Identity::new(ParticipantId::new(id), name, format!("@{name}"))
    }

    fn arena_with_entries(contents: &[&str]) -> Arena {
        let mut arena = Arena::new(identity("orig", "Dana"), "hot take", Utc::now());
        for (i, content) in contents.iter().enumerate() {
            arena
                .push_entry(identity(&format!("author-{i}"), &format!("A{i}")), *content)
                .unwrap();
        }
        arena
    }

    fn payout_for<'a>(resolution: &'a Resolution, recipient: &str, reason: PayoutReason) -> &'a Payout {
        resolution
            .payouts()
            .iter()
            .find(|p| p.recipient().as_str() == recipient && p.reason() == reason)
            .expect("payout present")
    }

    #[test]
    fn empty_arena_resolves_without_winner_or_payouts() {
        let arena = arena_with_entries(&[]);
        let resolution = resolve(&arena);

        assert!(resolution.winning_entry_id().is_none());
        assert!(resolution.payouts().is_empty());
    }

    #[test]
    fn most_backed_entry_wins() {
        let mut arena = arena_with_entries(&["a", "b"]);
        let loser = arena.entries()[0].id().clone();
        let favourite = arena.entries()[1].id().clone();
        arena
            .back_entry(&loser, &ParticipantId::new("b-1"), dec!(0.04))
            .unwrap();
        arena
            .back_entry(&favourite, &ParticipantId::new("b-2"), dec!(0.07))
            .unwrap();

        let resolution = resolve(&arena);
        assert_eq!(resolution.winning_entry_id(), Some(&favourite));
    }

    #[test]
    fn ties_resolve_to_the_earliest_submission() {
        let mut arena = arena_with_entries(&["first", "second"]);
        let first = arena.entries()[0].id().clone();
        let second = arena.entries()[1].id().clone();
        arena
            .back_entry(&first, &ParticipantId::new("b-1"), dec!(0.03))
            .unwrap();
        arena
            .back_entry(&second, &ParticipantId::new("b-2"), dec!(0.03))
            .unwrap();

        let resolution = resolve(&arena);
        assert_eq!(resolution.winning_entry_id(), Some(&first));
    }

    #[test]
    fn unbacked_entries_tie_to_the_first_entry() {
        let arena = arena_with_entries(&["first", "second", "third"]);
        let first = arena.entries()[0].id().clone();

        let resolution = resolve(&arena);
        assert_eq!(resolution.winning_entry_id(), Some(&first));
    }

    #[test]
    fn sole_backer_collects_principal_plus_ninety_percent_of_losers() {
        // Worked example: W = 0.07, L = 0.04, single backer holds all of W.
        // 0.07 + (0.07 / 0.07) * 0.9 * 0.04 = 0.106
        let mut arena = arena_with_entries(&["a", "b"]);
        let winner = arena.entries()[0].id().clone();
        let loser = arena.entries()[1].id().clone();
        arena
            .back_entry(&winner, &ParticipantId::new("backer"), dec!(0.07))
            .unwrap();
        arena
            .back_entry(&loser, &ParticipantId::new("other"), dec!(0.04))
            .unwrap();

        let resolution = resolve(&arena);
        let payout = payout_for(&resolution, "backer", PayoutReason::BackerReturn);
        assert_eq!(payout.amount(), dec!(0.106));
    }

    #[test]
    fn split_backers_share_the_losing_pool_proportionally() {
        let mut arena = arena_with_entries(&["a", "b"]);
        let winner = arena.entries()[0].id().clone();
        let loser = arena.entries()[1].id().clone();
        arena
            .back_entry(&winner, &ParticipantId::new("b-1"), dec!(0.03))
            .unwrap();
        arena
            .back_entry(&winner, &ParticipantId::new("b-2"), dec!(0.01))
            .unwrap();
        arena
            .back_entry(&loser, &ParticipantId::new("b-3"), dec!(0.08))
            .unwrap();

        let resolution = resolve(&arena);
        // W = 0.04, L = 0.08, shared profit pool 0.9 * 0.08 = 0.072
        let big = payout_for(&resolution, "b-1", PayoutReason::BackerReturn);
        assert_eq!(big.amount(), dec!(0.03) + dec!(0.75) * dec!(0.072));
        let small = payout_for(&resolution, "b-2", PayoutReason::BackerReturn);
        assert_eq!(small.amount(), dec!(0.01) + dec!(0.25) * dec!(0.072));
    }

    #[test]
    fn unbacked_winner_yields_no_backer_payouts() {
        let arena = arena_with_entries(&["only"]);
        let resolution = resolve(&arena);

        assert!(resolution
            .payouts()
            .iter()
            .all(|p| p.reason() != PayoutReason::BackerReturn));
        // Entrant and originator instructions still present.
        assert_eq!(resolution.payouts().len(), 2);
    }

    #[test]
    fn entrant_reward_scales_with_competing_entries() {
        let arena = arena_with_entries(&["a", "b", "c"]);
        let resolution = resolve(&arena);

        // 0.7 * 0.05 + 0.7 * 2 * 0.01 = 0.049
        let payout = payout_for(&resolution, "author-0", PayoutReason::EntrantReward);
        assert_eq!(payout.amount(), dec!(0.049));
    }

    #[test]
    fn originator_takes_five_percent_of_all_backed_stake() {
        let mut arena = arena_with_entries(&["a", "b"]);
        let first = arena.entries()[0].id().clone();
        let second = arena.entries()[1].id().clone();
        arena
            .back_entry(&first, &ParticipantId::new("b-1"), dec!(0.07))
            .unwrap();
        arena
            .back_entry(&second, &ParticipantId::new("b-2"), dec!(0.04))
            .unwrap();

        let resolution = resolve(&arena);
        let payout = payout_for(&resolution, "orig", PayoutReason::OriginatorReward);
        // 0.05 * (0.04 + 0.07)
        assert_eq!(payout.amount(), dec!(0.0055));
    }

    #[test]
    fn originator_reward_emitted_even_with_nothing_backed() {
        let arena = arena_with_entries(&["only"]);
        let resolution = resolve(&arena);

        let payout = payout_for(&resolution, "orig", PayoutReason::OriginatorReward);
        assert_eq!(payout.amount(), Decimal::ZERO);
    }

    #[test]
    fn originator_who_entered_and_won_collects_twice() {
        // Overlapping pools are specified behavior, preserved as-is.
        let mut arena = Arena::new(identity("orig", "Dana"), "hot take", Utc::now());
        arena
            .push_entry(identity("orig", "Dana"), "self-own")
            .unwrap();

        let resolution = resolve(&arena);
        let to_originator: Vec<_> = resolution
            .payouts()
            .iter()
            .filter(|p| p.recipient().as_str() == "orig")
            .collect();
        assert_eq!(to_originator.len(), 2);
    }

    #[test]
    fn backer_payouts_are_sorted_by_recipient() {
        let mut arena = arena_with_entries(&["a"]);
        let winner = arena.entries()[0].id().clone();
        for backer in ["b-3", "b-1", "b-2"] {
            arena
                .back_entry(&winner, &ParticipantId::new(backer), dec!(0.01))
                .unwrap();
        }

        let resolution = resolve(&arena);
        let backers: Vec<_> = resolution
            .payouts()
            .iter()
            .filter(|p| p.reason() == PayoutReason::BackerReturn)
            .map(|p| p.recipient().as_str())
            .collect();
        assert_eq!(backers, vec!["b-1", "b-2", "b-3"]);
    }
}
