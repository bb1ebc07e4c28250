//! Property tests for the engine's algebraic guarantees.
//!
//! These drive randomized operation sequences through the real components
//! and check the invariants the accounting is built on: range additivity,
//! accumulator monotonicity, asset conservation, lazy-update equivalence,
//! and harvest non-dilution.

use proptest::prelude::*;

use grove_core::constants::UNIT;
use grove_core::math::mul_div;
use grove_core::traits::{AssetLedger, EmissionCurve};
use grove_core::types::Amount;
use grove_tests::helpers::*;

// ----------------------------------------------------------------------
// EmissionCurve
// ----------------------------------------------------------------------

proptest! {
    /// multiplier(a, c) == multiplier(a, b) + multiplier(b, c) for a <= b <= c.
    #[test]
    fn emission_is_additive_across_any_split(
        offset in 0u64..3 * CYCLE,
        d1 in 0u64..2 * CYCLE,
        d2 in 0u64..2 * CYCLE,
    ) {
        let curve = decaying_schedule();
        let a = START + offset;
        let b = a + d1;
        let c = b + d2;
        prop_assert_eq!(
            curve.multiplier(a, c).unwrap(),
            curve.multiplier(a, b).unwrap() + curve.multiplier(b, c).unwrap()
        );
    }

    /// Chopping a range into arbitrary per-block-ish steps emits the same
    /// total as one sweep, so roll cadence never changes payouts.
    #[test]
    fn emission_invariant_under_roll_cadence(steps in prop::collection::vec(1u64..500, 1..20)) {
        let curve = decaying_schedule();
        let mut cursor = START;
        let mut total: Amount = 0;
        for step in &steps {
            total += curve.emitted(cursor, cursor + step).unwrap();
            cursor += step;
        }
        prop_assert_eq!(total, curve.emitted(START, cursor).unwrap());
    }
}

// ----------------------------------------------------------------------
// PoolLedger
// ----------------------------------------------------------------------

/// A randomized staker action.
#[derive(Clone, Debug)]
enum Op {
    Deposit(u8, Amount),
    Withdraw(u8, Amount),
    Roll,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..3, 1u128..20).prop_map(|(u, n)| Op::Deposit(u, n * UNIT / 10)),
        (0u8..3, 1u128..20).prop_map(|(u, n)| Op::Withdraw(u, n * UNIT / 10)),
        Just(Op::Roll),
    ]
}

proptest! {
    /// Under any op sequence: the accumulator never decreases, the farm
    /// account always backs the staked total exactly, and the asset ledger
    /// conserves total issuance.
    #[test]
    fn pool_invariants_hold_under_random_ops(
        ops in prop::collection::vec((op_strategy(), 1u64..40), 1..30),
    ) {
        let mut farm = pool_farm();
        let mut assets = funded_assets();
        for seed in 0..3u8 {
            assets.mint(acct(seed + 1), 100 * UNIT).unwrap();
        }

        let mut height = START.saturating_sub(20);
        let mut prev_acc = 0;
        for (op, step) in ops {
            height += step;
            match op {
                Op::Deposit(u, amount) => {
                    let user = acct(u + 1);
                    if assets.balance_of(user) >= amount {
                        farm.deposit(&mut assets, user, amount, height).unwrap();
                    }
                }
                Op::Withdraw(u, amount) => {
                    let user = acct(u + 1);
                    let capped = amount.min(farm.staked_of(user));
                    farm.withdraw(&mut assets, user, capped, height).unwrap();
                }
                Op::Roll => farm.roll_forward(height).unwrap(),
            }

            let acc = farm.acc_reward_per_share();
            prop_assert!(acc >= prev_acc);
            prev_acc = acc;
            prop_assert_eq!(assets.balance_of(FARM), farm.total_staked());
            prop_assert_eq!(assets.total_balances(), assets.total_issued());
        }
    }

    /// Oversized withdrawals reject without touching any balance.
    #[test]
    fn pool_failed_withdraw_changes_nothing(extra in 1u128..1_000_000) {
        let mut farm = pool_farm();
        let mut assets = funded_assets();
        let bob = acct(1);
        assets.mint(bob, UNIT).unwrap();
        farm.deposit(&mut assets, bob, UNIT, START).unwrap();

        let before_farm = assets.balance_of(FARM);
        let before_bob = assets.balance_of(bob);
        prop_assert!(farm.withdraw(&mut assets, bob, UNIT + extra, START + 5).is_err());
        prop_assert_eq!(assets.balance_of(FARM), before_farm);
        prop_assert_eq!(assets.balance_of(bob), before_bob);
        prop_assert_eq!(farm.staked_of(bob), UNIT);
    }
}

// ----------------------------------------------------------------------
// RebasingLedger: lazy-update equivalence
// ----------------------------------------------------------------------

proptest! {
    /// A user who never interacts reads the same balance an eager
    /// per-distribution update would have produced.
    #[test]
    fn rebasing_lazy_equals_eager(
        moves in prop::collection::vec((1u64..40, 1u128..10, prop::bool::ANY), 1..15),
        tail in 0u64..60,
    ) {
        let mut farm = rebasing_farm();
        let mut assets = funded_assets();
        let (sleeper, trader) = (acct(1), acct(2));
        fund(&mut assets, &[sleeper, trader], 200 * UNIT);

        farm.deposit(&mut assets, sleeper, UNIT, START - 10).unwrap();

        // Eager mirror of the pool: sleeper and trader balances updated at
        // every distribution event.
        let mut eager_sleeper = UNIT;
        let mut eager_trader: Amount = 0;
        let mut eager_total = UNIT;
        let mut top_block = START;

        let mut height = START;
        for (step, units, is_deposit) in moves {
            height += step;

            // Distribution the trader's interaction will trigger.
            if height > top_block && eager_total > 0 {
                let emitted = (height - top_block) as Amount * RATE;
                eager_sleeper += mul_div(emitted, eager_sleeper, eager_total).unwrap();
                eager_trader += mul_div(emitted, eager_trader, eager_total).unwrap();
                eager_total += emitted;
            }
            top_block = height;

            if is_deposit {
                let amount = units * UNIT;
                farm.deposit(&mut assets, trader, amount, height).unwrap();
                eager_trader += amount;
                eager_total += amount;
            } else {
                let amount = (units * UNIT / 4).min(eager_trader);
                farm.withdraw(&mut assets, trader, amount, height).unwrap();
                eager_trader -= amount;
                eager_total -= amount;
            }
        }

        // Read at a later height with pending, un-snapshotted emission.
        let read_at = height + tail;
        let mut expect = eager_sleeper;
        if read_at > top_block && eager_total > 0 {
            let emitted = (read_at - top_block) as Amount * RATE;
            expect += mul_div(emitted, expect, eager_total).unwrap();
        }
        prop_assert_eq!(farm.balance_of(sleeper, read_at).unwrap(), expect);
    }

    /// Sum of derived balances never exceeds the pool total (floor rounding
    /// always favors the pool), and the pool is always fully asset-backed.
    #[test]
    fn rebasing_never_over_promises(
        moves in prop::collection::vec((1u64..30, 1u128..8), 1..12),
    ) {
        let mut farm = rebasing_farm();
        let mut assets = funded_assets();
        let users = [acct(1), acct(2), acct(3)];
        fund(&mut assets, &users, 100 * UNIT);

        let mut height = START - 5;
        for (i, (step, units)) in moves.iter().enumerate() {
            height += step;
            let user = users[i % users.len()];
            farm.deposit(&mut assets, user, units * UNIT, height).unwrap();
        }

        let read_at = height + 25;
        let mut owed: Amount = 0;
        for user in users {
            owed += farm.balance_of(user, read_at).unwrap();
        }
        // Include emission not yet pulled from the reserve.
        let unfunded = farm.curve().emitted(
            farm.snapshots().last().unwrap().block,
            read_at,
        ).unwrap();
        prop_assert!(owed <= farm.total_balance() + unfunded);
        prop_assert_eq!(assets.balance_of(FARM), farm.total_balance());
    }
}

// ----------------------------------------------------------------------
// CompoundingVault: no dilution on harvest
// ----------------------------------------------------------------------

proptest! {
    /// assets_per_share never drops across a harvest and no holder's share
    /// count moves.
    #[test]
    fn harvest_never_dilutes(
        deposits in prop::collection::vec((0u8..3, 1u128..10), 1..6),
        gap in 1u64..200,
    ) {
        let mut farm = pool_farm();
        let mut v = vault();
        let mut assets = funded_assets();
        let keeper = acct(9);
        for seed in 0..3u8 {
            assets.mint(acct(seed + 1), 100 * UNIT).unwrap();
        }

        let mut height = START - 10;
        for (u, units) in deposits {
            height += 1;
            v.deposit(&mut farm, &mut assets, acct(u + 1), units * UNIT, height)
                .unwrap();
        }

        height += gap;
        let rate_before = v.assets_per_share(&farm, &assets).unwrap();
        let shares_before: Vec<Amount> = (0..3u8).map(|s| v.shares_of(acct(s + 1))).collect();
        let total_before = v.total_shares();

        v.harvest(&mut farm, &mut assets, keeper, height).unwrap();

        prop_assert!(v.assets_per_share(&farm, &assets).unwrap() >= rate_before);
        prop_assert_eq!(v.total_shares(), total_before);
        for (seed, before) in shares_before.iter().enumerate() {
            prop_assert_eq!(v.shares_of(acct(seed as u8 + 1)), *before);
        }
    }
}
