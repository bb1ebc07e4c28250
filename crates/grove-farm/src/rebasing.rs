//! Snapshot-model ledger (distribution-index accounting).
//!
//! The pool keeps an append-only series of `(block, total)` snapshots. A new
//! entry is pushed exactly when emission is credited; deposits and
//! withdrawals at the same distribution point fold into the top entry in
//! place. Each user carries the balance and snapshot index observed at their
//! last interaction; their current balance is derived on read by replaying
//! emission since that checkpoint, pro rata against the pool total each
//! emission landed on. Users who never interact are never written to —
//! that is the point of the model.
//!
//! Per-snapshot emission is recomputed from the curve over the snapshot's
//! block range rather than read off balance differences, so principal that
//! merged into a snapshot is never misattributed as yield.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use grove_core::error::{FarmError, LedgerError};
use grove_core::math::mul_div;
use grove_core::traits::{AssetLedger, EmissionCurve};
use grove_core::types::{AccountId, Amount, BlockNumber};

/// One entry in the distribution series: the pool total as of a block.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Height of the distribution event.
    pub block: BlockNumber,
    /// Total pool balance after the event (emission plus merged principal).
    pub total: Amount,
}

/// A user's checkpoint into the snapshot series.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserRecord {
    /// Balance owed as of the last interaction.
    pub last_balance: Amount,
    /// Index of the snapshot current at the last interaction.
    pub last_distribution_index: usize,
}

/// The snapshot-model farm ledger.
///
/// Emission is funded by transfers from `reward_reserve` into
/// `farm_account` at each distribution, so the farm account's asset balance
/// always equals the top snapshot total.
#[derive(Clone, Debug)]
pub struct RebasingLedger<E> {
    curve: E,
    farm_account: AccountId,
    reward_reserve: AccountId,
    snapshots: Vec<Snapshot>,
    users: HashMap<AccountId, UserRecord>,
    last_seen_block: BlockNumber,
}

impl<E: EmissionCurve> RebasingLedger<E> {
    /// Create a ledger. The series starts with a single empty snapshot
    /// anchored at the curve's start block.
    pub fn new(curve: E, farm_account: AccountId, reward_reserve: AccountId) -> Self {
        let genesis = Snapshot {
            block: curve.start_block(),
            total: 0,
        };
        Self {
            curve,
            farm_account,
            reward_reserve,
            snapshots: vec![genesis],
            users: HashMap::new(),
            last_seen_block: 0,
        }
    }

    /// The emission curve driving this ledger.
    pub fn curve(&self) -> &E {
        &self.curve
    }

    /// Account holding the pool's assets.
    pub fn farm_account(&self) -> AccountId {
        self.farm_account
    }

    /// The full distribution series, oldest first.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Current pool total (top snapshot).
    pub fn total_balance(&self) -> Amount {
        self.top().total
    }

    /// A user's checkpoint, if they ever interacted.
    pub fn record(&self, user: AccountId) -> Option<&UserRecord> {
        self.users.get(&user)
    }

    fn top(&self) -> Snapshot {
        self.snapshots[self.snapshots.len() - 1]
    }

    fn observe(&mut self, now: BlockNumber) -> Result<(), FarmError> {
        if now < self.last_seen_block {
            return Err(FarmError::HeightRegression {
                last: self.last_seen_block,
                got: now,
            });
        }
        self.last_seen_block = now;
        Ok(())
    }

    /// Credit emission up to `now`, pushing a snapshot when any landed.
    ///
    /// While the pool is empty the anchor block advances without a snapshot:
    /// emission over an empty pool is dropped. The transfer funding the
    /// emission happens before the series grows, so a dry reserve fails the
    /// whole operation with the series untouched.
    pub fn roll_forward(
        &mut self,
        assets: &mut dyn AssetLedger,
        now: BlockNumber,
    ) -> Result<(), FarmError> {
        self.observe(now)?;
        let top = self.top();
        if now <= top.block {
            return Ok(());
        }
        if top.total == 0 {
            let idx = self.snapshots.len() - 1;
            self.snapshots[idx].block = now;
            return Ok(());
        }
        let emission = self.curve.emitted(top.block, now)?;
        if emission == 0 {
            return Ok(());
        }
        let total = top
            .total
            .checked_add(emission)
            .ok_or(FarmError::ArithmeticOverflow)?;
        assets.transfer(self.reward_reserve, self.farm_account, emission)?;
        self.snapshots.push(Snapshot { block: now, total });
        trace!(height = now, emission, "distribution snapshot");
        Ok(())
    }

    /// Current balance of `user` at height `now`. Pure read.
    ///
    /// Replays every distribution since the user's checkpoint, compounding
    /// the running balance, then adds un-snapshotted emission from the top
    /// snapshot to `now`.
    pub fn balance_of(&self, user: AccountId, now: BlockNumber) -> Result<Amount, FarmError> {
        let rec = match self.users.get(&user) {
            Some(rec) => rec,
            None => return Ok(0),
        };
        let mut balance = rec.last_balance;
        if balance == 0 {
            return Ok(0);
        }
        for i in rec.last_distribution_index + 1..self.snapshots.len() {
            let prev = self.snapshots[i - 1];
            let cur = self.snapshots[i];
            let emission = self.curve.emitted(prev.block, cur.block)?;
            if emission == 0 || prev.total == 0 {
                continue;
            }
            let share =
                mul_div(emission, balance, prev.total).ok_or(FarmError::ArithmeticOverflow)?;
            balance = balance
                .checked_add(share)
                .ok_or(FarmError::ArithmeticOverflow)?;
        }
        let top = self.top();
        if now > top.block && top.total > 0 {
            let emission = self.curve.emitted(top.block, now)?;
            if emission > 0 {
                let share =
                    mul_div(emission, balance, top.total).ok_or(FarmError::ArithmeticOverflow)?;
                balance = balance
                    .checked_add(share)
                    .ok_or(FarmError::ArithmeticOverflow)?;
            }
        }
        Ok(balance)
    }

    /// Deposit `amount` for `user`.
    ///
    /// Materializes the user's derived balance into their checkpoint, folds
    /// the principal into the top snapshot, and re-anchors their index.
    pub fn deposit(
        &mut self,
        assets: &mut dyn AssetLedger,
        user: AccountId,
        amount: Amount,
        now: BlockNumber,
    ) -> Result<(), FarmError> {
        self.observe(now)?;
        let have = assets.balance_of(user);
        if have < amount {
            return Err(LedgerError::InsufficientFunds { have, need: amount }.into());
        }
        self.roll_forward(assets, now)?;
        let balance = self.balance_of(user, now)?;
        let new_balance = balance
            .checked_add(amount)
            .ok_or(FarmError::ArithmeticOverflow)?;
        let top_idx = self.snapshots.len() - 1;
        let new_total = self.snapshots[top_idx]
            .total
            .checked_add(amount)
            .ok_or(FarmError::ArithmeticOverflow)?;

        assets.transfer(user, self.farm_account, amount)?;
        self.snapshots[top_idx].total = new_total;
        let rec = self.users.entry(user).or_default();
        rec.last_balance = new_balance;
        rec.last_distribution_index = top_idx;
        debug!(user = %user, amount, height = now, "deposit");
        Ok(())
    }

    /// Withdraw `amount` for `user`.
    ///
    /// Rejects amounts above the derived balance with no state change.
    pub fn withdraw(
        &mut self,
        assets: &mut dyn AssetLedger,
        user: AccountId,
        amount: Amount,
        now: BlockNumber,
    ) -> Result<(), FarmError> {
        self.observe(now)?;
        let have = self.balance_of(user, now)?;
        if have < amount {
            return Err(FarmError::InsufficientBalance { have, need: amount });
        }
        self.roll_forward(assets, now)?;
        let balance = self.balance_of(user, now)?;
        let top_idx = self.snapshots.len() - 1;
        let new_total = self.snapshots[top_idx]
            .total
            .checked_sub(amount)
            .ok_or(FarmError::ArithmeticOverflow)?;

        assets.transfer(self.farm_account, user, amount)?;
        self.snapshots[top_idx].total = new_total;
        let rec = self.users.entry(user).or_default();
        rec.last_balance = balance - amount;
        rec.last_distribution_index = top_idx;
        debug!(user = %user, amount, height = now, "withdraw");
        Ok(())
    }
}
