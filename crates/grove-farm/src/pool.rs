//! Accumulator-model ledger ("reward debt" accounting).
//!
//! One global `acc_reward_per_share` value accumulates emission divided by
//! the staked total, scaled by [`PRECISION`]. A position's pending reward is
//! `amount * acc_reward_per_share / PRECISION - reward_debt`; the debt is
//! re-anchored on every interaction. Rolling the accumulator forward touches
//! no per-user state, which is what keeps every operation O(1).
//!
//! Reward payouts come from a dedicated reserve account and are capped at
//! the reserve's current balance; an under-funded reserve short-pays rather
//! than failing the whole operation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use grove_core::constants::PRECISION;
use grove_core::error::{FarmError, LedgerError};
use grove_core::math::mul_div;
use grove_core::traits::{AssetLedger, EmissionCurve};
use grove_core::types::{AccountId, Amount, BlockNumber};

/// A single staker's record.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StakePosition {
    /// Principal currently staked.
    pub amount: Amount,
    /// `amount * acc_reward_per_share / PRECISION` as of the last interaction.
    pub reward_debt: Amount,
}

/// The accumulator-model farm ledger.
///
/// Holds staked principal in `farm_account` and pays rewards out of
/// `reward_reserve`, both accounts on the external [`AssetLedger`]. Every
/// mutating operation takes the current block height explicitly and rejects
/// heights lower than any previously observed.
#[derive(Clone, Debug)]
pub struct PoolLedger<E> {
    curve: E,
    farm_account: AccountId,
    reward_reserve: AccountId,
    last_reward_block: BlockNumber,
    last_seen_block: BlockNumber,
    acc_reward_per_share: Amount,
    total_staked: Amount,
    positions: HashMap<AccountId, StakePosition>,
}

impl<E: EmissionCurve> PoolLedger<E> {
    /// Create a ledger. The accumulator starts anchored at the curve's start
    /// block, so deposits made earlier simply earn nothing until emission
    /// begins.
    pub fn new(curve: E, farm_account: AccountId, reward_reserve: AccountId) -> Self {
        let last_reward_block = curve.start_block();
        Self {
            curve,
            farm_account,
            reward_reserve,
            last_reward_block,
            last_seen_block: 0,
            acc_reward_per_share: 0,
            total_staked: 0,
            positions: HashMap::new(),
        }
    }

    /// The emission curve driving this ledger.
    pub fn curve(&self) -> &E {
        &self.curve
    }

    /// Account holding staked principal.
    pub fn farm_account(&self) -> AccountId {
        self.farm_account
    }

    /// Account rewards are paid from.
    pub fn reward_reserve(&self) -> AccountId {
        self.reward_reserve
    }

    /// Sum of all staked principal.
    pub fn total_staked(&self) -> Amount {
        self.total_staked
    }

    /// Cumulative reward per staked unit, fixed-point scaled.
    pub fn acc_reward_per_share(&self) -> Amount {
        self.acc_reward_per_share
    }

    /// Height the accumulator was last rolled to.
    pub fn last_reward_block(&self) -> BlockNumber {
        self.last_reward_block
    }

    /// A staker's position, if any.
    pub fn position(&self, user: AccountId) -> Option<&StakePosition> {
        self.positions.get(&user)
    }

    /// Principal staked by `user` (zero for unknown accounts).
    pub fn staked_of(&self, user: AccountId) -> Amount {
        self.positions.get(&user).map(|p| p.amount).unwrap_or(0)
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

    /// Roll the accumulator forward to `now`.
    ///
    /// No-op when `now` does not advance past the last reward block. While
    /// the pool is empty only the anchor advances: emission over an empty
    /// pool is dropped, not banked for the next depositor. Rolling twice
    /// over the same range adds nothing the second time.
    pub fn roll_forward(&mut self, now: BlockNumber) -> Result<(), FarmError> {
        self.observe(now)?;
        if now <= self.last_reward_block {
            return Ok(());
        }
        if self.total_staked == 0 {
            self.last_reward_block = now;
            return Ok(());
        }
        let reward = self.curve.emitted(self.last_reward_block, now)?;
        let delta = mul_div(reward, PRECISION, self.total_staked)
            .ok_or(FarmError::ArithmeticOverflow)?;
        self.acc_reward_per_share = self
            .acc_reward_per_share
            .checked_add(delta)
            .ok_or(FarmError::ArithmeticOverflow)?;
        trace!(height = now, reward, "rolled accumulator forward");
        self.last_reward_block = now;
        Ok(())
    }

    /// Pending reward for `user` at height `now`. Pure read: performs the
    /// roll-forward arithmetic without committing it.
    pub fn pending(&self, user: AccountId, now: BlockNumber) -> Result<Amount, FarmError> {
        let pos = match self.positions.get(&user) {
            Some(pos) => pos,
            None => return Ok(0),
        };
        let mut acc = self.acc_reward_per_share;
        if now > self.last_reward_block && self.total_staked > 0 {
            let reward = self.curve.emitted(self.last_reward_block, now)?;
            let delta = mul_div(reward, PRECISION, self.total_staked)
                .ok_or(FarmError::ArithmeticOverflow)?;
            acc = acc.checked_add(delta).ok_or(FarmError::ArithmeticOverflow)?;
        }
        let entitled =
            mul_div(pos.amount, acc, PRECISION).ok_or(FarmError::ArithmeticOverflow)?;
        Ok(entitled.saturating_sub(pos.reward_debt))
    }

    /// Stake `amount` for `user`, paying out any pending reward first.
    ///
    /// A zero-amount deposit is a pure harvest trigger.
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
        self.roll_forward(now)?;
        if amount > 0 {
            assets.transfer(user, self.farm_account, amount)?;
        }
        self.settle(assets, user)?;

        let pos = self.positions.entry(user).or_default();
        pos.amount = pos
            .amount
            .checked_add(amount)
            .ok_or(FarmError::ArithmeticOverflow)?;
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(FarmError::ArithmeticOverflow)?;
        self.reanchor_debt(user)?;
        debug!(user = %user, amount, height = now, "deposit");
        Ok(())
    }

    /// Unstake `amount` for `user`, paying out any pending reward first.
    ///
    /// Rejects amounts above the staked principal with no state change.
    pub fn withdraw(
        &mut self,
        assets: &mut dyn AssetLedger,
        user: AccountId,
        amount: Amount,
        now: BlockNumber,
    ) -> Result<(), FarmError> {
        self.observe(now)?;
        let have = self.staked_of(user);
        if have < amount {
            return Err(FarmError::InsufficientStake { have, need: amount });
        }
        self.roll_forward(now)?;
        if amount > 0 {
            assets.transfer(self.farm_account, user, amount)?;
        }
        self.settle(assets, user)?;

        let pos = self.positions.entry(user).or_default();
        pos.amount -= amount;
        self.total_staked -= amount;
        self.reanchor_debt(user)?;
        debug!(user = %user, amount, height = now, "withdraw");
        Ok(())
    }

    /// Pay the accrued reward for `user`, capped at the reserve balance.
    fn settle(&mut self, assets: &mut dyn AssetLedger, user: AccountId) -> Result<(), FarmError> {
        let pos = match self.positions.get(&user) {
            Some(pos) => *pos,
            None => return Ok(()),
        };
        if pos.amount == 0 {
            return Ok(());
        }
        let entitled = mul_div(pos.amount, self.acc_reward_per_share, PRECISION)
            .ok_or(FarmError::ArithmeticOverflow)?;
        let pending = entitled.saturating_sub(pos.reward_debt);
        let pay = pending.min(assets.balance_of(self.reward_reserve));
        if pay > 0 {
            assets.transfer(self.reward_reserve, user, pay)?;
            trace!(user = %user, pay, "paid pending reward");
        }
        Ok(())
    }

    fn reanchor_debt(&mut self, user: AccountId) -> Result<(), FarmError> {
        let acc = self.acc_reward_per_share;
        let pos = self.positions.entry(user).or_default();
        pos.reward_debt =
            mul_div(pos.amount, acc, PRECISION).ok_or(FarmError::ArithmeticOverflow)?;
        Ok(())
    }
}
