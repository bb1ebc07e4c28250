//! The compounding vault.
//!
//! Vault accounting counts two things as assets: principal staked in the
//! underlying farm and idle balance sitting in the vault account. Pending
//! un-harvested reward is *not* counted until a harvest or restake folds it
//! in; share mints and burns price against the pre-harvest pool.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use grove_core::constants::{BPS_PRECISION, DEFAULT_HARVEST_CALL_FEE_BPS, PRECISION};
use grove_core::error::{LedgerError, VaultError};
use grove_core::math::mul_div;
use grove_core::traits::{AssetLedger, EmissionCurve};
use grove_core::types::{AccountId, Amount, BlockNumber};
use grove_farm::PoolLedger;

/// A share holder's record.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShareRecord {
    /// Shares owned.
    pub shares: Amount,
    /// Asset value recorded at the holder's last deposit or withdrawal.
    /// Informational only; entitlement is always `shares` against the pool.
    pub principal_at_last_action: Amount,
}

/// Auto-compounding wrapper over a [`PoolLedger`] position.
///
/// The vault is one staker among any others in the underlying farm; the farm
/// and asset ledger are passed into every operation rather than owned, so a
/// single farm can serve direct stakers and a vault side by side.
#[derive(Clone, Debug)]
pub struct CompoundingVault {
    account: AccountId,
    call_fee_bps: u64,
    total_shares: Amount,
    total_pooled_at_last_action: Amount,
    users: HashMap<AccountId, ShareRecord>,
}

impl CompoundingVault {
    /// Create a vault with the default harvest call fee.
    pub fn new(account: AccountId) -> Self {
        Self {
            account,
            call_fee_bps: DEFAULT_HARVEST_CALL_FEE_BPS,
            total_shares: 0,
            total_pooled_at_last_action: 0,
            users: HashMap::new(),
        }
    }

    /// Create a vault with an explicit harvest call fee in basis points.
    ///
    /// # Errors
    ///
    /// - [`VaultError::FeeAboveUnity`] if `call_fee_bps` exceeds 10_000
    pub fn with_call_fee(account: AccountId, call_fee_bps: u64) -> Result<Self, VaultError> {
        if call_fee_bps as Amount > BPS_PRECISION {
            return Err(VaultError::FeeAboveUnity(call_fee_bps));
        }
        Ok(Self {
            account,
            call_fee_bps,
            total_shares: 0,
            total_pooled_at_last_action: 0,
            users: HashMap::new(),
        })
    }

    /// The vault's own account on the asset ledger and in the farm.
    pub fn account(&self) -> AccountId {
        self.account
    }

    /// Harvest call fee in basis points.
    pub fn call_fee_bps(&self) -> u64 {
        self.call_fee_bps
    }

    /// Total shares issued.
    pub fn total_shares(&self) -> Amount {
        self.total_shares
    }

    /// Vault asset total recorded after the last mutating operation.
    pub fn total_pooled_at_last_action(&self) -> Amount {
        self.total_pooled_at_last_action
    }

    /// A holder's record, if any.
    pub fn user(&self, user: AccountId) -> Option<&ShareRecord> {
        self.users.get(&user)
    }

    /// Shares owned by `user` (zero for unknown accounts).
    pub fn shares_of(&self, user: AccountId) -> Amount {
        self.users.get(&user).map(|r| r.shares).unwrap_or(0)
    }

    /// The vault's current asset claim: farm principal plus idle balance.
    /// Pending un-harvested reward is excluded.
    pub fn total_assets<E: EmissionCurve>(
        &self,
        farm: &PoolLedger<E>,
        assets: &dyn AssetLedger,
    ) -> Amount {
        farm.staked_of(self.account)
            .saturating_add(assets.balance_of(self.account))
    }

    /// Asset value of one share, fixed-point scaled. `PRECISION` (1:1) while
    /// no shares exist.
    pub fn assets_per_share<E: EmissionCurve>(
        &self,
        farm: &PoolLedger<E>,
        assets: &dyn AssetLedger,
    ) -> Result<Amount, VaultError> {
        if self.total_shares == 0 {
            return Ok(PRECISION);
        }
        mul_div(self.total_assets(farm, assets), PRECISION, self.total_shares)
            .ok_or(VaultError::ArithmeticOverflow)
    }

    /// Asset value of `user`'s shares.
    pub fn balance_of<E: EmissionCurve>(
        &self,
        farm: &PoolLedger<E>,
        assets: &dyn AssetLedger,
        user: AccountId,
    ) -> Result<Amount, VaultError> {
        let shares = self.shares_of(user);
        if shares == 0 || self.total_shares == 0 {
            return Ok(0);
        }
        mul_div(shares, self.total_assets(farm, assets), self.total_shares)
            .ok_or(VaultError::ArithmeticOverflow)
    }

    /// Deposit `amount` for `user`, minting shares against the pre-harvest
    /// pool, then restake everything idle (collecting any pending reward).
    ///
    /// Returns the shares minted.
    pub fn deposit<E: EmissionCurve>(
        &mut self,
        farm: &mut PoolLedger<E>,
        assets: &mut dyn AssetLedger,
        user: AccountId,
        amount: Amount,
        now: BlockNumber,
    ) -> Result<Amount, VaultError> {
        if amount == 0 {
            return Err(VaultError::ZeroDeposit);
        }
        let have = assets.balance_of(user);
        if have < amount {
            return Err(LedgerError::InsufficientFunds { have, need: amount }.into());
        }
        // Validates the height before any share state changes.
        farm.roll_forward(now)?;

        let pool = self.total_assets(farm, assets);
        let shares = if self.total_shares == 0 || pool == 0 {
            // Bootstrap at 1:1.
            amount
        } else {
            mul_div(amount, self.total_shares, pool).ok_or(VaultError::ArithmeticOverflow)?
        };

        assets.transfer(user, self.account, amount)?;
        self.total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(VaultError::ArithmeticOverflow)?;
        let rec = self.users.entry(user).or_default();
        rec.shares = rec
            .shares
            .checked_add(shares)
            .ok_or(VaultError::ArithmeticOverflow)?;
        rec.principal_at_last_action = rec
            .principal_at_last_action
            .checked_add(amount)
            .ok_or(VaultError::ArithmeticOverflow)?;

        self.earn(farm, assets, now)?;
        self.total_pooled_at_last_action = self.total_assets(farm, assets);
        debug!(user = %user, amount, shares, height = now, "vault deposit");
        Ok(shares)
    }

    /// Redeem `shares` for `user`, unstaking from the farm when idle funds
    /// do not cover the payout. Returns the assets paid.
    pub fn withdraw<E: EmissionCurve>(
        &mut self,
        farm: &mut PoolLedger<E>,
        assets: &mut dyn AssetLedger,
        user: AccountId,
        shares: Amount,
        now: BlockNumber,
    ) -> Result<Amount, VaultError> {
        let have = self.shares_of(user);
        if have < shares {
            return Err(VaultError::InsufficientShares { have, need: shares });
        }
        if shares == 0 {
            return Ok(0);
        }
        farm.roll_forward(now)?;

        let pool = self.total_assets(farm, assets);
        let amount =
            mul_div(shares, pool, self.total_shares).ok_or(VaultError::ArithmeticOverflow)?;

        let idle = assets.balance_of(self.account);
        if idle < amount {
            // Unstake the shortfall; this also pays pending reward into idle,
            // where it stays for the remaining holders.
            farm.withdraw(assets, self.account, amount - idle, now)?;
        }
        assets.transfer(self.account, user, amount)?;

        self.total_shares -= shares;
        let remaining_pool = self.total_assets(farm, assets);
        let total_shares = self.total_shares;
        if let Some(rec) = self.users.get_mut(&user) {
            rec.shares -= shares;
            rec.principal_at_last_action = if rec.shares == 0 || total_shares == 0 {
                0
            } else {
                mul_div(rec.shares, remaining_pool, total_shares)
                    .ok_or(VaultError::ArithmeticOverflow)?
            };
        }
        self.total_pooled_at_last_action = remaining_pool;
        debug!(user = %user, shares, amount, height = now, "vault withdraw");
        Ok(amount)
    }

    /// Redeem every share `user` holds.
    pub fn withdraw_all<E: EmissionCurve>(
        &mut self,
        farm: &mut PoolLedger<E>,
        assets: &mut dyn AssetLedger,
        user: AccountId,
        now: BlockNumber,
    ) -> Result<Amount, VaultError> {
        let shares = self.shares_of(user);
        self.withdraw(farm, assets, user, shares, now)
    }

    /// Collect pending farm reward, pay the caller's fee, restake the rest.
    ///
    /// Safe to call with zero pending reward. Returns the fee paid.
    pub fn harvest<E: EmissionCurve>(
        &mut self,
        farm: &mut PoolLedger<E>,
        assets: &mut dyn AssetLedger,
        caller: AccountId,
        now: BlockNumber,
    ) -> Result<Amount, VaultError> {
        farm.roll_forward(now)?;

        let before = assets.balance_of(self.account);
        // A zero-amount deposit settles the vault's pending reward.
        farm.deposit(assets, self.account, 0, now)?;
        let harvested = assets.balance_of(self.account).saturating_sub(before);

        let fee = mul_div(harvested, self.call_fee_bps as Amount, BPS_PRECISION)
            .ok_or(VaultError::ArithmeticOverflow)?;
        if fee > 0 {
            assets.transfer(self.account, caller, fee)?;
        }
        self.earn(farm, assets, now)?;
        self.total_pooled_at_last_action = self.total_assets(farm, assets);
        debug!(caller = %caller, harvested, fee, height = now, "harvest");
        Ok(fee)
    }

    /// Fee a prospective harvester would currently earn. Pure read; the
    /// actual payout tracks emission up to the harvest's own block.
    pub fn calculate_harvest_reward<E: EmissionCurve>(
        &self,
        farm: &PoolLedger<E>,
        now: BlockNumber,
    ) -> Result<Amount, VaultError> {
        let pending = farm.pending(self.account, now)?;
        mul_div(pending, self.call_fee_bps as Amount, BPS_PRECISION)
            .ok_or(VaultError::ArithmeticOverflow)
    }

    /// Restake the vault's idle balance into the farm.
    fn earn<E: EmissionCurve>(
        &mut self,
        farm: &mut PoolLedger<E>,
        assets: &mut dyn AssetLedger,
        now: BlockNumber,
    ) -> Result<(), VaultError> {
        let idle = assets.balance_of(self.account);
        farm.deposit(assets, self.account, idle, now)?;
        trace!(idle, height = now, "restaked idle balance");
        Ok(())
    }
}
