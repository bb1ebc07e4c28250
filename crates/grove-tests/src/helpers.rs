//! Shared test helpers for integration and property tests.

use grove_core::constants::UNIT;
use grove_core::ledger::MemoryAssetLedger;
use grove_core::traits::AssetLedger;
use grove_core::types::{AccountId, Amount, BlockNumber};
use grove_emission::EmissionSchedule;
use grove_farm::{PoolLedger, RebasingLedger};
use grove_vault::CompoundingVault;

/// Emission starts at this height in every scenario.
pub const START: BlockNumber = 1_000;
/// Blocks per emission cycle.
pub const CYCLE: u64 = 195_000;
/// Base reward per block at 1x.
pub const RATE: Amount = 2 * UNIT;

/// Account holding staked principal.
pub const FARM: AccountId = AccountId([0xFA; 32]);
/// Account rewards are paid from.
pub const RESERVE: AccountId = AccountId([0xFE; 32]);
/// The compounding vault's own account.
pub const VAULT: AccountId = AccountId([0xCF; 32]);

/// Simple account id from a seed byte.
pub fn acct(seed: u8) -> AccountId {
    AccountId::from_bytes([seed; 32])
}

/// The mainnet-shaped decaying schedule: 6x launch cycle, 3x second cycle,
/// 95% retained per later cycle.
pub fn decaying_schedule() -> EmissionSchedule {
    EmissionSchedule::new(START, RATE, 6, 3, 95, CYCLE).unwrap()
}

/// Flat schedule: `RATE` per block from `START`, forever.
pub fn flat_schedule() -> EmissionSchedule {
    EmissionSchedule::flat(START, RATE).unwrap()
}

/// Asset ledger with a well-funded reward reserve.
pub fn funded_assets() -> MemoryAssetLedger {
    let mut assets = MemoryAssetLedger::new();
    assets.mint(RESERVE, 2_000_000 * UNIT).unwrap();
    assets
}

/// An accumulator farm over the decaying schedule.
pub fn pool_farm() -> PoolLedger<EmissionSchedule> {
    PoolLedger::new(decaying_schedule(), FARM, RESERVE)
}

/// A rebasing farm over the flat schedule.
pub fn rebasing_farm() -> RebasingLedger<EmissionSchedule> {
    RebasingLedger::new(flat_schedule(), FARM, RESERVE)
}

/// A vault with the default call fee.
pub fn vault() -> CompoundingVault {
    CompoundingVault::new(VAULT)
}

/// Mint `amount` to each listed account.
pub fn fund(assets: &mut MemoryAssetLedger, accounts: &[AccountId], amount: Amount) {
    for &account in accounts {
        assets.mint(account, amount).unwrap();
    }
}
