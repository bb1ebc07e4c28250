//! Engine constants. All asset values in base units (1 token = 10^18 units).

use crate::types::Amount;

/// Base units per whole token.
pub const UNIT: Amount = 1_000_000_000_000_000_000;

/// Fixed-point scale for emission multipliers and the per-share accumulator.
///
/// Multipliers, per-cycle rates, and `acc_reward_per_share` all carry this
/// factor; it is divided out exactly once, at the final user-facing readout.
/// Dividing mid-computation changes truncation points and is a consensus
/// defect, not a style choice.
pub const PRECISION: Amount = 1_000_000_000_000;

/// Denominator for the per-cycle decay percentage (0–100).
pub const PERCENT_DENOM: Amount = 100;

/// Basis-point denominator for fee math.
pub const BPS_PRECISION: Amount = 10_000;

/// Default harvest call fee: 0.25% of each harvested batch, paid to whoever
/// triggers the harvest.
pub const DEFAULT_HARVEST_CALL_FEE_BPS: u64 = 25;

/// Mainnet emission parameters: first cycle runs at 6x the base rate.
pub const FIRST_CYCLE_MULTIPLIER: u64 = 6;
/// Mainnet emission parameters: second cycle starts at 3x the base rate.
pub const INITIAL_MULTIPLIER: u64 = 3;
/// Mainnet emission parameters: each later cycle keeps 95% of the previous
/// cycle's rate.
pub const DECAY_PERCENT: u64 = 95;
/// Mainnet emission parameters: blocks per cycle.
pub const CYCLE_LENGTH: u64 = 195_000;
/// Mainnet emission parameters: reward units emitted per block at 1x.
pub const BASE_RATE_PER_BLOCK: Amount = 2 * UNIT;
