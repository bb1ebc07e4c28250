//! Error types for the Grove engine.
use thiserror::Error;

use crate::types::{Amount, BlockNumber};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient funds: have {have}, need {need}")] InsufficientFunds { have: Amount, need: Amount },
    #[error("balance overflow")] BalanceOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmissionError {
    #[error("cycle length must be non-zero")] ZeroCycleLength,
    #[error("decay percent {0} exceeds 100")] DecayAboveUnity(u64),
    #[error("base rate must be non-zero")] ZeroBaseRate,
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FarmError {
    #[error("insufficient stake: have {have}, need {need}")] InsufficientStake { have: Amount, need: Amount },
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: Amount, need: Amount },
    #[error("height regression: last seen {last}, got {got}")] HeightRegression { last: BlockNumber, got: BlockNumber },
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error(transparent)] Emission(#[from] EmissionError),
    #[error(transparent)] Funds(#[from] LedgerError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("insufficient shares: have {have}, need {need}")] InsufficientShares { have: Amount, need: Amount },
    #[error("zero deposit")] ZeroDeposit,
    #[error("call fee {0} bps exceeds 100%")] FeeAboveUnity(u64),
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error(transparent)] Farm(#[from] FarmError),
    #[error(transparent)] Funds(#[from] LedgerError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroveError {
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Emission(#[from] EmissionError),
    #[error(transparent)] Farm(#[from] FarmError),
    #[error(transparent)] Vault(#[from] VaultError),
}
