//! # grove-vault — Auto-compounding share vault.
//!
//! The vault stakes into a [`PoolLedger`](grove_farm::PoolLedger) as a single
//! position and issues shares against its growing claim. Harvested reward is
//! restaked as principal, which raises the asset value of every share without
//! minting any — that is the whole compounding mechanism. Anyone may trigger
//! a harvest; the caller earns a small fee on the batch to crowdsource the
//! triggering.

pub mod vault;

pub use vault::{CompoundingVault, ShareRecord};
