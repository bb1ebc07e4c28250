//! # grove-farm — Lazy proportional reward accounting.
//!
//! Two alternative ledger models distribute curve emission across stakers
//! without ever iterating over them:
//!
//! - [`PoolLedger`] — the accumulator model. One global reward-per-share
//!   accumulator rolls forward lazily; each position carries a reward debt so
//!   pending reward is a single subtraction.
//! - [`RebasingLedger`] — the snapshot model. An append-only series of pool
//!   snapshots plus a per-user cursor; balances compound lazily by replaying
//!   emission since the user's last checkpoint.
//!
//! Both are O(1) per user action regardless of participant count, and both
//! drop emission for block ranges where the pool is empty rather than banking
//! it for the next depositor.

pub mod pool;
pub mod rebasing;

pub use pool::{PoolLedger, StakePosition};
pub use rebasing::{RebasingLedger, Snapshot, UserRecord};
