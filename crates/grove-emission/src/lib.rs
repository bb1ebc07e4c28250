//! # grove-emission — Decaying emission curve engine.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! This crate implements the cycle-decay emission model:
//! - **Cycle schedule**: emission runs at `first_cycle_multiplier` for one
//!   cycle, drops to `initial_multiplier` for the second, then keeps
//!   `decay_percent`% of the previous rate at every later cycle boundary.
//! - **Fixed-point rates**: per-cycle rates carry the 1e12 precision factor;
//!   decay steps truncate (multiply, then divide by 100) and the truncation
//!   order is bit-exact behavior.
//! - **Additive ranges**: `multiplier(a, c) == multiplier(a, b) + multiplier(b, c)`
//!   for any `a <= b <= c`, so ledgers may roll forward in arbitrary steps.

pub mod schedule;

pub use schedule::EmissionSchedule;
