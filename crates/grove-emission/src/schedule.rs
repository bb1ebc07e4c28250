//! The emission schedule: a step function of fixed-length cycles.
//!
//! Cycle 0 (the launch cycle) runs at `first_cycle_multiplier` times the base
//! rate, cycle 1 at `initial_multiplier`, and every cycle after that keeps
//! `decay_percent`% of the previous cycle's rate. Rates are recomputed once
//! per cycle boundary, never per block, and each decay step truncates.

use serde::{Deserialize, Serialize};

use grove_core::constants::{PERCENT_DENOM, PRECISION};
use grove_core::error::EmissionError;
use grove_core::traits::EmissionCurve;
use grove_core::types::{Amount, BlockNumber};

/// Immutable emission parameters, validated at construction.
///
/// # Examples
///
/// ```
/// use grove_core::constants::PRECISION;
/// use grove_core::traits::EmissionCurve;
/// use grove_emission::EmissionSchedule;
///
/// let s = EmissionSchedule::new(100, 2, 6, 3, 95, 1000).unwrap();
/// assert_eq!(s.multiplier(100, 101).unwrap(), 6 * PRECISION);
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EmissionSchedule {
    start_block: BlockNumber,
    base_rate_per_block: Amount,
    first_cycle_multiplier: u64,
    initial_multiplier: u64,
    decay_percent: u64,
    cycle_length: u64,
}

impl EmissionSchedule {
    /// Create a schedule.
    ///
    /// # Errors
    ///
    /// - [`EmissionError::ZeroCycleLength`] if `cycle_length == 0`
    /// - [`EmissionError::DecayAboveUnity`] if `decay_percent > 100`
    /// - [`EmissionError::ZeroBaseRate`] if `base_rate_per_block == 0`
    pub fn new(
        start_block: BlockNumber,
        base_rate_per_block: Amount,
        first_cycle_multiplier: u64,
        initial_multiplier: u64,
        decay_percent: u64,
        cycle_length: u64,
    ) -> Result<Self, EmissionError> {
        if cycle_length == 0 {
            return Err(EmissionError::ZeroCycleLength);
        }
        if decay_percent as Amount > PERCENT_DENOM {
            return Err(EmissionError::DecayAboveUnity(decay_percent));
        }
        if base_rate_per_block == 0 {
            return Err(EmissionError::ZeroBaseRate);
        }
        Ok(Self {
            start_block,
            base_rate_per_block,
            first_cycle_multiplier,
            initial_multiplier,
            decay_percent,
            cycle_length,
        })
    }

    /// A schedule that emits `base_rate_per_block` every block from
    /// `start_block` on, with no decay. Used by rebasing farms.
    pub fn flat(start_block: BlockNumber, base_rate_per_block: Amount) -> Result<Self, EmissionError> {
        Self::new(start_block, base_rate_per_block, 1, 1, 100, BlockNumber::MAX)
    }

    /// Blocks per cycle.
    pub fn cycle_length(&self) -> u64 {
        self.cycle_length
    }

    /// Which cycle `block` falls in, or `None` before the start block.
    pub fn cycle_of(&self, block: BlockNumber) -> Option<u64> {
        block
            .checked_sub(self.start_block)
            .map(|offset| offset / self.cycle_length)
    }

    /// Fixed-point rate for a given cycle index.
    ///
    /// Cycle 0 is `first_cycle_multiplier * PRECISION`, cycle 1 is
    /// `initial_multiplier * PRECISION`, and each later cycle truncates to
    /// `decay_percent`% of the one before. The iteration bottoms out at zero
    /// after enough decay steps; a 100% "decay" short-circuits to the cycle-1
    /// rate for any index.
    pub fn rate_for_cycle(&self, cycle: u64) -> Amount {
        let initial = self.initial_multiplier as Amount * PRECISION;
        match cycle {
            0 => self.first_cycle_multiplier as Amount * PRECISION,
            1 => initial,
            _ if self.decay_percent as Amount == PERCENT_DENOM => initial,
            _ => {
                let mut rate = initial;
                for _ in 1..cycle {
                    if rate == 0 {
                        break;
                    }
                    rate = rate * self.decay_percent as Amount / PERCENT_DENOM;
                }
                rate
            }
        }
    }
}

impl EmissionCurve for EmissionSchedule {
    fn start_block(&self) -> BlockNumber {
        self.start_block
    }

    fn base_rate(&self) -> Amount {
        self.base_rate_per_block
    }

    fn multiplier(&self, from: BlockNumber, to: BlockNumber) -> Result<Amount, EmissionError> {
        if to <= from || from < self.start_block {
            return Ok(0);
        }

        // Work in u128 so cycle-boundary arithmetic cannot wrap.
        let start = self.start_block as u128;
        let len = self.cycle_length as u128;
        let (from, to) = (from as u128, to as u128);

        let mut cycle = ((from - start) / len) as u64;
        let mut rate = self.rate_for_cycle(cycle);
        let mut cursor = from;
        let mut acc: Amount = 0;

        while cursor < to {
            let cycle_end = start + (cycle as u128 + 1) * len;
            let upper = cycle_end.min(to);
            let blocks = upper - cursor;
            acc = blocks
                .checked_mul(rate)
                .and_then(|segment| acc.checked_add(segment))
                .ok_or(EmissionError::ArithmeticOverflow)?;
            cursor = upper;
            cycle += 1;

            rate = match cycle {
                1 => self.initial_multiplier as Amount * PRECISION,
                _ => rate * self.decay_percent as Amount / PERCENT_DENOM,
            };
            if rate == 0 {
                // Decayed to nothing; the rest of the range emits zero.
                break;
            }
            if self.decay_percent as Amount == PERCENT_DENOM && cycle >= 1 && cursor < to {
                // Constant tail: no later boundary changes the rate.
                let blocks = to - cursor;
                acc = blocks
                    .checked_mul(rate)
                    .and_then(|segment| acc.checked_add(segment))
                    .ok_or(EmissionError::ArithmeticOverflow)?;
                break;
            }
        }

        Ok(acc)
    }

    fn rate_at(&self, block: BlockNumber) -> Amount {
        match self.cycle_of(block) {
            Some(cycle) => self.rate_for_cycle(cycle),
            None => 0,
        }
    }
}
