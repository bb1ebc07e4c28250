//! Wide fixed-point helpers.
//!
//! `u128` quantities multiplied by fixed-point scale factors can exceed 128
//! bits; these helpers route the product through `U256` and divide back down,
//! truncating. Multiply-before-divide ordering is part of the engine's
//! bit-exact semantics.

use primitive_types::U256;

use crate::types::Amount;

/// `a * b / denom` with a 256-bit intermediate, flooring.
///
/// Returns `None` when `denom` is zero or the result exceeds `u128`.
///
/// # Examples
///
/// ```
/// use grove_core::math::mul_div;
/// assert_eq!(mul_div(10, 3, 4), Some(7));
/// assert_eq!(mul_div(u128::MAX, u128::MAX, 1), None);
/// assert_eq!(mul_div(1, 1, 0), None);
/// ```
pub fn mul_div(a: Amount, b: Amount, denom: Amount) -> Option<Amount> {
    if denom == 0 {
        return None;
    }
    let wide = U256::from(a) * U256::from(b) / U256::from(denom);
    to_amount(wide)
}

/// Narrow a `U256` back to `u128`. `None` on overflow.
pub fn to_amount(v: U256) -> Option<Amount> {
    if v > U256::from(u128::MAX) {
        return None;
    }
    Some(v.as_u128())
}
