//! Core scalar types.
//!
//! All asset quantities are in base units (1 token = 10^18 base units) and
//! use `u128` per engine convention; block heights are `u64`. Intermediate
//! products that can exceed 128 bits go through `primitive_types::U256`
//! at the call site.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An asset or reward quantity in base units.
pub type Amount = u128;

/// A block height.
pub type BlockNumber = u64;

/// A 32-byte account identifier.
///
/// The engine never interprets the bytes; they are an opaque key into the
/// asset ledger and the per-user position maps.
///
/// # Examples
///
/// ```
/// use grove_core::types::AccountId;
/// let a = AccountId::from_bytes([7; 32]);
/// assert_eq!(a.as_bytes()[0], 7);
/// assert!(!a.is_zero());
/// ```
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// The zero account (32 zero bytes). Used as a burn/system sentinel.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create an AccountId from a byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero account.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
