//! The 32-byte ledger address value type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::ADDRESS_LENGTH;

/// Longest base58 rendering of 32 bytes.
const MAX_BASE58_LEN: usize = 44;

/// Errors produced when parsing an address from its base58 string form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("address string is the wrong size")]
    WrongSize,
    #[error("address string is not valid base58")]
    Invalid,
}

/// A VELA ledger address: 32 raw bytes, rendered as base58.
///
/// Addresses name signing identities, programs, and derived
/// (program-controlled) accounts alike; the byte representation does not
/// distinguish them. Equality, ordering, and hashing are plain byte
/// comparisons, which is what account-table deduplication relies on.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Construct an address from its raw 32-byte array.
    pub const fn from_array(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Try to construct an address from a byte slice of any length.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, ParseAddressError> {
        let bytes: [u8; ADDRESS_LENGTH] = slice
            .try_into()
            .map_err(|_| ParseAddressError::WrongSize)?;
        Ok(Self(bytes))
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Consume into the raw byte array.
    pub fn to_bytes(self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    /// Unique address for tests and benchmarks. Monotonic, not random, so
    /// failures reproduce byte-for-byte.
    pub fn new_unique() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);

        let mut bytes = [0u8; ADDRESS_LENGTH];
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        bytes[..8].copy_from_slice(&n.to_le_bytes());
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_BASE58_LEN {
            return Err(ParseAddressError::WrongSize);
        }
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| ParseAddressError::Invalid)?;
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    /// Addresses debug-print as their base58 form; the raw byte array is noise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base58_roundtrip() {
        let addr = Address::new_unique();
        let s = addr.to_string();
        let parsed: Address = s.parse().unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn new_unique_is_unique() {
        assert_ne!(Address::new_unique(), Address::new_unique());
    }

    #[test]
    fn parse_rejects_wrong_size() {
        // 16 bytes of base58 decodes fine but is not an address.
        let short = bs58::encode([7u8; 16]).into_string();
        assert_eq!(short.parse::<Address>(), Err(ParseAddressError::WrongSize));

        // Too long to even be worth decoding.
        let mut long = bs58::encode([255u8; ADDRESS_LENGTH]).into_string();
        long.push('1');
        assert_eq!(long.parse::<Address>(), Err(ParseAddressError::WrongSize));
    }

    #[test]
    fn parse_rejects_non_base58() {
        // '0', 'I', 'O', 'l' are not in the base58 alphabet.
        let mut s = bs58::encode([1u8; ADDRESS_LENGTH]).into_string();
        s.replace_range(..1, "I");
        assert_eq!(s.parse::<Address>(), Err(ParseAddressError::Invalid));
    }

    #[test]
    fn try_from_slice_checks_length() {
        assert!(Address::try_from_slice(&[0u8; 32]).is_ok());
        assert!(Address::try_from_slice(&[0u8; 31]).is_err());
        assert!(Address::try_from_slice(&[0u8; 33]).is_err());
    }

    #[test]
    fn ordering_is_byte_order() {
        let lo = Address::from_array([0u8; 32]);
        let hi = Address::from_array([255u8; 32]);
        assert!(lo < hi);
    }
}
