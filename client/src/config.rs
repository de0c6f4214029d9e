//! # Protocol Configuration & Constants
//!
//! Every magic number in the VELA client lives here. If you're hardcoding a
//! constant somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! These values mirror the ledger's wire format. Changing any of them without
//! a coordinated ledger upgrade produces units that fail signature
//! verification at the validator, so treat this file as consensus-adjacent.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 — the only sane choice for signatures in 2024+.
/// Deterministic, compact, and resistant to side-channel attacks when
/// implemented correctly (which ed25519-dalek is).
pub const SIGNING_ALGORITHM: &str = "Ed25519";

/// Signing key length in bytes. Ed25519 secret keys are 32 bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Public (verifying) key length in bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes. If yours isn't, something
/// has gone terribly wrong.
pub const SIGNATURE_LENGTH: usize = 64;

/// Ledger address length. Addresses are 32 raw bytes, rendered as base58.
/// Signing keys and derived (program-controlled) addresses share this shape;
/// only the former have a private half.
pub const ADDRESS_LENGTH: usize = 32;

/// Checkpoint reference length. An opaque 32-byte token naming a recent
/// ledger state; units bound to an expired checkpoint are rejected.
pub const CHECKPOINT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Address Derivation
// ---------------------------------------------------------------------------

/// Domain-separation suffix hashed into every derived address. Keeps the
/// derivation digest space disjoint from anything a signer could produce
/// by hashing other protocol data.
pub const DERIVED_ADDRESS_MARKER: &[u8; 18] = b"VelaDerivedAddress";

/// Maximum number of seeds accepted by the deriver. The bump byte appended
/// during the search does not count against this limit.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single derivation seed, in bytes.
pub const MAX_SEED_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Message & Unit Limits
// ---------------------------------------------------------------------------

/// Maximum number of distinct addresses in a compiled account table.
/// Operations index into the table with a single byte, so 256 is the
/// addressable ceiling of the wire format.
pub const MAX_TABLE_ACCOUNTS: usize = 256;

/// Maximum serialized size of a signed unit, in bytes. Matches the ledger's
/// ingress packet size; anything larger is dropped before validation.
pub const MAX_UNIT_SIZE_BYTES: usize = 1232;

// ---------------------------------------------------------------------------
// RPC & Explorer Defaults
// ---------------------------------------------------------------------------

/// Default JSON-RPC endpoint for a local devnet node.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9745";

/// Default per-request timeout for RPC calls. Submissions that outlive this
/// window are reported as indeterminate, not failed.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL of the public block explorer. Cosmetic only.
pub const DEFAULT_EXPLORER_URL: &str = "https://scan.vela.network";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_parameter_sizes() {
        assert_eq!(SIGNING_KEY_LENGTH, 32);
        assert_eq!(VERIFYING_KEY_LENGTH, 32);
        assert_eq!(SIGNATURE_LENGTH, 64);
        assert_eq!(ADDRESS_LENGTH, 32);
        assert_eq!(CHECKPOINT_LENGTH, 32);
    }

    #[test]
    fn test_marker_fits_in_a_seed_slot() {
        // The marker is hashed alongside user seeds; it must itself respect
        // the per-seed length ceiling so digest layouts stay predictable.
        assert!(DERIVED_ADDRESS_MARKER.len() <= MAX_SEED_LEN);
    }

    #[test]
    fn test_table_limit_is_byte_addressable() {
        // Wire format uses u8 indices; the table cap must not exceed what
        // a byte can address.
        assert!(MAX_TABLE_ACCOUNTS <= (u8::MAX as usize) + 1);
    }

    #[test]
    fn test_timeout_is_positive() {
        assert!(DEFAULT_RPC_TIMEOUT > Duration::ZERO);
    }
}
