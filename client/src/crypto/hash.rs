//! # Hashing Utilities
//!
//! SHA-256 is the only hash function the client needs: derived addresses are
//! SHA-256 digests, and the ledger's wire format carries no other hashes on
//! the client side. We expose two shapes of the same digest and refuse to
//! support more functions without a very good reason.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
///
/// Returns a 32-byte digest as a `Vec<u8>`. Why `Vec<u8>` and not
/// `[u8; 32]`? Because half the callers immediately pass it to functions
/// that want `&[u8]`. The heap allocation is noise compared to the cost
/// of the hash itself.
///
/// # Example
///
/// ```
/// use vela_client::crypto::sha256;
///
/// let hash = sha256(b"VELA ledger");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Compute the SHA-256 hash and return a fixed-size array.
///
/// Same as `sha256()` but returns `[u8; 32]` for callers that want a
/// fixed-size type without the heap allocation. The address deriver uses
/// this shape because digests become addresses byte-for-byte.
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}
