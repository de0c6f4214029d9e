//! # Cryptographic Primitives
//!
//! Low-level building blocks for the VELA client: Ed25519 keypairs and
//! signatures, and the SHA-256 helpers the address deriver hashes with.
//! Don't roll your own — everything here wraps audited implementations.

pub mod hash;
pub mod keys;

pub use hash::{sha256, sha256_array};
pub use keys::{
    read_keypair_file, write_keypair_file, KeyError, VelaKeypair, VelaPublicKey, VelaSignature,
};
