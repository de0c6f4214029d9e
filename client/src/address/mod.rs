//! # Addresses
//!
//! Ledger addresses and program-controlled address derivation.
//!
//! ```text
//! types.rs  — The 32-byte Address value type (base58 display/parse)
//! derive.rs — Deterministic derivation of program-controlled addresses
//! ```
//!
//! An address is 32 opaque bytes. Most are Ed25519 public keys with a
//! private half somewhere; derived addresses are digests deliberately chosen
//! to lie off the curve, so no private key for them can exist and only the
//! owning program can authorize actions on them.

pub mod derive;
pub mod types;

pub use derive::{derive, derive_with_bump, DeriveError};
pub use types::{Address, ParseAddressError};
