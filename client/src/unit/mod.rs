//! # Signed Units
//!
//! A *unit* is the atomic thing the ledger accepts or rejects: a compiled
//! message plus one signature per required signer, in table order.
//!
//! ```text
//! types.rs    — SignedUnit and UnitId (the content-derived identifier)
//! assemble.rs — The assembler: signer-set validation and signing
//! verify.rs   — Local verification of an assembled unit
//! ```
//!
//! Lifecycle of one submission: compile, assemble, submit, then exactly one
//! of accepted / rejected / indeterminate. No step is skipped and none is
//! revisited; a rejected or indeterminate unit is rebuilt from scratch with
//! a fresh checkpoint, never resent byte-for-byte.

pub mod assemble;
pub mod types;
pub mod verify;

pub use assemble::{assemble, AssembleError};
pub use types::{SignedUnit, UnitId};
pub use verify::{verify_unit, VerifyError};
