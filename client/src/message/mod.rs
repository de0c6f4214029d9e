//! # Messages
//!
//! Compilation of operation lists into the canonical message a unit's
//! signers sign.
//!
//! ```text
//! types.rs   — AccountRef, Operation, CheckpointRef (inputs to compilation)
//! compile.rs — The compiler: dedup, flag merge, deterministic table order
//! wire.rs    — Canonical byte encoding (what actually gets signed)
//! ```
//!
//! The account table ordering is load-bearing: validators map table
//! positions to signature slots and fee accounting, so a one-position slip
//! produces a unit that is rejected or, worse, signed over the wrong bytes.
//! Everything in this module is pure and synchronous.

pub mod compile;
pub mod types;
pub mod wire;

pub use compile::{compile, CompileError, CompiledMessage, CompiledOperation, MessageHeader};
pub use types::{AccountRef, CheckpointRef, Operation};
