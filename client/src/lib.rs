// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # VELA Client — Core Library
//!
//! The client-side pipeline for the VELA settlement ledger: compose one or
//! more on-chain operations into a single atomic unit, sign it with every
//! required key, submit it over JSON-RPC, and — when things go wrong — keep
//! enough information to find out what actually happened.
//!
//! The hard part of talking to a ledger is not the happy path, it's that
//! the wire format is byte-exact (one flag out of place and your signature
//! is over the wrong message), the checkpoint reference expires underneath
//! you, and "it failed" can mean never-sent, sent-and-refused, or
//! sent-into-the-void. This crate exists to get those three things right
//! once.
//!
//! ## Architecture
//!
//! The modules mirror the stages of one submission:
//!
//! - **crypto** — Ed25519 keypairs, signatures, SHA-256. Don't roll your own.
//! - **address** — The 32-byte address type and program-controlled
//!   address derivation (off-curve, no private key can exist).
//! - **message** — Operation descriptors and the compiler that merges them
//!   into a canonical account table + signable bytes.
//! - **unit** — Signature slots, exact signer-set validation, and the
//!   locally verified signed unit.
//! - **rpc** — The endpoint trait, the HTTP implementation, and the
//!   submitter that classifies every outcome as accepted, rejected, or
//!   indeterminate.
//! - **ops** — Encoders for the built-in programs (transfers, storage
//!   accounts, records, metadata, minting). Opaque payloads to everyone else.
//! - **cache** — Named addresses persisted between script runs.
//! - **explorer** — Clickable URLs for humans. Cosmetic.
//! - **config** — Protocol constants and network parameters.
//!
//! ## Design Philosophy
//!
//! 1. Compilation and signing are pure; the network appears only behind
//!    [`rpc::Endpoint`], which tests replace with a fake.
//! 2. Errors carry the offending address or identifier. Debugging a failed
//!    submission should not require re-deriving state.
//! 3. A stale unit is rebuilt, never resent. Checkpoint expiry makes
//!    resubmitted bytes fail closed, and we keep it that way.

pub mod address;
pub mod cache;
pub mod config;
pub mod crypto;
pub mod explorer;
pub mod message;
pub mod ops;
pub mod rpc;
pub mod unit;
