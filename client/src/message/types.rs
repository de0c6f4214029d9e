//! Input value types for message compilation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::address::{Address, ParseAddressError};
use crate::config::CHECKPOINT_LENGTH;

/// One account referenced by an operation, with the access it requires.
///
/// The same address may appear in any number of operations with different
/// flags; the compiler merges them with logical OR. An account is writable
/// in the compiled table if *any* reference wanted it writable, and a signer
/// if *any* reference required its signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub address: Address,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountRef {
    /// A writable reference. `is_signer` per the operation's needs.
    pub fn writable(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only reference.
    pub fn readonly(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: false,
        }
    }
}

/// A single on-chain operation: which program runs, which accounts it
/// touches (in the order the program expects), and its opaque payload.
///
/// Operations are produced by encoders (see [`crate::ops`]) and consumed by
/// the compiler. The payload's meaning belongs entirely to the target
/// program; nothing in this crate inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// The program that executes this operation.
    pub program: Address,
    /// Accounts passed to the program, in the program's expected order.
    pub accounts: Vec<AccountRef>,
    /// Program input, opaque to the client.
    pub payload: Vec<u8>,
}

impl Operation {
    pub fn new(program: Address, accounts: Vec<AccountRef>, payload: Vec<u8>) -> Self {
        Self {
            program,
            accounts,
            payload,
        }
    }
}

/// An opaque token naming a recent ledger state.
///
/// Compiled into every message; the ledger accepts a unit only while the
/// referenced checkpoint is recent. Expiry is the ledger's safety net
/// against replays of stale signed bytes — the client never extends it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckpointRef([u8; CHECKPOINT_LENGTH]);

impl CheckpointRef {
    pub const fn from_array(bytes: [u8; CHECKPOINT_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn try_from_slice(slice: &[u8]) -> Result<Self, ParseAddressError> {
        let bytes: [u8; CHECKPOINT_LENGTH] = slice
            .try_into()
            .map_err(|_| ParseAddressError::WrongSize)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; CHECKPOINT_LENGTH] {
        &self.0
    }
}

impl FromStr for CheckpointRef {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| ParseAddressError::Invalid)?;
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Display for CheckpointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for CheckpointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CheckpointRef({})", self)
    }
}
