//! Operation encoders for the built-in programs.
//!
//! Each function here knows one program's calling convention: which accounts
//! it expects, in what order, with what access, and how its payload is laid
//! out. The rest of the client treats the result as an opaque [`Operation`];
//! the compiler neither knows nor cares what a transfer is.
//!
//! Payloads are bincode-encoded enum variants. The enums are `pub` so
//! downstream tooling (decoders, explorers) can reuse the layouts.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::message::types::{AccountRef, Operation};

// ---------------------------------------------------------------------------
// Well-known program addresses
// ---------------------------------------------------------------------------

/// The system program: account creation and native unit transfers.
pub const SYSTEM_PROGRAM: Address = Address::from_array(*b"VelaSystemProgram...............");

/// The record program: small named data records under derived addresses.
pub const RECORD_PROGRAM: Address = Address::from_array(*b"VelaRecordProgram...............");

/// The metadata program: descriptive records attached to assets.
pub const METADATA_PROGRAM: Address = Address::from_array(*b"VelaMetadataProgram.............");

/// The token program: asset mints and unit issuance.
pub const TOKEN_PROGRAM: Address = Address::from_array(*b"VelaTokenProgram................");

// ---------------------------------------------------------------------------
// Payload layouts
// ---------------------------------------------------------------------------

/// System program payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemOp {
    /// Create a fresh storage account funded with `initial_balance` and
    /// `data_len` bytes of zeroed data, owned by `owner`.
    CreateStorageAccount {
        initial_balance: u64,
        data_len: u64,
        owner: Address,
    },
    /// Move `amount` native units from the first account to the second.
    TransferUnits { amount: u64 },
}

/// Record program payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordOp {
    /// Initialize a ledger record at a derived address. The `bump` is the
    /// derivation bump the program re-checks on chain.
    InitializeRecord { bump: u8, data_len: u64 },
}

/// Metadata program payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataOp {
    CreateRecord { content: Vec<u8> },
    UpdateRecord { content: Vec<u8> },
}

/// Token program payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenOp {
    /// Issue `amount` units of the mint to the recipient account.
    MintUnits { amount: u64 },
}

fn encode<T: Serialize>(payload: &T) -> Vec<u8> {
    // These enums contain only integers, byte vectors, and addresses;
    // bincode cannot fail on them.
    bincode::serialize(payload).expect("operation payloads always serialize")
}

// ---------------------------------------------------------------------------
// Encoders
// ---------------------------------------------------------------------------

/// Transfer `amount` native units from `from` to `to`.
///
/// `from` signs and is debited; `to` only needs to be writable. Recipients
/// are never signers — you cannot refuse money on this ledger.
pub fn transfer_units(from: Address, to: Address, amount: u64) -> Operation {
    Operation::new(
        SYSTEM_PROGRAM,
        vec![
            AccountRef::writable(from, true),
            AccountRef::writable(to, false),
        ],
        encode(&SystemOp::TransferUnits { amount }),
    )
}

/// Create a fresh storage account.
///
/// Both the funding account and the new account sign: the funder authorizes
/// the debit, the new account proves possession of its key (derived
/// addresses are created through their owning program instead).
pub fn create_storage_account(
    funder: Address,
    new_account: Address,
    owner: Address,
    initial_balance: u64,
    data_len: u64,
) -> Operation {
    Operation::new(
        SYSTEM_PROGRAM,
        vec![
            AccountRef::writable(funder, true),
            AccountRef::writable(new_account, true),
        ],
        encode(&SystemOp::CreateStorageAccount {
            initial_balance,
            data_len,
            owner,
        }),
    )
}

/// Initialize a ledger record at a derived address.
///
/// `record` is a derived address (writable, not a signer — no key exists for
/// it); `authority` signs the initialization and `funder` pays for storage.
pub fn initialize_ledger_record(
    funder: Address,
    record: Address,
    authority: Address,
    bump: u8,
    data_len: u64,
) -> Operation {
    Operation::new(
        RECORD_PROGRAM,
        vec![
            AccountRef::writable(funder, true),
            AccountRef::writable(record, false),
            AccountRef::readonly(authority, true),
        ],
        encode(&RecordOp::InitializeRecord { bump, data_len }),
    )
}

/// Create a metadata record for `subject`.
pub fn create_metadata_record(
    funder: Address,
    metadata: Address,
    subject: Address,
    authority: Address,
    content: Vec<u8>,
) -> Operation {
    Operation::new(
        METADATA_PROGRAM,
        vec![
            AccountRef::writable(funder, true),
            AccountRef::writable(metadata, false),
            AccountRef::readonly(subject, false),
            AccountRef::readonly(authority, true),
        ],
        encode(&MetadataOp::CreateRecord { content }),
    )
}

/// Replace the content of an existing metadata record.
pub fn update_metadata_record(metadata: Address, authority: Address, content: Vec<u8>) -> Operation {
    Operation::new(
        METADATA_PROGRAM,
        vec![
            AccountRef::writable(metadata, false),
            AccountRef::readonly(authority, true),
        ],
        encode(&MetadataOp::UpdateRecord { content }),
    )
}

/// Mint `amount` units of `mint` into `recipient`.
pub fn mint_units(mint: Address, recipient: Address, authority: Address, amount: u64) -> Operation {
    Operation::new(
        TOKEN_PROGRAM,
        vec![
            AccountRef::writable(mint, false),
            AccountRef::writable(recipient, false),
            AccountRef::readonly(authority, true),
        ],
        encode(&TokenOp::MintUnits { amount }),
    )
}
