//! The message compiler: from an operation list to a canonical compiled
//! message.
//!
//! Compilation does three things, all of them order-sensitive:
//!
//! 1. **Merge** every address referenced by any operation (programs
//!    included) into one deduplicated table, OR-ing the signer/writable
//!    flags across appearances.
//! 2. **Order** the table: fee payer at index 0 (always signer + writable),
//!    then writable signers, read-only signers, writable non-signers,
//!    read-only non-signers. Within each bucket, first-seen order is
//!    preserved.
//! 3. **Index** each operation against the table: one byte for the program,
//!    one byte per account, in the operation's original account order.
//!
//! The compiler is a pure function. It never talks to the network and never
//! mutates its inputs; recompiling the same inputs yields the same message
//! byte-for-byte.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::address::Address;
use crate::config::MAX_TABLE_ACCOUNTS;
use crate::message::types::{CheckpointRef, Operation};

/// Errors that can occur during message compilation.
///
/// Both indicate a caller bug, not a transient condition; retrying the same
/// inputs will fail identically.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    /// A message with no operations authorizes nothing; refuse to build it.
    #[error("operation list is empty")]
    EmptyOperationList,

    /// The merged account table exceeds what a one-byte index can address.
    #[error("account table needs {count} entries, wire format allows {max}")]
    TooManyAccounts { count: usize, max: usize },
}

/// Counts describing the signer/writable structure of the account table.
///
/// The table is ordered so that these three numbers fully determine every
/// entry's flags: indices `0..required_signers` are signers, of which the
/// last `readonly_signers` are read-only; the last `readonly_non_signers`
/// entries of the table are read-only non-signers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    pub required_signers: u8,
    pub readonly_signers: u8,
    pub readonly_non_signers: u8,
}

/// One operation rewritten as indices into the account table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledOperation {
    /// Table index of the executing program.
    pub program_index: u8,
    /// Table indices of the accounts, in the operation's original order.
    pub account_indices: Vec<u8>,
    /// Program input, carried through untouched.
    pub payload: Vec<u8>,
}

/// A fully compiled message, ready to sign.
///
/// Immutable once built. The fee payer is always table index 0 and always
/// signer + writable (it pays for the unit whether or not any operation
/// names it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledMessage {
    pub header: MessageHeader,
    pub account_table: Vec<Address>,
    pub checkpoint: CheckpointRef,
    pub operations: Vec<CompiledOperation>,
}

impl CompiledMessage {
    /// The fee payer: table index 0 by construction.
    pub fn fee_payer(&self) -> &Address {
        &self.account_table[0]
    }

    /// The addresses whose signatures this message requires, in table order.
    /// Signature slots in a signed unit correspond to these one-to-one.
    pub fn required_signers(&self) -> &[Address] {
        &self.account_table[..self.header.required_signers as usize]
    }

    /// Whether the table entry at `index` must sign.
    pub fn is_signer(&self, index: usize) -> bool {
        index < self.header.required_signers as usize
    }

    /// Whether the table entry at `index` may be written.
    pub fn is_writable(&self, index: usize) -> bool {
        let signers = self.header.required_signers as usize;
        let ro_signers = self.header.readonly_signers as usize;
        let table_len = self.account_table.len();
        let ro_non_signers = self.header.readonly_non_signers as usize;

        if index < signers {
            // Writable signers come first within the signer prefix.
            index < signers - ro_signers
        } else {
            // Writable non-signers precede the read-only tail.
            index < table_len - ro_non_signers
        }
    }
}

/// Flags accumulated for one address across all operations.
#[derive(Default, Clone, Copy)]
struct KeyMeta {
    is_signer: bool,
    is_writable: bool,
}

/// Compiles `operations` into a canonical message paying fees from
/// `fee_payer` and bound to `checkpoint`.
///
/// # Errors
///
/// [`CompileError::EmptyOperationList`] for an empty list,
/// [`CompileError::TooManyAccounts`] when the merged table exceeds
/// [`MAX_TABLE_ACCOUNTS`]. Both are terminal for this attempt.
pub fn compile(
    fee_payer: Address,
    checkpoint: CheckpointRef,
    operations: &[Operation],
) -> Result<CompiledMessage, CompileError> {
    if operations.is_empty() {
        return Err(CompileError::EmptyOperationList);
    }

    // First-seen registration order, flags merged by OR. A Vec keeps the
    // encounter order that a sorted map would destroy; tables are capped at
    // 256 entries, so the linear scans stay cheap.
    let mut keys: Vec<(Address, KeyMeta)> = Vec::new();
    let mut upsert = |keys: &mut Vec<(Address, KeyMeta)>, address: Address, meta: KeyMeta| {
        match keys.iter_mut().find(|(a, _)| *a == address) {
            Some((_, existing)) => {
                existing.is_signer |= meta.is_signer;
                existing.is_writable |= meta.is_writable;
            }
            None => keys.push((address, meta)),
        }
    };

    for op in operations {
        upsert(&mut keys, op.program, KeyMeta::default());
        for account in &op.accounts {
            upsert(
                &mut keys,
                account.address,
                KeyMeta {
                    is_signer: account.is_signer,
                    is_writable: account.is_writable,
                },
            );
        }
    }

    // The fee payer is hoisted to the front with full access regardless of
    // how (or whether) the operations referenced it.
    keys.retain(|(address, _)| *address != fee_payer);

    fn bucket(
        keys: &[(Address, KeyMeta)],
        signer: bool,
        writable: bool,
    ) -> impl Iterator<Item = Address> + '_ {
        keys.iter()
            .filter(move |(_, m)| m.is_signer == signer && m.is_writable == writable)
            .map(|(a, _)| *a)
    }

    let readonly_signers = bucket(&keys, true, false).count();
    let readonly_non_signers = bucket(&keys, false, false).count();

    let mut account_table = vec![fee_payer];
    account_table.extend(bucket(&keys, true, true));
    let required_signers = account_table.len() + readonly_signers;
    account_table.extend(bucket(&keys, true, false));
    account_table.extend(bucket(&keys, false, true));
    account_table.extend(bucket(&keys, false, false));

    if account_table.len() > MAX_TABLE_ACCOUNTS {
        return Err(CompileError::TooManyAccounts {
            count: account_table.len(),
            max: MAX_TABLE_ACCOUNTS,
        });
    }

    // A 256-entry table indexes fine (0..=255) but a count of 256 does not
    // fit the header's u8 fields; treat that corner as table overflow too.
    let header_count = |count: usize| {
        u8::try_from(count).map_err(|_| CompileError::TooManyAccounts {
            count: account_table.len(),
            max: MAX_TABLE_ACCOUNTS,
        })
    };
    let header = MessageHeader {
        required_signers: header_count(required_signers)?,
        readonly_signers: header_count(readonly_signers)?,
        readonly_non_signers: header_count(readonly_non_signers)?,
    };

    // Table positions, for rewriting operations as index lists. Every
    // referenced address was registered above, so lookups cannot miss.
    let index_of: BTreeMap<Address, u8> = account_table
        .iter()
        .enumerate()
        .map(|(i, a)| (*a, i as u8))
        .collect();

    let compiled_ops = operations
        .iter()
        .map(|op| CompiledOperation {
            program_index: index_of[&op.program],
            account_indices: op
                .accounts
                .iter()
                .map(|acc| index_of[&acc.address])
                .collect(),
            payload: op.payload.clone(),
        })
        .collect();

    Ok(CompiledMessage {
        header,
        account_table,
        checkpoint,
        operations: compiled_ops,
    })
}
