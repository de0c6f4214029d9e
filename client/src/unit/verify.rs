//! Local verification of signed units.
//!
//! A unit is submittable only if every signer-flagged table entry has a
//! signature that verifies against the canonical message bytes. The checks
//! run cheapest-first: slot counts before any curve arithmetic.

use thiserror::Error;

use crate::address::Address;
use crate::crypto::VelaPublicKey;
use crate::unit::types::SignedUnit;

/// Errors produced by [`verify_unit`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    /// Signature slot count does not match the message's signer count.
    #[error("expected {expected} signature slots, found {found}")]
    SlotCountMismatch { expected: usize, found: usize },

    /// The signature in some slot does not verify against the table entry
    /// that owns it.
    #[error("signature for {address} does not verify")]
    BadSignature { address: Address },
}

/// Verifies that a unit's signatures are complete and valid.
///
/// Every slot is checked against the corresponding account-table entry and
/// the exact serialized message bytes. The assembler runs this before
/// returning, so callers holding a unit from [`crate::unit::assemble`] get
/// this guarantee for free; the function stays public for callers that
/// receive units from elsewhere (relays, files, tests).
pub fn verify_unit(unit: &SignedUnit) -> Result<(), VerifyError> {
    let message = unit.message();
    let required = message.required_signers();
    let signatures = unit.signatures();

    if signatures.len() != required.len() {
        return Err(VerifyError::SlotCountMismatch {
            expected: required.len(),
            found: signatures.len(),
        });
    }

    let message_bytes = message.to_bytes();
    for (address, signature) in required.iter().zip(signatures) {
        let public_key = VelaPublicKey::from_bytes(*address.as_bytes());
        if !public_key.verify(&message_bytes, signature) {
            return Err(VerifyError::BadSignature { address: *address });
        }
    }

    Ok(())
}
