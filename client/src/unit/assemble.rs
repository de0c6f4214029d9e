//! The unit assembler: from a compiled message and a set of keys to a
//! locally verified, submittable unit.
//!
//! Signer-set validation is exact in both directions. A missing key would
//! produce an unsubmittable unit, so it fails loudly; a supplied key the
//! message doesn't require almost always means the caller built the wrong
//! message, so that fails loudly too rather than being silently dropped.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::address::Address;
use crate::crypto::VelaKeypair;
use crate::message::CompiledMessage;
use crate::unit::types::SignedUnit;
use crate::unit::verify::verify_unit;

/// Errors that can occur while assembling a unit. All are caller errors
/// except `SigningFailed`, which indicates broken key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    /// The message requires this signer and no matching key was supplied.
    #[error("no signing key supplied for required signer {0}")]
    MissingSigner(Address),

    /// A supplied key's address is not a required signer of the message.
    #[error("signing key for {0} is not required by this message")]
    UnusedSigner(Address),

    /// A key produced a signature that does not verify over the message
    /// bytes. The partially signed unit is discarded, never returned.
    #[error("signature produced for {0} failed local verification")]
    SigningFailed(Address),
}

/// Signs `message` with exactly the supplied keys and returns a unit that
/// is guaranteed to pass [`verify_unit`].
///
/// Signatures land in account-table order regardless of the order keys are
/// supplied in. Duplicate keypairs for the same address are tolerated; the
/// signature is deterministic, so it makes no difference which copy signs.
///
/// # Errors
///
/// [`AssembleError::MissingSigner`] / [`AssembleError::UnusedSigner`] when
/// the supplied key set does not exactly match the message's required signer
/// set, [`AssembleError::SigningFailed`] if a produced signature fails
/// verification.
pub fn assemble(
    message: CompiledMessage,
    keys: &[&VelaKeypair],
) -> Result<SignedUnit, AssembleError> {
    let required = message.required_signers();

    let keys_by_address: BTreeMap<Address, &VelaKeypair> =
        keys.iter().map(|kp| (kp.address(), *kp)).collect();

    // Both directions of the set match, before any signing work.
    for keypair in keys {
        if !required.contains(&keypair.address()) {
            return Err(AssembleError::UnusedSigner(keypair.address()));
        }
    }
    for address in required {
        if !keys_by_address.contains_key(address) {
            return Err(AssembleError::MissingSigner(*address));
        }
    }

    let message_bytes = message.to_bytes();
    let mut signatures = Vec::with_capacity(required.len());
    for address in required {
        let keypair = keys_by_address
            .get(address)
            .ok_or(AssembleError::MissingSigner(*address))?;
        let signature = keypair.sign(&message_bytes);
        if !keypair.public_key().verify(&message_bytes, &signature) {
            return Err(AssembleError::SigningFailed(*address));
        }
        signatures.push(signature);
    }

    let unit = SignedUnit::new(message, signatures);

    // Belt and braces: the assembler's contract is that what it returns
    // verifies, so check the finished unit as a whole.
    verify_unit(&unit).map_err(|_| AssembleError::SigningFailed(*unit.message().fee_payer()))?;

    Ok(unit)
}
