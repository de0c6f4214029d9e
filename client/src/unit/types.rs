//! The signed unit and its content-derived identifier.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::SIGNATURE_LENGTH;
use crate::crypto::VelaSignature;
use crate::message::wire::encode_len;
use crate::message::CompiledMessage;

/// Error parsing a [`UnitId`] from its base58 string form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseUnitIdError {
    #[error("identifier string is the wrong size")]
    WrongSize,
    #[error("identifier string is not valid base58")]
    Invalid,
}

/// The identifier of a signed unit: the fee payer's 64-byte signature over
/// the message, rendered as base58.
///
/// Computed client-side the moment the unit is signed, before any network
/// traffic. This is what makes failed submissions diagnosable: whatever the
/// endpoint did or didn't do, the caller already holds the name under which
/// the ledger would have recorded the unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId([u8; SIGNATURE_LENGTH]);

impl UnitId {
    /// Derive the identifier from a signature (normally the first slot).
    ///
    /// Returns `None` if the signature bytes are malformed; signatures
    /// produced by this crate always convert.
    pub fn from_signature(signature: &VelaSignature) -> Option<Self> {
        let bytes: [u8; SIGNATURE_LENGTH] = signature.as_bytes().try_into().ok()?;
        Some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }
}

impl FromStr for UnitId {
    type Err = ParseUnitIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| ParseUnitIdError::Invalid)?;
        let arr: [u8; SIGNATURE_LENGTH] =
            bytes.try_into().map_err(|_| ParseUnitIdError::WrongSize)?;
        Ok(Self(arr))
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self)
    }
}

/// A compiled message together with every required signature, table order.
///
/// Construction goes through [`crate::unit::assemble`], which guarantees the
/// signature vector is complete and locally verified; the fields stay
/// private so nothing else can hand out a half-signed unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUnit {
    message: CompiledMessage,
    signatures: Vec<VelaSignature>,
}

impl SignedUnit {
    /// Crate-internal constructor; see [`crate::unit::assemble`].
    pub(crate) fn new(message: CompiledMessage, signatures: Vec<VelaSignature>) -> Self {
        Self {
            message,
            signatures,
        }
    }

    pub fn message(&self) -> &CompiledMessage {
        &self.message
    }

    /// Signatures in account-table order; slot `i` belongs to table entry `i`.
    pub fn signatures(&self) -> &[VelaSignature] {
        &self.signatures
    }

    /// The unit's content-derived identifier (first signature slot).
    ///
    /// The assembler never produces a unit without a fee-payer signature,
    /// so this always succeeds for units built by this crate.
    pub fn id(&self) -> UnitId {
        UnitId::from_signature(&self.signatures[0])
            .expect("assembled units carry a well-formed fee payer signature")
    }

    /// Serializes the unit for submission: compact-length-prefixed
    /// signatures followed by the canonical message bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let message_bytes = self.message.to_bytes();
        let mut buf =
            Vec::with_capacity(3 + self.signatures.len() * SIGNATURE_LENGTH + message_bytes.len());
        encode_len(&mut buf, self.signatures.len());
        for signature in &self.signatures {
            buf.extend_from_slice(signature.as_bytes());
        }
        buf.extend_from_slice(&message_bytes);
        buf
    }
}
