//! # Key Management
//!
//! Ed25519 keypair handling for VELA signers.
//!
//! Every signer-flagged entry in a compiled account table traces back to one
//! of these keypairs. This module covers creation, (de)serialization, the
//! funding-keypair file format used by scripts, and signing.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, ed25519-dalek).
//! - Key generation uses the OS CSPRNG (`OsRng`). If your OS RNG is broken,
//!   you have bigger problems than VELA.
//! - Key bytes are never logged. If you add logging to this module,
//!   you will be asked to leave.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::address::Address;
use crate::config::SIGNATURE_LENGTH;

/// Errors that can occur during key operations.
///
/// Intentionally vague about *why* something failed; leaking details about
/// key material through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("keypair file {path} is unreadable or malformed: {reason}")]
    KeypairFile { path: String, reason: String },
}

/// A VELA signing identity wrapping an Ed25519 signing key.
///
/// The fee payer, every additional required signer, and every freshly
/// created account's ownership proof is one of these.
///
/// ## Serialization
///
/// `VelaKeypair` intentionally does NOT implement `Serialize`/`Deserialize`.
/// Serializing private keys should be a deliberate, conscious act, not
/// something that happens because someone shoved a keypair into a JSON
/// response. Use [`write_keypair_file`] / [`read_keypair_file`] or
/// `to_bytes()` / `from_bytes()` explicitly.
pub struct VelaKeypair {
    signing_key: SigningKey,
}

/// The public half of a VELA signing identity, safe to share with the world.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VelaPublicKey {
    bytes: [u8; 32],
}

/// An Ed25519 signature over a message.
///
/// 64 bytes, deterministic for a given (key, message) pair. Stored as
/// `Vec<u8>` for serde compatibility, but always exactly 64 bytes when
/// produced by this crate. A malformed signature simply fails verification;
/// no panics, no undefined behavior.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VelaSignature {
    bytes: Vec<u8>,
}

impl VelaKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Constructs a keypair deterministically from a 32-byte seed.
    ///
    /// In Ed25519 the 32-byte secret key *is* the seed, so this doubles as
    /// the from-raw-bytes constructor. Weak seed in, weak key out; use a
    /// proper CSPRNG or KDF to produce the seed bytes.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Reconstruct a keypair from raw 32-byte secret key material.
    pub fn from_bytes(secret_key_bytes: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self::from_seed(secret_key_bytes)
    }

    /// Reconstruct a keypair from a hex-encoded secret key.
    ///
    /// Convenience for devnet scripting. Please don't put raw hex keys in
    /// config files in production.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let arr: [u8; SECRET_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_bytes(&arr))
    }

    /// Returns the public key associated with this keypair.
    pub fn public_key(&self) -> VelaPublicKey {
        VelaPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Returns this keypair's ledger address: the public key bytes, verbatim.
    ///
    /// This is what appears in account tables and what the fee debits hit.
    pub fn address(&self) -> Address {
        Address::from_array(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message and return a `VelaSignature`.
    ///
    /// Ed25519 signatures are deterministic — the same (key, message) pair
    /// always produces the same signature. No nonce games, no randomness
    /// needed at signing time.
    pub fn sign(&self, message: &[u8]) -> VelaSignature {
        let sig = self.signing_key.sign(message);
        VelaSignature {
            bytes: sig.to_bytes().to_vec(),
        }
    }

    /// Verify a signature against this keypair's public key.
    pub fn verify(&self, message: &[u8], signature: &VelaSignature) -> bool {
        self.public_key().verify(message, signature)
    }

    /// Exports the raw 32-byte secret key material.
    ///
    /// **Handle with extreme care.** Don't log it. Don't send it over the
    /// network in plaintext. Don't store it in a text file called
    /// "my_keys.txt" on your desktop.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl Clone for VelaKeypair {
    /// Cloning a keypair is allowed but should make you uncomfortable.
    /// Every copy of a private key is another thing to protect.
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for VelaKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material in debug output. Not even "partially."
        write!(f, "VelaKeypair(address={})", self.address())
    }
}

impl PartialEq for VelaKeypair {
    /// Two keypairs are equal if their public keys match. Comparing secret
    /// material in a non-constant-time way is a bad habit, and for identity
    /// purposes the public key is what matters.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for VelaKeypair {}

// ---------------------------------------------------------------------------
// Keypair files
// ---------------------------------------------------------------------------

/// Reads a funding keypair from the JSON byte-array file format scripts use:
/// a 64-element array holding the secret key followed by the public key.
///
/// The file is validated on load: exact length, all-zero rejection, and a
/// check that the embedded public half matches the secret half. A file that
/// fails any of these produces [`KeyError::KeypairFile`], never a keypair.
pub fn read_keypair_file<P: AsRef<Path>>(path: P) -> Result<VelaKeypair, KeyError> {
    let path_str = path.as_ref().display().to_string();
    let file_err = |reason: String| KeyError::KeypairFile {
        path: path_str.clone(),
        reason,
    };

    let contents = std::fs::read(path.as_ref()).map_err(|e| file_err(e.to_string()))?;
    let bytes: Vec<u8> =
        serde_json::from_slice(&contents).map_err(|e| file_err(format!("not a JSON byte array: {e}")))?;

    if bytes.len() != SECRET_KEY_LENGTH * 2 {
        return Err(file_err(format!(
            "expected {} bytes, got {}",
            SECRET_KEY_LENGTH * 2,
            bytes.len()
        )));
    }
    if bytes.iter().all(|&b| b == 0) {
        return Err(file_err("all-zero key material rejected".to_string()));
    }

    let secret: [u8; 32] = bytes[..SECRET_KEY_LENGTH]
        .try_into()
        .map_err(|_| file_err("malformed secret half".to_string()))?;
    let keypair = VelaKeypair::from_bytes(&secret);

    // The embedded public half must match what the secret half derives to;
    // a mismatch means the file was hand-edited or corrupted.
    if keypair.public_key().as_bytes() != &bytes[SECRET_KEY_LENGTH..] {
        return Err(file_err("public half does not match secret half".to_string()));
    }

    Ok(keypair)
}

/// Writes a keypair in the JSON byte-array file format, secret half first.
///
/// Parent directories are created as needed. The file contains private key
/// material; callers on shared systems should tighten permissions themselves.
pub fn write_keypair_file<P: AsRef<Path>>(path: P, keypair: &VelaKeypair) -> Result<(), KeyError> {
    let path_str = path.as_ref().display().to_string();
    let file_err = |reason: String| KeyError::KeypairFile {
        path: path_str.clone(),
        reason,
    };

    let mut bytes = keypair.to_bytes().to_vec();
    bytes.extend_from_slice(keypair.public_key().as_bytes());
    let json = serde_json::to_string(&bytes).map_err(|e| file_err(e.to_string()))?;

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent).map_err(|e| file_err(e.to_string()))?;
    }
    std::fs::write(path.as_ref(), json).map_err(|e| file_err(e.to_string()))
}

// ---------------------------------------------------------------------------
// VelaPublicKey
// ---------------------------------------------------------------------------

impl VelaPublicKey {
    /// Create a `VelaPublicKey` from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// The ledger address this public key occupies: the same 32 bytes.
    pub fn to_address(&self) -> Address {
        Address::from_array(self.bytes)
    }

    /// Verify a signature against this public key.
    ///
    /// Returns a boolean rather than a `Result` because the vast majority of
    /// callers just want a yes/no answer and don't care about the specific
    /// failure mode. Malformed key or signature bytes verify as `false`.
    pub fn verify(&self, message: &[u8], signature: &VelaSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let Some(dalek_sig) = signature.to_dalek_signature() else {
            return false;
        };
        verifying_key.verify(message, &dalek_sig).is_ok()
    }

    /// Hex-encoded representation. 64 characters for 32 bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Display for VelaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_address())
    }
}

impl fmt::Debug for VelaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VelaPublicKey({})", self.to_address())
    }
}

// ---------------------------------------------------------------------------
// VelaSignature
// ---------------------------------------------------------------------------

impl VelaSignature {
    /// Create a signature from its raw 64-byte representation.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Returns the raw signature bytes (always 64 for valid signatures).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Convert to the ed25519-dalek `Signature` type for internal use.
    ///
    /// Returns `None` if the internal bytes aren't exactly 64 bytes, which
    /// shouldn't happen for signatures this crate produced, but crypto code
    /// doesn't get to assume things are fine.
    pub fn to_dalek_signature(&self) -> Option<DalekSignature> {
        let arr: [u8; SIGNATURE_LENGTH] = self.bytes.as_slice().try_into().ok()?;
        Some(DalekSignature::from_bytes(&arr))
    }

    /// Hex-encoded signature string. 128 characters for a valid signature.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for VelaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(&self.bytes).into_string())
    }
}

impl fmt::Debug for VelaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b58 = bs58::encode(&self.bytes).into_string();
        if b58.len() > 16 {
            write!(f, "VelaSignature({}...{})", &b58[..8], &b58[b58.len() - 8..])
        } else {
            write!(f, "VelaSignature({})", b58)
        }
    }
}
