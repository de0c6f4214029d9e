//! The endpoint abstraction the pipeline talks through.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;
use crate::message::CheckpointRef;
use crate::unit::UnitId;

/// Errors surfaced by endpoint implementations.
///
/// The split matters downstream: `Rejected` means the ledger (or the node in
/// front of it) saw the unit and said no; `Timeout` and `MalformedResponse`
/// mean the unit's fate is unknown; `Transport` means the request never got
/// out of the building.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The request could not be sent at all (DNS, refused connection,
    /// request construction). The unit never reached the ledger.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The request was sent but no answer arrived in time. The unit may or
    /// may not have landed.
    #[error("request timed out")]
    Timeout,

    /// The node answered with a structured rejection. Some rejection paths
    /// still report the identifier the ledger assigned before rejecting;
    /// when present it is carried here for diagnosis.
    #[error("submission rejected: {reason}")]
    Rejected {
        reason: String,
        identifier: Option<UnitId>,
    },

    /// The node answered, but with something we could not interpret. The
    /// request was delivered, so the outcome is unknown.
    #[error("malformed endpoint response: {0}")]
    MalformedResponse(String),
}

/// Existence and metadata snapshot for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Balance in base units.
    pub balance: u64,
    /// The program that owns (and may mutate) this account.
    pub owner: Address,
    /// Size of the account's data region, in bytes.
    pub data_len: u64,
}

/// What the ledger knows about a previously submitted unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitStatus {
    /// Included and executed successfully.
    Confirmed,
    /// Included and failed during execution.
    Failed,
    /// The ledger has no record of this identifier. For a recently
    /// submitted unit this can mean "not yet" or "never arrived"; it
    /// becomes definitive once the unit's checkpoint has expired.
    Unknown,
}

/// The queries the pipeline and its callers need from an RPC node.
///
/// Implementations must be safe to share across concurrent callers; the
/// trait is object-safe so handles can be boxed behind `dyn Endpoint`.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// The most recent checkpoint reference, to bind new messages to.
    async fn latest_checkpoint(&self) -> Result<CheckpointRef, EndpointError>;

    /// Minimum balance an account of `data_len` bytes must hold to be
    /// exempt from storage fees.
    async fn minimum_balance_for_size(&self, data_len: u64) -> Result<u64, EndpointError>;

    /// Account existence and metadata; `None` if the address has no account.
    async fn account_info(&self, address: &Address)
        -> Result<Option<AccountSnapshot>, EndpointError>;

    /// Current balance of an address (zero for nonexistent accounts).
    async fn balance(&self, address: &Address) -> Result<u64, EndpointError>;

    /// Submit a serialized signed unit. Returns the identifier the node
    /// acknowledged. Rejections surface as [`EndpointError::Rejected`].
    async fn submit_unit(&self, unit_bytes: &[u8]) -> Result<UnitId, EndpointError>;

    /// Look up the fate of a previously submitted unit by identifier.
    /// This is the reconciliation path for indeterminate submissions.
    async fn unit_status(&self, id: &UnitId) -> Result<UnitStatus, EndpointError>;
}
