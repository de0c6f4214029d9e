//! JSON-RPC 2.0 endpoint implementation over HTTP.
//!
//! Wire methods: `getLatestCheckpoint`, `getMinimumBalanceForSize`,
//! `getAccountInfo`, `getBalance`, `submitUnit`, `getUnitStatus`. Units are
//! submitted base64-encoded. Structured node errors arrive as the standard
//! JSON-RPC `error` object; when a rejection carries `data.identifier`, it
//! is recovered so failed submissions remain diagnosable.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::address::Address;
use crate::config::{DEFAULT_RPC_TIMEOUT, DEFAULT_RPC_URL};
use crate::message::CheckpointRef;
use crate::rpc::endpoint::{AccountSnapshot, Endpoint, EndpointError, UnitStatus};
use crate::unit::UnitId;

/// An RPC node reached over HTTP.
///
/// Cheap to clone (the underlying connection pool is shared) and safe to use
/// from any number of concurrent tasks.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    url: String,
    client: reqwest::Client,
}

/// The JSON-RPC error object, as much of it as we consume.
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Value,
}

impl HttpEndpoint {
    /// Connect to the node at `url` with the default request timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self::new_with_timeout(url, DEFAULT_RPC_TIMEOUT)
    }

    /// Connect to the local devnet node.
    pub fn localhost() -> Self {
        Self::new(DEFAULT_RPC_URL)
    }

    /// Connect with an explicit per-request timeout. Submissions that
    /// exceed it surface as [`EndpointError::Timeout`], which the submitter
    /// classifies as indeterminate.
    pub fn new_with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs one JSON-RPC call and returns the `result` value.
    async fn call(&self, method: &str, params: Value) -> Result<Value, EndpointError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        tracing::debug!(method, url = %self.url, "rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| EndpointError::MalformedResponse(e.to_string()))?;

        if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
            return Err(parse_rpc_error(error));
        }

        body.get("result")
            .cloned()
            .ok_or_else(|| EndpointError::MalformedResponse("response carries no result".into()))
    }
}

/// Sort a reqwest failure into the taxonomy the submitter cares about.
fn classify_reqwest_error(error: reqwest::Error) -> EndpointError {
    if error.is_timeout() {
        EndpointError::Timeout
    } else if error.is_connect() || error.is_builder() || error.is_request() {
        EndpointError::Transport(error.to_string())
    } else {
        // The request left the building; anything else is unknown-outcome.
        EndpointError::MalformedResponse(error.to_string())
    }
}

/// Maps a JSON-RPC error object to [`EndpointError::Rejected`], recovering
/// the ledger-assigned identifier from `data.identifier` when one is there.
/// Recovery is best-effort by design; an absent or unparseable identifier
/// degrades to `None`, never to a different error.
fn parse_rpc_error(error: &Value) -> EndpointError {
    let parsed: RpcErrorObject = match serde_json::from_value(error.clone()) {
        Ok(parsed) => parsed,
        Err(e) => return EndpointError::MalformedResponse(format!("unreadable error object: {e}")),
    };

    let identifier = parsed
        .data
        .get("identifier")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<UnitId>().ok());

    let reason = if parsed.message.is_empty() {
        "unspecified rejection".to_string()
    } else {
        parsed.message
    };

    EndpointError::Rejected { reason, identifier }
}

fn result_str(value: &Value) -> Result<&str, EndpointError> {
    value
        .as_str()
        .ok_or_else(|| EndpointError::MalformedResponse("expected a string result".into()))
}

fn result_u64(value: &Value) -> Result<u64, EndpointError> {
    value
        .as_u64()
        .ok_or_else(|| EndpointError::MalformedResponse("expected an unsigned integer".into()))
}

#[async_trait]
impl Endpoint for HttpEndpoint {
    async fn latest_checkpoint(&self) -> Result<CheckpointRef, EndpointError> {
        let result = self.call("getLatestCheckpoint", json!([])).await?;
        result_str(&result)?
            .parse::<CheckpointRef>()
            .map_err(|e| EndpointError::MalformedResponse(format!("bad checkpoint: {e}")))
    }

    async fn minimum_balance_for_size(&self, data_len: u64) -> Result<u64, EndpointError> {
        let result = self
            .call("getMinimumBalanceForSize", json!([data_len]))
            .await?;
        result_u64(&result)
    }

    async fn account_info(
        &self,
        address: &Address,
    ) -> Result<Option<AccountSnapshot>, EndpointError> {
        let result = self
            .call("getAccountInfo", json!([address.to_string()]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }

        let balance = result_u64(
            result
                .get("balance")
                .ok_or_else(|| EndpointError::MalformedResponse("account missing balance".into()))?,
        )?;
        let data_len = result_u64(
            result
                .get("dataLen")
                .ok_or_else(|| EndpointError::MalformedResponse("account missing dataLen".into()))?,
        )?;
        let owner = result
            .get("owner")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<Address>().ok())
            .ok_or_else(|| EndpointError::MalformedResponse("account missing owner".into()))?;

        Ok(Some(AccountSnapshot {
            balance,
            owner,
            data_len,
        }))
    }

    async fn balance(&self, address: &Address) -> Result<u64, EndpointError> {
        let result = self.call("getBalance", json!([address.to_string()])).await?;
        result_u64(&result)
    }

    async fn submit_unit(&self, unit_bytes: &[u8]) -> Result<UnitId, EndpointError> {
        let encoded = BASE64.encode(unit_bytes);
        let result = self.call("submitUnit", json!([encoded])).await?;
        result_str(&result)?
            .parse::<UnitId>()
            .map_err(|e| EndpointError::MalformedResponse(format!("bad identifier: {e}")))
    }

    async fn unit_status(&self, id: &UnitId) -> Result<UnitStatus, EndpointError> {
        let result = self.call("getUnitStatus", json!([id.to_string()])).await?;
        match result_str(&result)? {
            "confirmed" => Ok(UnitStatus::Confirmed),
            "failed" => Ok(UnitStatus::Failed),
            "unknown" => Ok(UnitStatus::Unknown),
            other => Err(EndpointError::MalformedResponse(format!(
                "unrecognized unit status {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_with_identifier_is_recovered() {
        let kp = crate::crypto::VelaKeypair::generate();
        let sig = kp.sign(b"rejected unit");
        let id = UnitId::from_signature(&sig).unwrap();

        let error = json!({
            "code": -32002,
            "message": "checkpoint expired",
            "data": { "identifier": id.to_string() },
        });

        match parse_rpc_error(&error) {
            EndpointError::Rejected { reason, identifier } => {
                assert_eq!(reason, "checkpoint expired");
                assert_eq!(identifier, Some(id));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn rejection_without_identifier_degrades_to_none() {
        let error = json!({
            "code": -32003,
            "message": "insufficient fee balance",
        });

        match parse_rpc_error(&error) {
            EndpointError::Rejected { reason, identifier } => {
                assert_eq!(reason, "insufficient fee balance");
                assert_eq!(identifier, None);
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn rejection_with_garbage_identifier_degrades_to_none() {
        let error = json!({
            "code": -32002,
            "message": "rejected",
            "data": { "identifier": "certainly-not-base58!" },
        });

        match parse_rpc_error(&error) {
            EndpointError::Rejected { identifier, .. } => assert_eq!(identifier, None),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn empty_message_gets_a_placeholder_reason() {
        let error = json!({ "code": -32000 });
        match parse_rpc_error(&error) {
            EndpointError::Rejected { reason, .. } => {
                assert_eq!(reason, "unspecified rejection");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }
}
