//! The submitter: one signed unit in, one classified outcome out.
//!
//! The identifier is computed from the unit before any network traffic, so
//! every outcome — including the ones where the network went dark — carries
//! enough to look the unit up later.

use crate::rpc::endpoint::{Endpoint, EndpointError};
use crate::unit::{SignedUnit, UnitId};

/// The fate of one submission attempt.
///
/// Exactly one of three: the node acknowledged the unit (`Accepted`), the
/// node or ledger refused it (`Rejected`), or the answer never arrived
/// (`Indeterminate`). `Rejected` is terminal for this unit; recovery means
/// rebuilding against a fresh checkpoint, not resending the same bytes —
/// checkpoint expiry guarantees stale bytes fail closed. `Indeterminate`
/// means "maybe landed": reconcile via [`Endpoint::unit_status`] before
/// doing anything else, because blind resubmission of a *rebuilt* unit can
/// double-spend if the first one landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The node acknowledged the unit under this identifier.
    Accepted(UnitId),
    /// The node or ledger refused the unit. The identifier is present only
    /// when the rejection path reported one; recovery is best-effort.
    Rejected {
        reason: String,
        identifier: Option<UnitId>,
    },
    /// The unit was (possibly) sent but its fate is unknown.
    Indeterminate(UnitId),
}

impl SubmissionOutcome {
    /// The identifier this outcome knows about, if any.
    pub fn identifier(&self) -> Option<&UnitId> {
        match self {
            SubmissionOutcome::Accepted(id) => Some(id),
            SubmissionOutcome::Rejected { identifier, .. } => identifier.as_ref(),
            SubmissionOutcome::Indeterminate(id) => Some(id),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted(_))
    }
}

/// Serializes `unit` and submits it through `endpoint`.
///
/// Outcome classification:
///
/// - acknowledgement matching the locally computed identifier → `Accepted`;
/// - acknowledgement with a *different* identifier → `Indeterminate` (the
///   node is misbehaving; the unit may still have landed under our id);
/// - structured rejection → `Rejected`, with whatever identifier the error
///   payload yielded;
/// - transport failure before the request went out → `Rejected` (the ledger
///   never saw the unit);
/// - timeout or an unreadable response → `Indeterminate`.
pub async fn submit(unit: &SignedUnit, endpoint: &(impl Endpoint + ?Sized)) -> SubmissionOutcome {
    // Content-derived, network-independent; compute before anything can fail.
    let local_id = unit.id();
    let unit_bytes = unit.to_bytes();

    tracing::debug!(identifier = %local_id, bytes = unit_bytes.len(), "submitting unit");

    match endpoint.submit_unit(&unit_bytes).await {
        Ok(acknowledged) if acknowledged == local_id => {
            tracing::info!(identifier = %local_id, "unit accepted");
            SubmissionOutcome::Accepted(local_id)
        }
        Ok(acknowledged) => {
            tracing::warn!(
                expected = %local_id,
                acknowledged = %acknowledged,
                "endpoint acknowledged a mismatched identifier"
            );
            SubmissionOutcome::Indeterminate(local_id)
        }
        Err(EndpointError::Rejected { reason, identifier }) => {
            tracing::warn!(identifier = ?identifier, %reason, "unit rejected");
            SubmissionOutcome::Rejected { reason, identifier }
        }
        Err(EndpointError::Transport(reason)) => {
            tracing::warn!(%reason, "unit never sent");
            SubmissionOutcome::Rejected {
                reason,
                identifier: None,
            }
        }
        Err(EndpointError::Timeout) => {
            tracing::warn!(identifier = %local_id, "submission timed out, outcome unknown");
            SubmissionOutcome::Indeterminate(local_id)
        }
        Err(EndpointError::MalformedResponse(detail)) => {
            tracing::warn!(identifier = %local_id, %detail, "unreadable response, outcome unknown");
            SubmissionOutcome::Indeterminate(local_id)
        }
    }
}
