//! End-to-end integration tests for the VELA client pipeline.
//!
//! These tests exercise the full submission lifecycle: keypair generation,
//! address derivation, operation encoding, message compilation, unit
//! assembly, submission against a scripted in-memory endpoint, and failure
//! diagnosis by identifier.
//!
//! Each test stands alone with its own endpoint and keys. No shared state,
//! no test ordering dependencies, no flaky failures.

use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;

use vela_client::address::{derive, Address};
use vela_client::cache::AddressCache;
use vela_client::config::MAX_UNIT_SIZE_BYTES;
use vela_client::crypto::{VelaKeypair, VelaSignature};
use vela_client::explorer::Explorer;
use vela_client::message::{compile, AccountRef, CheckpointRef, Operation};
use vela_client::ops;
use vela_client::rpc::{
    submit, AccountSnapshot, Endpoint, EndpointError, SubmissionOutcome, UnitStatus,
};
use vela_client::unit::{assemble, verify_unit, AssembleError, SignedUnit, UnitId};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// What the fake node should do with the next submission.
enum SubmitBehavior {
    /// Acknowledge honestly with the identifier parsed from the unit bytes.
    Accept,
    /// Refuse with a structured error, optionally reporting the identifier.
    Reject { reason: String, report_id: bool },
    /// Answer nothing in time.
    Timeout,
}

/// An in-memory ledger endpoint with scripted submission behavior.
struct FakeLedger {
    checkpoint: CheckpointRef,
    behavior: Mutex<SubmitBehavior>,
    submitted: Mutex<Vec<Vec<u8>>>,
    confirmed: Mutex<Vec<UnitId>>,
}

impl FakeLedger {
    fn new() -> Self {
        Self {
            checkpoint: CheckpointRef::from_array([42u8; 32]),
            behavior: Mutex::new(SubmitBehavior::Accept),
            submitted: Mutex::new(Vec::new()),
            confirmed: Mutex::new(Vec::new()),
        }
    }

    fn with_behavior(behavior: SubmitBehavior) -> Self {
        let ledger = Self::new();
        *ledger.behavior.lock().unwrap() = behavior;
        ledger
    }

    /// The identifier a unit's serialized bytes carry in their first slot.
    fn id_from_bytes(unit_bytes: &[u8]) -> UnitId {
        // One-byte signature count, then the 64-byte fee payer signature.
        let sig: [u8; 64] = unit_bytes[1..65].try_into().expect("unit too short");
        UnitId::from_signature(&VelaSignature::from_bytes(sig)).expect("well-formed signature")
    }
}

#[async_trait]
impl Endpoint for FakeLedger {
    async fn latest_checkpoint(&self) -> Result<CheckpointRef, EndpointError> {
        Ok(self.checkpoint)
    }

    async fn minimum_balance_for_size(&self, data_len: u64) -> Result<u64, EndpointError> {
        Ok(1_000 + data_len * 10)
    }

    async fn account_info(
        &self,
        _address: &Address,
    ) -> Result<Option<AccountSnapshot>, EndpointError> {
        Ok(None)
    }

    async fn balance(&self, _address: &Address) -> Result<u64, EndpointError> {
        Ok(1_000_000)
    }

    async fn submit_unit(&self, unit_bytes: &[u8]) -> Result<UnitId, EndpointError> {
        self.submitted.lock().unwrap().push(unit_bytes.to_vec());
        let id = Self::id_from_bytes(unit_bytes);
        match &*self.behavior.lock().unwrap() {
            SubmitBehavior::Accept => {
                self.confirmed.lock().unwrap().push(id);
                Ok(id)
            }
            SubmitBehavior::Reject { reason, report_id } => Err(EndpointError::Rejected {
                reason: reason.clone(),
                identifier: report_id.then_some(id),
            }),
            SubmitBehavior::Timeout => {
                // The unit "arrived" but the answer got lost.
                self.confirmed.lock().unwrap().push(id);
                Err(EndpointError::Timeout)
            }
        }
    }

    async fn unit_status(&self, id: &UnitId) -> Result<UnitStatus, EndpointError> {
        if self.confirmed.lock().unwrap().contains(id) {
            Ok(UnitStatus::Confirmed)
        } else {
            Ok(UnitStatus::Unknown)
        }
    }
}

/// Compiles and signs a single-transfer unit paid for and sent by `payer`.
fn simple_transfer_unit(payer: &VelaKeypair, checkpoint: CheckpointRef) -> SignedUnit {
    let op = ops::transfer_units(payer.address(), Address::new_unique(), 500);
    let message = compile(payer.address(), checkpoint, &[op]).unwrap();
    assemble(message, &[payer]).unwrap()
}

// ---------------------------------------------------------------------------
// 1. Table layout scenarios
// ---------------------------------------------------------------------------

#[test]
fn two_transfers_from_fee_payer_compile_and_sign_with_one_key() {
    let payer = VelaKeypair::generate();
    let recipient_a = Address::new_unique();
    let recipient_b = Address::new_unique();
    let fresh = Address::new_unique();

    // Two transfers from the same writable signer (the fee payer) to two
    // distinct recipients, plus one write-only account touched fresh.
    let operations = vec![
        ops::transfer_units(payer.address(), recipient_a, 100),
        ops::transfer_units(payer.address(), recipient_b, 200),
        Operation::new(
            ops::SYSTEM_PROGRAM,
            vec![AccountRef::writable(fresh, false)],
            vec![],
        ),
    ];

    let checkpoint = CheckpointRef::from_array([9u8; 32]);
    let message = compile(payer.address(), checkpoint, &operations).unwrap();

    // The sender is merged into the hoisted fee payer entry; recipients
    // follow in first-seen order.
    assert_eq!(*message.fee_payer(), payer.address());
    assert_eq!(message.header.required_signers, 1);
    assert_eq!(
        message.account_table,
        vec![
            payer.address(),
            recipient_a,
            recipient_b,
            fresh,
            ops::SYSTEM_PROGRAM,
        ]
    );

    // The fee payer's key alone is sufficient.
    let unit = assemble(message, &[&payer]).unwrap();
    assert!(verify_unit(&unit).is_ok());
    assert!(unit.to_bytes().len() <= MAX_UNIT_SIZE_BYTES);
}

#[test]
fn distinct_sender_lands_second_and_both_keys_are_required() {
    let payer = VelaKeypair::generate();
    let sender = VelaKeypair::generate();
    let recipient_a = Address::new_unique();
    let recipient_b = Address::new_unique();

    let operations = vec![
        ops::transfer_units(sender.address(), recipient_a, 100),
        ops::transfer_units(sender.address(), recipient_b, 200),
    ];

    let checkpoint = CheckpointRef::from_array([9u8; 32]);
    let message = compile(payer.address(), checkpoint, &operations).unwrap();

    // Fee payer first, the (merged) sending signer second, recipients in
    // first-seen order afterward.
    assert_eq!(
        message.account_table,
        vec![
            payer.address(),
            sender.address(),
            recipient_a,
            recipient_b,
            ops::SYSTEM_PROGRAM,
        ]
    );
    assert_eq!(message.header.required_signers, 2);

    // Withholding the sender's key is a loud failure, not a bad unit.
    assert_eq!(
        assemble(message.clone(), &[&payer]),
        Err(AssembleError::MissingSigner(sender.address()))
    );

    let unit = assemble(message, &[&payer, &sender]).unwrap();
    assert!(verify_unit(&unit).is_ok());
}

// ---------------------------------------------------------------------------
// 2. Derivation determinism
// ---------------------------------------------------------------------------

#[test]
fn derivation_is_reproducible_across_independent_runs() {
    let owner = ops::RECORD_PROGRAM;
    let authority = Address::new_unique();

    // Two "script runs" deriving the same record address from scratch.
    let first = derive(&[b"record", authority.as_bytes()], &owner).unwrap();
    let second = derive(&[b"record", authority.as_bytes()], &owner).unwrap();

    assert_eq!(first.0.as_bytes(), second.0.as_bytes());
    assert_eq!(first.1, second.1);
}

#[test]
fn derived_address_survives_the_cache_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let owner = ops::RECORD_PROGRAM;
    let (address, _) = derive(&[b"settlement", b"vault"], &owner).unwrap();

    // Run one: derive and persist.
    {
        let cache = AddressCache::open(dir.path()).unwrap();
        cache.save("vault", &address).unwrap();
    }

    // Run two: load, and confirm re-derivation agrees with the cache.
    let cache = AddressCache::open(dir.path()).unwrap();
    let cached = cache.get("vault").unwrap().unwrap();
    let (re_derived, _) = derive(&[b"settlement", b"vault"], &owner).unwrap();
    assert_eq!(cached, address);
    assert_eq!(re_derived, cached);
}

// ---------------------------------------------------------------------------
// 3. Submission outcomes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn accepted_outcome_carries_the_precomputed_identifier() {
    let ledger = FakeLedger::new();
    let payer = VelaKeypair::generate();
    let checkpoint = ledger.latest_checkpoint().await.unwrap();

    let unit = simple_transfer_unit(&payer, checkpoint);
    let local_id = unit.id();

    let outcome = submit(&unit, &ledger).await;
    assert_eq!(outcome, SubmissionOutcome::Accepted(local_id));

    // The bytes on the wire are exactly the unit's serialization.
    assert_eq!(
        ledger.submitted.lock().unwrap().as_slice(),
        &[unit.to_bytes()]
    );
}

#[tokio::test]
async fn rejection_recovers_the_identifier_when_the_node_reports_it() {
    let ledger = FakeLedger::with_behavior(SubmitBehavior::Reject {
        reason: "checkpoint expired".into(),
        report_id: true,
    });
    let payer = VelaKeypair::generate();
    let unit = simple_transfer_unit(&payer, CheckpointRef::from_array([0u8; 32]));

    let outcome = submit(&unit, &ledger).await;
    assert_eq!(
        outcome,
        SubmissionOutcome::Rejected {
            reason: "checkpoint expired".into(),
            identifier: Some(unit.id()),
        }
    );
    // Recovered or computed, it names the same unit either way.
    assert_eq!(outcome.identifier(), Some(&unit.id()));
}

#[tokio::test]
async fn rejection_without_reported_identifier_yields_none() {
    let ledger = FakeLedger::with_behavior(SubmitBehavior::Reject {
        reason: "insufficient balance".into(),
        report_id: false,
    });
    let payer = VelaKeypair::generate();
    let unit = simple_transfer_unit(&payer, CheckpointRef::from_array([0u8; 32]));

    let outcome = submit(&unit, &ledger).await;
    assert_eq!(
        outcome,
        SubmissionOutcome::Rejected {
            reason: "insufficient balance".into(),
            identifier: None,
        }
    );
}

#[tokio::test]
async fn indeterminate_outcome_reconciles_by_identifier() {
    let ledger = FakeLedger::with_behavior(SubmitBehavior::Timeout);
    let payer = VelaKeypair::generate();
    let checkpoint = ledger.latest_checkpoint().await.unwrap();
    let unit = simple_transfer_unit(&payer, checkpoint);

    let outcome = submit(&unit, &ledger).await;
    let id = match outcome {
        SubmissionOutcome::Indeterminate(id) => id,
        other => panic!("expected Indeterminate, got {other:?}"),
    };
    assert_eq!(id, unit.id());

    // The unit actually landed; polling the identifier proves it without
    // resubmitting anything.
    assert_eq!(ledger.unit_status(&id).await.unwrap(), UnitStatus::Confirmed);
}

// ---------------------------------------------------------------------------
// 4. Full lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_mint_lifecycle_compiles_signs_and_submits() {
    let ledger = FakeLedger::new();
    let funder = VelaKeypair::generate();
    let mint = VelaKeypair::generate();
    let recipient = Address::new_unique();

    let checkpoint = ledger.latest_checkpoint().await.unwrap();
    let data_len = 128u64;
    let min_balance = ledger.minimum_balance_for_size(data_len).await.unwrap();

    // Derive the metadata record controlled by the metadata program.
    let (metadata, bump) = derive(
        &[b"metadata", mint.address().as_bytes()],
        &ops::METADATA_PROGRAM,
    )
    .unwrap();

    let operations = vec![
        ops::create_storage_account(
            funder.address(),
            mint.address(),
            ops::TOKEN_PROGRAM,
            min_balance,
            data_len,
        ),
        ops::initialize_ledger_record(funder.address(), metadata, mint.address(), bump, data_len),
        ops::create_metadata_record(
            funder.address(),
            metadata,
            mint.address(),
            funder.address(),
            b"vela settlement unit".to_vec(),
        ),
        ops::mint_units(mint.address(), recipient, funder.address(), 1_000),
        ops::transfer_units(funder.address(), recipient, 10),
    ];

    let message = compile(funder.address(), checkpoint, &operations).unwrap();

    // The mint signs its own creation; the derived metadata record cannot.
    let signers: Vec<Address> = message.required_signers().to_vec();
    assert!(signers.contains(&funder.address()));
    assert!(signers.contains(&mint.address()));
    assert!(!signers.contains(&metadata));

    let unit = assemble(message, &[&funder, &mint]).unwrap();
    assert!(unit.to_bytes().len() <= MAX_UNIT_SIZE_BYTES);

    let outcome = submit(&unit, &ledger).await;
    assert!(outcome.is_accepted());

    // Everything a follow-up script needs: the cached mint address and a
    // link a human can open.
    let cache = AddressCache::open_temporary().unwrap();
    cache.save("mint", &mint.address()).unwrap();
    assert_eq!(cache.load().unwrap()["mint"], mint.address());

    let explorer = Explorer::default();
    let url = explorer.unit_url(&unit.id());
    assert!(url.contains(&unit.id().to_string()));
}

#[test]
fn identifier_string_form_roundtrips_for_reconciliation() {
    // A caller that logged the identifier must be able to parse it back in
    // a later process to poll its status.
    let payer = VelaKeypair::generate();
    let unit = simple_transfer_unit(&payer, CheckpointRef::from_array([3u8; 32]));
    let logged = unit.id().to_string();
    assert_eq!(UnitId::from_str(&logged).unwrap(), unit.id());
}
