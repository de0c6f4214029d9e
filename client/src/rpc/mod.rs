//! # RPC
//!
//! The network edge of the client.
//!
//! ```text
//! endpoint.rs — The Endpoint trait (the six queries the pipeline needs)
//! http.rs     — HttpEndpoint: JSON-RPC 2.0 over reqwest
//! submit.rs   — The Submitter: send a unit, classify the outcome
//! ```
//!
//! Everything upstream of this module is pure and synchronous; suspension
//! happens only here. The endpoint handle is passed in rather than held as
//! ambient global state, so tests substitute an in-memory fake and the same
//! handle serves any number of concurrent independent submissions (with no
//! ordering guarantee between them).

pub mod endpoint;
pub mod http;
pub mod submit;

pub use endpoint::{AccountSnapshot, Endpoint, EndpointError, UnitStatus};
pub use http::HttpEndpoint;
pub use submit::{submit, SubmissionOutcome};
