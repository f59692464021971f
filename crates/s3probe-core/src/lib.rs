//! Bucket permission probing for s3probe.
//!
//! This crate holds the decision logic of the tool: the eight permission
//! checks run against a single bucket, the classification of API responses
//! into verdicts, and the driver that walks a list of buckets.
//!
//! # Architecture
//!
//! ```text
//! bucket source (CLI args / file / stdin / discovery)
//!        |
//!        v
//! BucketDriver (sequential over buckets, fixed delay)
//!        |
//!        v
//! ProbeEngine (eight checks, one task each)
//!        |
//!        v
//!   S3Api (authenticated + anonymous identities)
//! ```
//!
//! The object-storage client is abstracted behind [`S3Api`] so the engine can
//! be driven by the AWS SDK adapter in production and by an in-memory fake in
//! tests.

pub mod api;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod keys;
pub mod policy;
pub mod public_access;
pub mod scope;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiError, ApiResult, Identity, S3Api};
pub use config::ProbeConfig;
pub use driver::{BucketDriver, ResultSink};
pub use engine::ProbeEngine;
pub use error::{ProbeError, ProbeResult};
pub use scope::{ProbeScope, ScopeHandle};
pub use types::{
    AclGrant, AclGrantee, AclOwner, BucketAcl, BucketName, BucketResult, CheckKind, CheckOutcome,
    PublicAccessBlockState, Verdict,
};
