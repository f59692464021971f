//! Error types for the s3probe driver.
//!
//! Individual checks never fail: every problem they hit is folded into a
//! [`Verdict::Denied`](crate::Verdict::Denied). [`ProbeError`] only covers the
//! conditions that stop a run from starting at all.

use crate::api::ApiError;

/// Driver-level error.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Listing the caller's buckets failed.
    #[error("failed to list buckets: {0}")]
    Discovery(#[source] ApiError),

    /// The object-storage client could not be created.
    #[error("failed to set up client: {0}")]
    ClientSetup(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for driver operations.
pub type ProbeResult<T> = Result<T, ProbeError>;
