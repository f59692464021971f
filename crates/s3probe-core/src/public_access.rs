//! Public-access-block pre-check for the anonymous probes.
//!
//! The three anonymous checks first look at the bucket's public-access-block
//! flags. If any flag is set the check ends as denied without issuing the
//! anonymous request. The pre-check can only ever shorten a check to a
//! denial; it never produces an allowed verdict on its own.

use tracing::debug;

use crate::api::{ApiError, Identity, S3Api};
use crate::scope::ProbeScope;
use crate::types::{CheckKind, PublicAccessBlockState};

/// Result of the public-access-block lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicAccessGate {
    /// At least one flag is set; anonymous access cannot succeed.
    Blocked(PublicAccessBlockState),
    /// The flags are all clear.
    Open,
    /// The bucket has no public-access-block configuration.
    Unconfigured,
    /// The lookup failed; the live request will decide.
    Unknown(ApiError),
}

impl PublicAccessGate {
    /// Whether the anonymous probe should be skipped.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

/// Fetch the public-access-block flags of `bucket` as the caller.
///
/// The state is fetched fresh on every call and never cached.
pub async fn check_public_access<A: S3Api + ?Sized>(
    api: &A,
    scope: &ProbeScope,
    kind: CheckKind,
    bucket: &str,
) -> PublicAccessGate {
    match scope
        .guard(api.get_public_access_block(Identity::Authenticated, bucket))
        .await
    {
        Ok(state) if state.any_enabled() => {
            debug!(bucket, check = %kind, ?state, "public access block enabled");
            PublicAccessGate::Blocked(state)
        }
        Ok(_) => PublicAccessGate::Open,
        Err(ApiError::NotFound(_)) => PublicAccessGate::Unconfigured,
        Err(err) => {
            debug!(bucket, check = %kind, error = %err, "public access block lookup failed");
            PublicAccessGate::Unknown(err)
        }
    }
}
