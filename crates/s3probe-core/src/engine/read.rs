//! ANON-GET and AUTH-GET checks.
//!
//! Both checks head an object that does not exist. A not-found answer means
//! the request got past access control, so it counts as allowed; only an
//! explicit authorization failure (or, for the authenticated check, any
//! other error) counts as denied.

use tracing::debug;

use crate::api::{ApiError, Identity, S3Api};
use crate::policy::grants_public_read;
use crate::public_access::{PublicAccessGate, check_public_access};
use crate::scope::ProbeScope;
use crate::types::{CheckKind, CheckOutcome};

use super::{Probe, ProbeEngine};

impl<A: S3Api + ?Sized> ProbeEngine<A> {
    /// ANON-GET: read a missing object without credentials.
    ///
    /// Short-circuits to denied when the public-access-block is enabled.
    /// Errors that are neither not-found nor access-denied fall back to the
    /// bucket-policy heuristic.
    pub async fn check_anon_get(&self, bucket: &str, scope: &ProbeScope) -> CheckOutcome {
        let kind = CheckKind::AnonGet;
        let probe = self.probe(kind, bucket);

        if let PublicAccessGate::Blocked(state) =
            check_public_access(self.api.as_ref(), scope, kind, bucket).await
        {
            return probe.blocked(state);
        }

        let key = self.test_key(kind);
        match scope
            .guard(self.api.head_object(Identity::Anonymous, bucket, &key))
            .await
        {
            Ok(()) | Err(ApiError::NotFound(_)) => probe.allowed(),
            Err(err @ ApiError::AuthorizationDenied(_)) => probe.denied("head-object", &err),
            Err(err) => {
                debug!(bucket, check = %kind, error = %err, "anonymous read inconclusive, checking bucket policy");
                self.policy_fallback(&probe, scope, &err).await
            }
        }
    }

    /// AUTH-GET: read a missing object with the caller's credentials.
    pub async fn check_auth_get(&self, bucket: &str, scope: &ProbeScope) -> CheckOutcome {
        let kind = CheckKind::AuthGet;
        let probe = self.probe(kind, bucket);

        let key = self.test_key(kind);
        match scope
            .guard(self.api.head_object(Identity::Authenticated, bucket, &key))
            .await
        {
            Ok(()) | Err(ApiError::NotFound(_)) => probe.allowed(),
            Err(err) => probe.denied("head-object", &err),
        }
    }

    async fn policy_fallback(
        &self,
        probe: &Probe<'_>,
        scope: &ProbeScope,
        head_err: &ApiError,
    ) -> CheckOutcome {
        match scope
            .guard(
                self.api
                    .get_bucket_policy(Identity::Authenticated, probe.bucket),
            )
            .await
        {
            Ok(policy) if grants_public_read(&policy) => probe.allowed(),
            Ok(_) => probe.denied(
                "bucket-policy",
                format_args!("{head_err}; policy does not grant public read"),
            ),
            Err(err) => probe.denied(
                "bucket-policy",
                format_args!("{head_err}; policy unavailable: {err}"),
            ),
        }
    }
}
