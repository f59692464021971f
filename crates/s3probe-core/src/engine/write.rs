//! ANON-WRITE and AUTH-WRITE checks.

use crate::api::{Identity, S3Api};
use crate::public_access::{PublicAccessGate, check_public_access};
use crate::scope::ProbeScope;
use crate::types::{CheckKind, CheckOutcome};

use super::ProbeEngine;

impl<A: S3Api + ?Sized> ProbeEngine<A> {
    /// ANON-WRITE: upload a test object without credentials.
    ///
    /// On success the object is deleted anonymously; if that fails the
    /// caller's credentials are used as a second attempt. Neither cleanup
    /// affects the verdict.
    pub async fn check_anon_write(&self, bucket: &str, scope: &ProbeScope) -> CheckOutcome {
        let kind = CheckKind::AnonWrite;
        let probe = self.probe(kind, bucket);

        if let PublicAccessGate::Blocked(state) =
            check_public_access(self.api.as_ref(), scope, kind, bucket).await
        {
            return probe.blocked(state);
        }

        let key = self.test_key(kind);
        if let Err(err) = scope
            .guard(
                self.api
                    .put_object(Identity::Anonymous, bucket, &key, Self::test_body()),
            )
            .await
        {
            return probe.denied("put-object", &err);
        }

        if !self.cleanup(&probe, Identity::Anonymous, &key).await {
            self.cleanup(&probe, Identity::Authenticated, &key).await;
        }
        probe.allowed()
    }

    /// AUTH-WRITE: upload a test object with the caller's credentials, then
    /// remove it.
    pub async fn check_auth_write(&self, bucket: &str, scope: &ProbeScope) -> CheckOutcome {
        let kind = CheckKind::AuthWrite;
        let probe = self.probe(kind, bucket);

        let key = self.test_key(kind);
        if let Err(err) = scope
            .guard(
                self.api
                    .put_object(Identity::Authenticated, bucket, &key, Self::test_body()),
            )
            .await
        {
            return probe.denied("put-object", &err);
        }

        self.cleanup(&probe, Identity::Authenticated, &key).await;
        probe.allowed()
    }
}
