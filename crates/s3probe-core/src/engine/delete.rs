//! ANON-DEL and AUTH-DEL checks.
//!
//! Both checks first create their own test object as the caller; without it
//! a delete cannot be exercised, so a failed creation is an immediate
//! denial.

use crate::api::{Identity, S3Api};
use crate::public_access::{PublicAccessGate, check_public_access};
use crate::scope::ProbeScope;
use crate::types::{CheckKind, CheckOutcome};

use super::ProbeEngine;

impl<A: S3Api + ?Sized> ProbeEngine<A> {
    /// ANON-DEL: create a test object as the caller and delete it without
    /// credentials.
    ///
    /// When the anonymous delete fails the object is removed with the
    /// caller's credentials before reporting the denial.
    pub async fn check_anon_del(&self, bucket: &str, scope: &ProbeScope) -> CheckOutcome {
        let kind = CheckKind::AnonDel;
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
                    .put_object(Identity::Authenticated, bucket, &key, Self::test_body()),
            )
            .await
        {
            return probe.denied("create-test-object", &err);
        }

        match scope
            .guard(self.api.delete_object(Identity::Anonymous, bucket, &key))
            .await
        {
            Ok(()) => probe.allowed(),
            Err(err) => {
                self.cleanup(&probe, Identity::Authenticated, &key).await;
                probe.denied("delete-object", &err)
            }
        }
    }

    /// AUTH-DEL: create a test object and delete it with the caller's
    /// credentials.
    pub async fn check_auth_del(&self, bucket: &str, scope: &ProbeScope) -> CheckOutcome {
        let kind = CheckKind::AuthDel;
        let probe = self.probe(kind, bucket);

        let key = self.test_key(kind);
        if let Err(err) = scope
            .guard(
                self.api
                    .put_object(Identity::Authenticated, bucket, &key, Self::test_body()),
            )
            .await
        {
            return probe.denied("create-test-object", &err);
        }

        match scope
            .guard(self.api.delete_object(Identity::Authenticated, bucket, &key))
            .await
        {
            Ok(()) => probe.allowed(),
            Err(err) => probe.denied("delete-object", &err),
        }
    }
}
