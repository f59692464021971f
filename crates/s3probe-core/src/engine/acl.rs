//! GET-ACL and PUT-ACL checks.

use crate::api::{Identity, S3Api};
use crate::scope::ProbeScope;
use crate::types::{CheckKind, CheckOutcome};

use super::ProbeEngine;

impl<A: S3Api + ?Sized> ProbeEngine<A> {
    /// GET-ACL: fetch the bucket ACL as the caller.
    pub async fn check_get_acl(&self, bucket: &str, scope: &ProbeScope) -> CheckOutcome {
        let probe = self.probe(CheckKind::GetAcl, bucket);

        match scope
            .guard(self.api.get_bucket_acl(Identity::Authenticated, bucket))
            .await
        {
            Ok(_) => probe.allowed(),
            Err(err) => probe.denied("get-bucket-acl", &err),
        }
    }

    /// PUT-ACL: fetch the bucket ACL and write it back unmodified.
    ///
    /// Writing the ACL the bucket already has proves the permission without
    /// changing any grant.
    pub async fn check_put_acl(&self, bucket: &str, scope: &ProbeScope) -> CheckOutcome {
        let probe = self.probe(CheckKind::PutAcl, bucket);

        let acl = match scope
            .guard(self.api.get_bucket_acl(Identity::Authenticated, bucket))
            .await
        {
            Ok(acl) => acl,
            Err(err) => return probe.denied("get-bucket-acl", &err),
        };

        match scope
            .guard(self.api.put_bucket_acl(Identity::Authenticated, bucket, &acl))
            .await
        {
            Ok(()) => probe.allowed(),
            Err(err) => probe.denied("put-bucket-acl", &err),
        }
    }
}
