//! The probe engine: eight permission checks against one bucket.
//!
//! Each check is an independent async operation that returns a
//! [`CheckOutcome`]. Checks never fail: every error they encounter is folded
//! into a [`Verdict::Denied`](crate::Verdict::Denied). Inside a check the
//! requests are issued strictly in sequence; across checks nothing is shared
//! except the read-only client, so the driver can run all eight at once.
//!
//! | Check | Identity | Operation |
//! |-------|----------|-----------|
//! | GET-ACL | caller | get bucket ACL |
//! | PUT-ACL | caller | get bucket ACL, put it back unchanged |
//! | ANON-GET | none | head a missing object (policy fallback) |
//! | AUTH-GET | caller | head a missing object |
//! | ANON-WRITE | none | put a test object |
//! | AUTH-WRITE | caller | put a test object |
//! | ANON-DEL | caller + none | create as caller, delete anonymously |
//! | AUTH-DEL | caller | create and delete a test object |

mod acl;
mod delete;
mod read;
mod write;

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::api::{Identity, S3Api};
use crate::config::ProbeConfig;
use crate::keys::ephemeral_key;
use crate::scope::ProbeScope;
use crate::types::{CheckKind, CheckOutcome, PublicAccessBlockState};

/// Body of every temporary test object.
const TEST_OBJECT_BODY: &[u8] = b"test";

/// Runs the permission checks for a bucket.
pub struct ProbeEngine<A: ?Sized> {
    api: Arc<A>,
    key_prefix: String,
    verbose: bool,
}

impl<A: ?Sized> fmt::Debug for ProbeEngine<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeEngine")
            .field("key_prefix", &self.key_prefix)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl<A: S3Api + ?Sized> ProbeEngine<A> {
    /// Create an engine over `api`.
    #[must_use]
    pub fn new(api: Arc<A>, config: &ProbeConfig) -> Self {
        Self {
            api,
            key_prefix: config.key_prefix.clone(),
            verbose: config.verbose,
        }
    }

    /// The underlying client.
    #[must_use]
    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Run a single check by kind.
    pub async fn run_check(&self, kind: CheckKind, bucket: &str, scope: &ProbeScope) -> CheckOutcome {
        match kind {
            CheckKind::GetAcl => self.check_get_acl(bucket, scope).await,
            CheckKind::PutAcl => self.check_put_acl(bucket, scope).await,
            CheckKind::AnonGet => self.check_anon_get(bucket, scope).await,
            CheckKind::AuthGet => self.check_auth_get(bucket, scope).await,
            CheckKind::AnonWrite => self.check_anon_write(bucket, scope).await,
            CheckKind::AuthWrite => self.check_auth_write(bucket, scope).await,
            CheckKind::AnonDel => self.check_anon_del(bucket, scope).await,
            CheckKind::AuthDel => self.check_auth_del(bucket, scope).await,
        }
    }

    fn probe<'a>(&self, kind: CheckKind, bucket: &'a str) -> Probe<'a> {
        debug!(bucket, check = %kind, "running check");
        Probe {
            kind,
            bucket,
            verbose: self.verbose,
        }
    }

    fn test_key(&self, kind: CheckKind) -> String {
        ephemeral_key(&self.key_prefix, kind)
    }

    fn test_body() -> Bytes {
        Bytes::from_static(TEST_OBJECT_BODY)
    }

    /// Best-effort removal of a test object. Failures are logged and ignored.
    ///
    /// Not guarded by the probe scope so a cancelled check still cleans up.
    async fn cleanup(&self, probe: &Probe<'_>, identity: Identity, key: &str) -> bool {
        match self.api.delete_object(identity, probe.bucket, key).await {
            Ok(()) => true,
            Err(err) => {
                debug!(
                    bucket = probe.bucket,
                    check = %probe.kind,
                    identity = identity.as_str(),
                    key,
                    error = %err,
                    "test object cleanup failed"
                );
                false
            }
        }
    }
}

/// Per-invocation bookkeeping: turns step results into outcomes and logs them.
#[derive(Debug)]
struct Probe<'a> {
    kind: CheckKind,
    bucket: &'a str,
    verbose: bool,
}

impl Probe<'_> {
    fn allowed(&self) -> CheckOutcome {
        debug!(bucket = self.bucket, check = %self.kind, "allowed");
        CheckOutcome::allowed()
    }

    fn denied(&self, step: &str, reason: impl fmt::Display) -> CheckOutcome {
        debug!(bucket = self.bucket, check = %self.kind, step, %reason, "denied");
        CheckOutcome::denied(self.verbose.then(|| format!("{step}: {reason}")))
    }

    fn blocked(&self, state: PublicAccessBlockState) -> CheckOutcome {
        self.denied(
            "public-access-block",
            format_args!(
                "blocked (BlockPublicAcls={}, BlockPublicPolicy={}, IgnorePublicAcls={}, RestrictPublicBuckets={})",
                state.block_public_acls,
                state.block_public_policy,
                state.ignore_public_acls,
                state.restrict_public_buckets,
            ),
        )
    }
}
