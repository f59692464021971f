//! In-memory [`S3Api`] used by the unit tests.
//!
//! Each fake bucket carries separate grants for the authenticated and the
//! anonymous identity, an optional public-access-block configuration, an
//! optional policy, and the set of objects currently stored. Every call is
//! recorded so tests can assert which requests a check issued.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::api::{ApiError, ApiResult, Identity, S3Api};
use crate::types::{AclGrant, AclGrantee, AclOwner, BucketAcl, PublicAccessBlockState};

/// Operation recorded by the fake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    GetBucketAcl,
    PutBucketAcl,
    HeadObject,
    PutObject,
    DeleteObject,
    GetPublicAccessBlock,
    GetBucketPolicy,
    ListBuckets,
}

/// A recorded call.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub op: Op,
    pub identity: Identity,
    pub bucket: String,
}

/// What an identity may do on a fake bucket.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Grants {
    pub read_acl: bool,
    pub write_acl: bool,
    pub read_config: bool,
    pub read: bool,
    pub write: bool,
    pub delete: bool,
}

impl Grants {
    pub fn all() -> Self {
        Self {
            read_acl: true,
            write_acl: true,
            read_config: true,
            read: true,
            write: true,
            delete: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// State of one fake bucket.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeBucket {
    pub auth: Grants,
    pub anon: Grants,
    pub public_access_block: Option<PublicAccessBlockState>,
    pub policy: Option<String>,
    pub acl: BucketAcl,
    pub unreachable: bool,
    pub anon_head_error: Option<ApiError>,
    pub latency: Duration,
    pub objects: HashSet<String>,
}

impl FakeBucket {
    /// Owned by the caller, no public access, no public-access-block.
    pub fn open() -> Self {
        Self {
            auth: Grants::all(),
            anon: Grants::none(),
            acl: owner_acl(),
            ..Self::default()
        }
    }

    /// Nothing allowed for anyone, every public-access-block flag set.
    pub fn locked() -> Self {
        Self {
            auth: Grants::none(),
            anon: Grants::none(),
            public_access_block: Some(PublicAccessBlockState {
                block_public_acls: true,
                block_public_policy: true,
                ignore_public_acls: true,
                restrict_public_buckets: true,
            }),
            acl: owner_acl(),
            ..Self::default()
        }
    }

    /// Everything allowed for both identities.
    pub fn public() -> Self {
        Self {
            auth: Grants::all(),
            anon: Grants::all(),
            acl: owner_acl(),
            ..Self::default()
        }
    }

    /// Every call fails with a transport error.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn with_auth(mut self, grants: Grants) -> Self {
        self.auth = grants;
        self
    }

    pub fn with_anon(mut self, grants: Grants) -> Self {
        self.anon = grants;
        self
    }

    pub fn with_public_access_block(mut self, state: PublicAccessBlockState) -> Self {
        self.public_access_block = Some(state);
        self
    }

    pub fn with_policy(mut self, policy: &str) -> Self {
        self.policy = Some(policy.to_owned());
        self
    }

    pub fn with_anon_head_error(mut self, err: ApiError) -> Self {
        self.anon_head_error = Some(err);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn grants(&self, identity: Identity) -> Grants {
        match identity {
            Identity::Authenticated => self.auth,
            Identity::Anonymous => self.anon,
        }
    }
}

fn owner_acl() -> BucketAcl {
    BucketAcl {
        owner: Some(AclOwner {
            id: Some("owner-canonical-id".to_owned()),
            display_name: None,
        }),
        grants: vec![AclGrant {
            grantee: Some(AclGrantee {
                kind: "CanonicalUser".to_owned(),
                id: Some("owner-canonical-id".to_owned()),
                display_name: None,
                email_address: None,
                uri: None,
            }),
            permission: Some("FULL_CONTROL".to_owned()),
        }],
    }
}

fn require(allowed: bool, what: &str) -> ApiResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(ApiError::AuthorizationDenied(format!("AccessDenied: {what}")))
    }
}

/// In-memory object-storage fake.
#[derive(Debug, Default)]
pub(crate) struct FakeS3 {
    buckets: Mutex<HashMap<String, FakeBucket>>,
    calls: Mutex<Vec<Call>>,
    list_error: Option<ApiError>,
}

impl FakeS3 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(self, name: &str, bucket: FakeBucket) -> Self {
        self.buckets.lock().insert(name.to_owned(), bucket);
        self
    }

    pub fn with_list_error(mut self, err: ApiError) -> Self {
        self.list_error = Some(err);
        self
    }

    /// Replace a bucket's state between runs.
    pub fn set_bucket(&self, name: &str, bucket: FakeBucket) {
        self.buckets.lock().insert(name.to_owned(), bucket);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls.lock().iter().filter(|c| c.op == op).count()
    }

    pub fn count_as(&self, op: Op, identity: Identity) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.op == op && c.identity == identity)
            .count()
    }

    pub fn objects(&self, bucket: &str) -> Vec<String> {
        let mut objects: Vec<String> = self
            .buckets
            .lock()
            .get(bucket)
            .map(|b| b.objects.iter().cloned().collect())
            .unwrap_or_default();
        objects.sort();
        objects
    }

    async fn enter(&self, op: Op, identity: Identity, bucket: &str) {
        self.calls.lock().push(Call {
            op,
            identity,
            bucket: bucket.to_owned(),
        });
        let latency = self
            .buckets
            .lock()
            .get(bucket)
            .map(|b| b.latency)
            .unwrap_or_default();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn with_state<T>(
        &self,
        bucket: &str,
        f: impl FnOnce(&mut FakeBucket) -> ApiResult<T>,
    ) -> ApiResult<T> {
        let mut buckets = self.buckets.lock();
        let Some(state) = buckets.get_mut(bucket) else {
            return Err(ApiError::Other(format!("NoSuchBucket: {bucket}")));
        };
        if state.unreachable {
            return Err(ApiError::Other("dispatch failure: connection refused".to_owned()));
        }
        f(state)
    }
}

#[async_trait::async_trait]
impl S3Api for FakeS3 {
    async fn get_bucket_acl(&self, identity: Identity, bucket: &str) -> ApiResult<BucketAcl> {
        self.enter(Op::GetBucketAcl, identity, bucket).await;
        self.with_state(bucket, |state| {
            require(state.grants(identity).read_acl, "GetBucketAcl")?;
            Ok(state.acl.clone())
        })
    }

    async fn put_bucket_acl(
        &self,
        identity: Identity,
        bucket: &str,
        acl: &BucketAcl,
    ) -> ApiResult<()> {
        self.enter(Op::PutBucketAcl, identity, bucket).await;
        self.with_state(bucket, |state| {
            require(state.grants(identity).write_acl, "PutBucketAcl")?;
            state.acl = acl.clone();
            Ok(())
        })
    }

    async fn head_object(&self, identity: Identity, bucket: &str, key: &str) -> ApiResult<()> {
        self.enter(Op::HeadObject, identity, bucket).await;
        self.with_state(bucket, |state| {
            if identity == Identity::Anonymous {
                if let Some(err) = &state.anon_head_error {
                    return Err(err.clone());
                }
            }
            require(state.grants(identity).read, "HeadObject")?;
            if state.objects.contains(key) {
                Ok(())
            } else {
                Err(ApiError::NotFound(format!("NotFound: {key}")))
            }
        })
    }

    async fn put_object(
        &self,
        identity: Identity,
        bucket: &str,
        key: &str,
        _body: Bytes,
    ) -> ApiResult<()> {
        self.enter(Op::PutObject, identity, bucket).await;
        self.with_state(bucket, |state| {
            require(state.grants(identity).write, "PutObject")?;
            state.objects.insert(key.to_owned());
            Ok(())
        })
    }

    async fn delete_object(&self, identity: Identity, bucket: &str, key: &str) -> ApiResult<()> {
        self.enter(Op::DeleteObject, identity, bucket).await;
        self.with_state(bucket, |state| {
            require(state.grants(identity).delete, "DeleteObject")?;
            state.objects.remove(key);
            Ok(())
        })
    }

    async fn get_public_access_block(
        &self,
        identity: Identity,
        bucket: &str,
    ) -> ApiResult<PublicAccessBlockState> {
        self.enter(Op::GetPublicAccessBlock, identity, bucket).await;
        self.with_state(bucket, |state| {
            require(state.grants(identity).read_config, "GetPublicAccessBlock")?;
            state.public_access_block.ok_or_else(|| {
                ApiError::NotFound("NoSuchPublicAccessBlockConfiguration".to_owned())
            })
        })
    }

    async fn get_bucket_policy(&self, identity: Identity, bucket: &str) -> ApiResult<String> {
        self.enter(Op::GetBucketPolicy, identity, bucket).await;
        self.with_state(bucket, |state| {
            require(state.grants(identity).read_config, "GetBucketPolicy")?;
            state
                .policy
                .clone()
                .ok_or_else(|| ApiError::NotFound("NoSuchBucketPolicy".to_owned()))
        })
    }

    async fn list_buckets(&self, identity: Identity) -> ApiResult<Vec<String>> {
        self.enter(Op::ListBuckets, identity, "").await;
        if let Some(err) = &self.list_error {
            return Err(err.clone());
        }
        let mut names: Vec<String> = self.buckets.lock().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
