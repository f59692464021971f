//! Boundary between the probe engine and an object-storage client.
//!
//! [`S3Api`] lists the calls the checks need. Each call can be issued under
//! either [`Identity`], and every failure is reported as a classified
//! [`ApiError`] rather than raw provider text, so the verdict rules do not
//! depend on a particular client library or its message wording.
//!
//! # Object safety
//!
//! The trait uses `#[async_trait]` so implementations can be shared as
//! `Arc<dyn S3Api>` as well as used generically.

use bytes::Bytes;

use crate::types::{BucketAcl, PublicAccessBlockState};

/// Identity a request is sent under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identity {
    /// The operator's configured credentials.
    Authenticated,
    /// No credentials at all (unsigned request).
    Anonymous,
}

impl Identity {
    /// Short label for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::Anonymous => "anonymous",
        }
    }
}

/// Classified failure of an API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The provider's access-control layer rejected the request (403).
    #[error("authorization denied: {0}")]
    AuthorizationDenied(String),

    /// The target resource does not exist (404); the request itself was
    /// authorized.
    #[error("not found: {0}")]
    NotFound(String),

    /// Anything else: transport errors, throttling, malformed responses.
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Error used when a call is abandoned because its probe scope was
    /// cancelled.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::Other("cancelled".to_owned())
    }

    /// Whether this is [`ApiError::AuthorizationDenied`].
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::AuthorizationDenied(_))
    }

    /// Whether this is [`ApiError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result of an API call.
pub type ApiResult<T> = Result<T, ApiError>;

/// Object-storage operations used by the permission checks.
#[async_trait::async_trait]
pub trait S3Api: Send + Sync + 'static {
    /// Fetch the bucket ACL.
    async fn get_bucket_acl(&self, identity: Identity, bucket: &str) -> ApiResult<BucketAcl>;

    /// Replace the bucket ACL.
    async fn put_bucket_acl(
        &self,
        identity: Identity,
        bucket: &str,
        acl: &BucketAcl,
    ) -> ApiResult<()>;

    /// Fetch object metadata.
    async fn head_object(&self, identity: Identity, bucket: &str, key: &str) -> ApiResult<()>;

    /// Upload an object.
    async fn put_object(
        &self,
        identity: Identity,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> ApiResult<()>;

    /// Delete an object.
    async fn delete_object(&self, identity: Identity, bucket: &str, key: &str) -> ApiResult<()>;

    /// Fetch the bucket's public-access-block configuration.
    ///
    /// A bucket without a configuration yields [`ApiError::NotFound`].
    async fn get_public_access_block(
        &self,
        identity: Identity,
        bucket: &str,
    ) -> ApiResult<PublicAccessBlockState>;

    /// Fetch the bucket policy document as raw JSON text.
    async fn get_bucket_policy(&self, identity: Identity, bucket: &str) -> ApiResult<String>;

    /// List the names of all buckets visible to the identity.
    async fn list_buckets(&self, identity: Identity) -> ApiResult<Vec<String>>;
}
