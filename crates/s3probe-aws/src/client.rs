//! [`S3Api`] over the AWS SDK.

use std::fmt;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, ConfigLoader, Region, SdkConfig};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use s3probe_core::{
    ApiError, ApiResult, BucketAcl, Identity, ProbeConfig, ProbeError, ProbeResult,
    PublicAccessBlockState, S3Api,
};
use tracing::{debug, info};

use crate::acl::{acl_from_output, policy_from_acl};
use crate::classify::from_sdk;

/// Region used when neither the configuration nor the SDK provider chain
/// yields one.
const FALLBACK_REGION: &str = "us-east-1";

/// Object-storage API backed by two SDK clients: one signing requests with
/// the caller's credentials and one sending them unsigned.
#[derive(Clone)]
pub struct AwsS3Api {
    authenticated: Client,
    anonymous: Client,
}

impl fmt::Debug for AwsS3Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsS3Api").finish_non_exhaustive()
    }
}

impl AwsS3Api {
    /// Build both clients from the probe configuration and the SDK's default
    /// credential and region chains.
    ///
    /// SDK retries are disabled so that every call is a single attempt.
    pub async fn connect(config: &ProbeConfig) -> ProbeResult<Self> {
        config.validate()?;

        let shared = loader(config).load().await;
        let unsigned = loader(config).no_credentials().load().await;
        Self::from_sdk_configs(config, &shared, &unsigned).await
    }

    /// Build both clients from loaded SDK configurations.
    ///
    /// Credentials of `shared` are resolved once up front so a missing or
    /// broken credential chain fails setup instead of every signed request.
    async fn from_sdk_configs(
        config: &ProbeConfig,
        shared: &SdkConfig,
        unsigned: &SdkConfig,
    ) -> ProbeResult<Self> {
        resolve_credentials(shared.credentials_provider()).await?;

        let authenticated = Client::from_conf(
            aws_sdk_s3::config::Builder::from(shared)
                .force_path_style(config.force_path_style)
                .build(),
        );
        let anonymous = Client::from_conf(
            aws_sdk_s3::config::Builder::from(unsigned)
                .force_path_style(config.force_path_style)
                .build(),
        );

        info!(
            region = %shared
                .region()
                .map_or_else(|| FALLBACK_REGION.to_owned(), ToString::to_string),
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            path_style = config.force_path_style,
            "s3 clients ready"
        );
        Ok(Self::from_clients(authenticated, anonymous))
    }

    /// Wrap pre-built clients.
    #[must_use]
    pub fn from_clients(authenticated: Client, anonymous: Client) -> Self {
        Self {
            authenticated,
            anonymous,
        }
    }

    fn client(&self, identity: Identity) -> &Client {
        match identity {
            Identity::Authenticated => &self.authenticated,
            Identity::Anonymous => &self.anonymous,
        }
    }
}

async fn resolve_credentials(provider: Option<SharedCredentialsProvider>) -> ProbeResult<()> {
    let provider = provider.ok_or_else(|| {
        ProbeError::ClientSetup("no credential provider configured".to_owned())
    })?;
    let credentials = provider.provide_credentials().await.map_err(|e| {
        ProbeError::ClientSetup(format!("no credentials available: {}", DisplayErrorContext(&e)))
    })?;
    debug!(access_key_id = credentials.access_key_id(), "credentials resolved");
    Ok(())
}

fn loader(config: &ProbeConfig) -> ConfigLoader {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .retry_config(RetryConfig::standard().with_max_attempts(1));
    loader = match config.region.clone() {
        Some(region) => loader.region(Region::new(region)),
        None => loader.region(
            aws_config::meta::region::RegionProviderChain::default_provider()
                .or_else(FALLBACK_REGION),
        ),
    };
    if let Some(url) = &config.endpoint_url {
        loader = loader.endpoint_url(url);
    }
    loader
}

#[async_trait]
impl S3Api for AwsS3Api {
    async fn get_bucket_acl(&self, identity: Identity, bucket: &str) -> ApiResult<BucketAcl> {
        debug!(bucket, identity = identity.as_str(), "get-bucket-acl");
        let output = self
            .client(identity)
            .get_bucket_acl()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| from_sdk(&e))?;
        Ok(acl_from_output(&output))
    }

    async fn put_bucket_acl(
        &self,
        identity: Identity,
        bucket: &str,
        acl: &BucketAcl,
    ) -> ApiResult<()> {
        debug!(bucket, identity = identity.as_str(), "put-bucket-acl");
        self.client(identity)
            .put_bucket_acl()
            .bucket(bucket)
            .access_control_policy(policy_from_acl(acl)?)
            .send()
            .await
            .map_err(|e| from_sdk(&e))?;
        Ok(())
    }

    async fn head_object(&self, identity: Identity, bucket: &str, key: &str) -> ApiResult<()> {
        debug!(bucket, key, identity = identity.as_str(), "head-object");
        self.client(identity)
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| from_sdk(&e))?;
        Ok(())
    }

    async fn put_object(
        &self,
        identity: Identity,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> ApiResult<()> {
        debug!(bucket, key, identity = identity.as_str(), "put-object");
        self.client(identity)
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| from_sdk(&e))?;
        Ok(())
    }

    async fn delete_object(&self, identity: Identity, bucket: &str, key: &str) -> ApiResult<()> {
        debug!(bucket, key, identity = identity.as_str(), "delete-object");
        self.client(identity)
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| from_sdk(&e))?;
        Ok(())
    }

    async fn get_public_access_block(
        &self,
        identity: Identity,
        bucket: &str,
    ) -> ApiResult<PublicAccessBlockState> {
        debug!(bucket, identity = identity.as_str(), "get-public-access-block");
        let output = self
            .client(identity)
            .get_public_access_block()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| from_sdk(&e))?;

        let config = output.public_access_block_configuration().ok_or_else(|| {
            ApiError::NotFound("NoSuchPublicAccessBlockConfiguration".to_owned())
        })?;
        Ok(PublicAccessBlockState {
            block_public_acls: config.block_public_acls().unwrap_or(false),
            block_public_policy: config.block_public_policy().unwrap_or(false),
            ignore_public_acls: config.ignore_public_acls().unwrap_or(false),
            restrict_public_buckets: config.restrict_public_buckets().unwrap_or(false),
        })
    }

    async fn get_bucket_policy(&self, identity: Identity, bucket: &str) -> ApiResult<String> {
        debug!(bucket, identity = identity.as_str(), "get-bucket-policy");
        let output = self
            .client(identity)
            .get_bucket_policy()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| from_sdk(&e))?;

        output
            .policy()
            .map(ToOwned::to_owned)
            .ok_or_else(|| ApiError::NotFound("NoSuchBucketPolicy".to_owned()))
    }

    async fn list_buckets(&self, identity: Identity) -> ApiResult<Vec<String>> {
        debug!(identity = identity.as_str(), "list-buckets");
        let client = self.client(identity);
        let mut names = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let output = client
                .list_buckets()
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| from_sdk(&e))?;

            names.extend(
                output
                    .buckets()
                    .iter()
                    .filter_map(|b| b.name().map(ToOwned::to_owned)),
            );

            match output.continuation_token() {
                Some(token) if !token.is_empty() => continuation_token = Some(token.to_owned()),
                _ => break,
            }
        }

        Ok(names)
    }
}
