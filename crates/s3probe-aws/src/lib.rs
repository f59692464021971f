//! AWS SDK adapter for s3probe.
//!
//! [`AwsS3Api`] implements [`s3probe_core::S3Api`] with two `aws-sdk-s3`
//! clients built from one configuration: an authenticated client using the
//! default credential chain and an anonymous client that sends unsigned
//! requests. SDK failures are mapped onto [`s3probe_core::ApiError`] by
//! [`classify`](classify::classify) using status codes and service error
//! codes only.

pub mod acl;
pub mod classify;
pub mod client;

pub use client::AwsS3Api;
