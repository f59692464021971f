//! Translation of SDK failures into [`ApiError`].
//!
//! Classification looks at the HTTP status and the service error code only.
//! Message text is carried along for diagnostics but never inspected.

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use s3probe_core::ApiError;

/// Service codes that mean the request was rejected by access control.
const DENIED_CODES: &[&str] = &["AccessDenied", "Forbidden", "AllAccessDisabled"];

/// Service codes that mean the target does not exist, yet the request was
/// authorized to find that out.
const NOT_FOUND_CODES: &[&str] = &[
    "NoSuchKey",
    "NotFound",
    "NoSuchPublicAccessBlockConfiguration",
    "NoSuchBucketPolicy",
];

/// Service codes that must not be read as "object missing" even though they
/// come with a 404.
const OPAQUE_CODES: &[&str] = &["NoSuchBucket"];

/// Classify a failure from its HTTP status and service error code.
#[must_use]
pub fn classify(status: Option<u16>, code: Option<&str>, detail: String) -> ApiError {
    if let Some(code) = code {
        if DENIED_CODES.contains(&code) {
            return ApiError::AuthorizationDenied(detail);
        }
        if NOT_FOUND_CODES.contains(&code) {
            return ApiError::NotFound(detail);
        }
        if OPAQUE_CODES.contains(&code) {
            return ApiError::Other(detail);
        }
    }

    match status {
        Some(403) => ApiError::AuthorizationDenied(detail),
        Some(404) => ApiError::NotFound(detail),
        _ => ApiError::Other(detail),
    }
}

/// Classify an SDK error returned by any S3 operation.
pub(crate) fn from_sdk<E>(err: &SdkError<E, HttpResponse>) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let code = err.code();
    let detail = match (code, status) {
        (Some(code), Some(status)) => format!("{code} (status {status})"),
        (Some(code), None) => code.to_owned(),
        (None, Some(status)) => format!("status {status}: {}", DisplayErrorContext(err)),
        (None, None) => DisplayErrorContext(err).to_string(),
    };
    classify(status, code, detail)
}
