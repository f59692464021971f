//! Keys for the temporary objects written by the probes.
//!
//! Every key is built from the configured prefix, the check label, the
//! current time in nanoseconds, and a random UUID fragment. Checks running
//! concurrently on the same bucket therefore never touch each other's
//! objects, and a rerun never reuses a key left behind by an earlier run.

use chrono::Utc;
use uuid::Uuid;

use crate::types::CheckKind;

/// Build a fresh key for a temporary object owned by `kind`.
///
/// # Examples
///
/// ```
/// use s3probe_core::CheckKind;
/// use s3probe_core::keys::ephemeral_key;
///
/// let key = ephemeral_key("s3probe-test", CheckKind::AuthWrite);
/// assert!(key.starts_with("s3probe-test-auth-write-"));
/// ```
#[must_use]
pub fn ephemeral_key(prefix: &str, kind: CheckKind) -> String {
    let now = Utc::now();
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));
    let nonce = Uuid::new_v4().simple().to_string();
    format!(
        "{prefix}-{}-{nanos}-{}",
        kind.label().to_ascii_lowercase(),
        &nonce[..12]
    )
}
