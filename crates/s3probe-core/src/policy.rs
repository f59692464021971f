//! Bucket-policy fallback for the anonymous read check.
//!
//! When the live anonymous read is inconclusive, the bucket policy is fetched
//! and searched for a wildcard principal next to a get-object action. This is
//! a textual heuristic only: conditions, explicit denies, and other
//! statements are not evaluated.

/// Principal patterns that grant access to everyone.
const WILDCARD_PRINCIPALS: [&str; 2] = [r#""Principal":"*""#, r#""Principal":{"AWS":"*"}"#];

/// Action patterns covering `GetObject`.
const GET_OBJECT_ACTIONS: [&str; 2] = [r#""s3:GetObject""#, r#""s3:Get*""#];

/// Whether the policy text appears to grant public object reads.
///
/// Whitespace is stripped before matching so pretty-printed policies are
/// recognized the same way as compact ones.
///
/// # Examples
///
/// ```
/// use s3probe_core::policy::grants_public_read;
///
/// let policy = r#"{"Statement":[{"Effect":"Allow","Principal":"*","Action":"s3:GetObject"}]}"#;
/// assert!(grants_public_read(policy));
/// assert!(!grants_public_read(r#"{"Statement":[]}"#));
/// ```
#[must_use]
pub fn grants_public_read(policy: &str) -> bool {
    let compact: String = policy.chars().filter(|c| !c.is_whitespace()).collect();

    WILDCARD_PRINCIPALS.iter().any(|p| compact.contains(p))
        && GET_OBJECT_ACTIONS.iter().any(|a| compact.contains(a))
}
