//! Domain types shared by the engine, the driver, and the API adapters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a bucket to probe.
///
/// The only validation applied is that the trimmed name is non-empty; names
/// are otherwise opaque and compared by exact match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketName(String);

impl BucketName {
    /// Parse a raw identifier, trimming surrounding whitespace.
    ///
    /// Returns `None` when nothing is left after trimming.
    ///
    /// # Examples
    ///
    /// ```
    /// use s3probe_core::BucketName;
    ///
    /// assert_eq!(BucketName::parse("  logs ").unwrap().as_str(), "logs");
    /// assert!(BucketName::parse("   ").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Get the bucket name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BucketName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of a single permission check.
///
/// There is no third state: anything that is not a clear success is
/// [`Verdict::Denied`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// The operation was permitted.
    Allowed,
    /// The operation was rejected, or could not be shown to be permitted.
    #[default]
    Denied,
}

impl Verdict {
    /// Label used in tabular output (`OK` / `DENIED`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "OK",
            Self::Denied => "DENIED",
        }
    }

    /// Whether this verdict is [`Verdict::Allowed`].
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The eight permission checks, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckKind {
    /// Read the bucket ACL as the caller.
    GetAcl,
    /// Read the bucket ACL and write it back unchanged.
    PutAcl,
    /// Read an object without credentials.
    AnonGet,
    /// Read an object with the caller's credentials.
    AuthGet,
    /// Write an object without credentials.
    AnonWrite,
    /// Write an object with the caller's credentials.
    AuthWrite,
    /// Delete an object without credentials.
    AnonDel,
    /// Delete an object with the caller's credentials.
    AuthDel,
}

impl CheckKind {
    /// Number of checks run per bucket.
    pub const COUNT: usize = 8;

    /// All checks in slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::GetAcl,
        Self::PutAcl,
        Self::AnonGet,
        Self::AuthGet,
        Self::AnonWrite,
        Self::AuthWrite,
        Self::AnonDel,
        Self::AuthDel,
    ];

    /// Column label for this check.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::GetAcl => "GET-ACL",
            Self::PutAcl => "PUT-ACL",
            Self::AnonGet => "ANON-GET",
            Self::AuthGet => "AUTH-GET",
            Self::AnonWrite => "ANON-WRITE",
            Self::AuthWrite => "AUTH-WRITE",
            Self::AnonDel => "ANON-DEL",
            Self::AuthDel => "AUTH-DEL",
        }
    }

    /// Fixed slot of this check inside a [`BucketResult`].
    #[must_use]
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Whether the check exercises the anonymous identity.
    #[must_use]
    pub fn is_anonymous(self) -> bool {
        matches!(self, Self::AnonGet | Self::AnonWrite | Self::AnonDel)
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verdict of one check plus optional diagnostic text.
///
/// The detail is only filled in when verbose mode is enabled and never
/// influences the verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// The verdict.
    pub verdict: Verdict,
    /// Raw error text of the step that decided a denial, if recorded.
    pub detail: Option<String>,
}

impl CheckOutcome {
    /// An allowed outcome without detail.
    #[must_use]
    pub fn allowed() -> Self {
        Self {
            verdict: Verdict::Allowed,
            detail: None,
        }
    }

    /// A denied outcome with optional detail.
    #[must_use]
    pub fn denied(detail: Option<String>) -> Self {
        Self {
            verdict: Verdict::Denied,
            detail,
        }
    }
}

/// All eight outcomes for one bucket.
///
/// Constructed from a complete, fixed-width array so a result can never be
/// missing a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketResult {
    bucket: BucketName,
    outcomes: [CheckOutcome; CheckKind::COUNT],
}

impl BucketResult {
    /// Assemble a result from outcomes indexed by [`CheckKind::slot`].
    #[must_use]
    pub fn new(bucket: BucketName, outcomes: [CheckOutcome; CheckKind::COUNT]) -> Self {
        Self { bucket, outcomes }
    }

    /// The probed bucket.
    #[must_use]
    pub fn bucket(&self) -> &BucketName {
        &self.bucket
    }

    /// Outcome of a single check.
    #[must_use]
    pub fn outcome(&self, kind: CheckKind) -> &CheckOutcome {
        &self.outcomes[kind.slot()]
    }

    /// Verdict of a single check.
    #[must_use]
    pub fn verdict(&self, kind: CheckKind) -> Verdict {
        self.outcomes[kind.slot()].verdict
    }

    /// Iterate over `(kind, outcome)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (CheckKind, &CheckOutcome)> {
        CheckKind::ALL.into_iter().zip(self.outcomes.iter())
    }

    /// All verdicts in slot order.
    #[must_use]
    pub fn verdicts(&self) -> [Verdict; CheckKind::COUNT] {
        CheckKind::ALL.map(|kind| self.verdict(kind))
    }
}

/// Public-access-block flags of a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccessBlockState {
    /// Reject requests that add public ACLs.
    pub block_public_acls: bool,
    /// Reject bucket policies that grant public access.
    pub block_public_policy: bool,
    /// Ignore public ACLs on the bucket and its objects.
    pub ignore_public_acls: bool,
    /// Restrict access under public policies to authorized principals.
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlockState {
    /// Whether any of the four flags is set.
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        self.block_public_acls
            || self.block_public_policy
            || self.ignore_public_acls
            || self.restrict_public_buckets
    }
}

/// Owner section of a bucket ACL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclOwner {
    /// Canonical user ID.
    pub id: Option<String>,
    /// Display name, when the provider still returns one.
    pub display_name: Option<String>,
}

/// Grantee of an ACL grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclGrantee {
    /// Grantee type (`CanonicalUser`, `Group`, `AmazonCustomerByEmail`).
    pub kind: String,
    /// Canonical user ID.
    pub id: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Email address.
    pub email_address: Option<String>,
    /// Group URI.
    pub uri: Option<String>,
}

/// A single ACL grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclGrant {
    /// Who the grant applies to.
    pub grantee: Option<AclGrantee>,
    /// Granted permission (`FULL_CONTROL`, `READ`, ...).
    pub permission: Option<String>,
}

/// Bucket ACL as returned by the provider.
///
/// The PUT-ACL check writes this document back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketAcl {
    /// Bucket owner.
    pub owner: Option<AclOwner>,
    /// Grants attached to the bucket.
    pub grants: Vec<AclGrant>,
}
