//! Probe configuration.
//!
//! Provides [`ProbeConfig`], the single configuration value threaded into the
//! client adapter, the engine, and the driver. Values are loaded from
//! environment variables via [`ProbeConfig::from_env`]; the CLI layers its
//! flags on top.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{ProbeError, ProbeResult};

/// Probe configuration.
///
/// # Examples
///
/// ```
/// use s3probe_core::ProbeConfig;
///
/// let config = ProbeConfig::default();
/// assert_eq!(config.bucket_delay_ms, 100);
/// assert!(!config.verbose);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ProbeConfig {
    /// Region override. When unset the SDK's default provider chain decides.
    #[builder(default, setter(into, strip_option))]
    pub region: Option<String>,

    /// Custom endpoint (e.g. a local S3-compatible server).
    #[builder(default, setter(into, strip_option))]
    pub endpoint_url: Option<String>,

    /// Use path-style addressing instead of virtual-hosted-style.
    #[builder(default = false)]
    pub force_path_style: bool,

    /// Pause between two consecutive buckets, in milliseconds.
    #[builder(default = 100)]
    pub bucket_delay_ms: u64,

    /// Prefix of the temporary object keys written by write/delete checks.
    #[builder(default = String::from("s3probe-test"), setter(into))]
    pub key_prefix: String,

    /// Attach raw error text to denied outcomes.
    #[builder(default = false)]
    pub verbose: bool,

    /// Cancel the in-flight bucket on shutdown instead of letting it finish.
    #[builder(default = false)]
    pub abort_in_flight: bool,

    /// Log level filter string (e.g. `"warn"`, `"debug"`).
    #[builder(default = String::from("warn"), setter(into))]
    pub log_level: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint_url: None,
            force_path_style: false,
            bucket_delay_ms: 100,
            key_prefix: String::from("s3probe-test"),
            verbose: false,
            abort_in_flight: false,
            log_level: String::from("warn"),
        }
    }
}

impl ProbeConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `AWS_REGION` / `DEFAULT_REGION` | *(unset)* |
    /// | `S3_ENDPOINT_URL` | *(unset)* |
    /// | `S3_FORCE_PATH_STYLE` | `false` |
    /// | `S3PROBE_BUCKET_DELAY_MS` | `100` |
    /// | `S3PROBE_KEY_PREFIX` | `s3probe-test` |
    /// | `S3PROBE_VERBOSE` | `false` |
    /// | `S3PROBE_ABORT_IN_FLIGHT` | `false` |
    /// | `LOG_LEVEL` | `warn` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("AWS_REGION").or_else(|| lookup("DEFAULT_REGION")) {
            config.region = Some(v);
        }
        if let Some(v) = lookup("S3_ENDPOINT_URL") {
            config.endpoint_url = Some(v);
        }
        if let Some(v) = lookup("S3_FORCE_PATH_STYLE") {
            config.force_path_style = parse_bool(&v);
        }
        if let Some(v) = lookup("S3PROBE_BUCKET_DELAY_MS") {
            if let Ok(n) = v.parse::<u64>() {
                config.bucket_delay_ms = n;
            }
        }
        if let Some(v) = lookup("S3PROBE_KEY_PREFIX") {
            config.key_prefix = v;
        }
        if let Some(v) = lookup("S3PROBE_VERBOSE") {
            config.verbose = parse_bool(&v);
        }
        if let Some(v) = lookup("S3PROBE_ABORT_IN_FLIGHT") {
            config.abort_in_flight = parse_bool(&v);
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Delay between two consecutive buckets.
    #[must_use]
    pub fn bucket_delay(&self) -> Duration {
        Duration::from_millis(self.bucket_delay_ms)
    }

    /// Check values that would otherwise fail later in confusing ways.
    pub fn validate(&self) -> ProbeResult<()> {
        if self.key_prefix.is_empty() || self.key_prefix.chars().any(char::is_whitespace) {
            return Err(ProbeError::Config(format!(
                "key prefix must be non-empty and contain no whitespace: {:?}",
                self.key_prefix
            )));
        }
        if let Some(endpoint) = &self.endpoint_url {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ProbeError::Config(format!(
                    "endpoint URL must start with http:// or https://: {endpoint}"
                )));
            }
        }
        Ok(())
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
