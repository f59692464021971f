//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use s3probe_core::ProbeConfig;

/// Check what the current credentials, and anonymous callers, can do on S3
/// buckets.
///
/// Buckets are taken from `--stdin`, `--file`, positional arguments or piped
/// input, in that order. With none of these, every bucket visible to the
/// caller is checked.
#[derive(Parser, Debug)]
#[command(name = "s3probe", author, version, about)]
pub struct Args {
    /// Bucket names to check
    #[arg(value_name = "BUCKET")]
    pub buckets: Vec<String>,

    /// Read bucket names from a file (one per line)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Read bucket names from stdin (one per line)
    #[arg(short = 'i', long)]
    pub stdin: bool,

    /// Show the error behind each DENIED verdict
    #[arg(short, long)]
    pub verbose: bool,

    /// Custom S3 endpoint (e.g. http://localhost:4566)
    #[arg(long, value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// Region to send requests to
    #[arg(long)]
    pub region: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long)]
    pub path_style: bool,

    /// Pause between buckets, in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// On Ctrl-C, cancel the bucket being checked instead of finishing it
    #[arg(long)]
    pub abort_in_flight: bool,
}

impl Args {
    /// Overlay command-line flags on a configuration loaded from the
    /// environment.
    pub fn apply(&self, config: &mut ProbeConfig) {
        if let Some(url) = &self.endpoint_url {
            config.endpoint_url = Some(url.clone());
        }
        if let Some(region) = &self.region {
            config.region = Some(region.clone());
        }
        if let Some(delay) = self.delay_ms {
            config.bucket_delay_ms = delay;
        }
        config.force_path_style |= self.path_style;
        config.verbose |= self.verbose;
        config.abort_in_flight |= self.abort_in_flight;
    }
}
