//! s3probe - report which bucket operations are permitted.
//!
//! For every bucket the tool runs eight checks (ACL read and write, plus
//! read, write and delete for both the caller's credentials and an anonymous
//! caller) and prints one `OK` / `DENIED` row per bucket as soon as its
//! checks finish.
//!
//! # Usage
//!
//! ```text
//! s3probe bucket-a bucket-b
//! s3probe --file buckets.txt
//! printf 'bucket-a\nbucket-b\n' | s3probe
//! s3probe                      # every bucket visible to the caller
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AWS_REGION` / `DEFAULT_REGION` | *(SDK chain)* | Region override |
//! | `S3_ENDPOINT_URL` | *(unset)* | Custom S3 endpoint |
//! | `S3_FORCE_PATH_STYLE` | `false` | Path-style addressing |
//! | `S3PROBE_BUCKET_DELAY_MS` | `100` | Pause between buckets |
//! | `S3PROBE_KEY_PREFIX` | `s3probe-test` | Prefix of temporary test objects |
//! | `S3PROBE_VERBOSE` | `false` | Show error details |
//! | `S3PROBE_ABORT_IN_FLIGHT` | `false` | Cancel the current bucket on Ctrl-C |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//! | `NO_COLOR` | *(unset)* | Disable colored output |

mod cli;
mod render;
mod source;

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use s3probe_aws::AwsS3Api;
use s3probe_core::{BucketDriver, BucketName, BucketResult, ProbeConfig};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::render::{LEGEND, TableRenderer, use_color};
use crate::source::BucketSource;

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    Ok(())
}

/// Exit status after a forced quit (128 + SIGINT).
const EXIT_INTERRUPTED: i32 = 130;

/// Response to the n-th Ctrl-C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterruptAction {
    /// Finish the current bucket, then stop.
    Drain,
    /// Quit immediately.
    Exit,
}

fn interrupt_action(received: u32) -> InterruptAction {
    if received <= 1 {
        InterruptAction::Drain
    } else {
        InterruptAction::Exit
    }
}

/// Flip the shutdown flag on the first Ctrl-C and exit on the second.
fn watch_interrupt(shutdown: watch::Sender<bool>) {
    tokio::spawn(async move {
        let mut received = 0;
        while tokio::signal::ctrl_c().await.is_ok() {
            received += 1;
            match interrupt_action(received) {
                InterruptAction::Drain => {
                    warn!("received interrupt, stopping after the current bucket (Ctrl-C again to quit)");
                    shutdown.send_replace(true);
                }
                InterruptAction::Exit => {
                    warn!("received second interrupt, exiting");
                    std::process::exit(EXIT_INTERRUPTED);
                }
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ProbeConfig::from_env();
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    init_tracing(&config.log_level)?;

    let source = BucketSource::select(&args, io::stdin().is_terminal());
    let explicit = source.load().await?;

    let api = AwsS3Api::connect(&config)
        .await
        .context("error initializing S3 clients")?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let driver = BucketDriver::new(Arc::new(api), &config).with_shutdown(shutdown_rx);

    let buckets: Vec<BucketName> = match explicit {
        Some(names) => names.iter().filter_map(|n| BucketName::parse(n)).collect(),
        None => driver.discover().await.context("error listing buckets")?,
    };
    if buckets.is_empty() {
        bail!("no buckets to check");
    }

    info!(
        buckets = buckets.len(),
        source = ?source,
        delay_ms = config.bucket_delay_ms,
        verbose = config.verbose,
        "starting bucket checks"
    );
    watch_interrupt(shutdown_tx);

    let no_color = std::env::var("NO_COLOR").ok();
    let renderer = TableRenderer::new(
        &buckets,
        use_color(io::stdout().is_terminal(), no_color.as_deref()),
    );

    let mut out = io::stdout().lock();
    writeln!(out)?;
    writeln!(out, "{}", renderer.header())?;

    let mut write_error: Option<io::Error> = None;
    let reported = driver
        .run(&buckets, &mut |result: BucketResult| {
            if write_error.is_some() {
                return;
            }
            if let Err(e) = writeln!(out, "{}", renderer.row(&result)).and_then(|()| out.flush()) {
                write_error = Some(e);
                return;
            }
            for line in renderer.details(&result) {
                eprintln!("{line}");
            }
        })
        .await;
    if let Some(e) = write_error {
        return Err(e).context("error writing results");
    }

    write!(out, "{LEGEND}")?;
    out.flush()?;

    if reported < buckets.len() {
        bail!("interrupted after {reported} of {} buckets", buckets.len());
    }
    Ok(())
}
