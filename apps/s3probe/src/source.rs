//! Where the bucket list comes from.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::io::AsyncReadExt;

use crate::cli::Args;

/// Origin of the bucket names to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketSource {
    /// `--stdin` was given.
    Stdin,
    /// `--file` was given.
    File(PathBuf),
    /// Names on the command line.
    Args(Vec<String>),
    /// Nothing explicit, but stdin is redirected.
    PipedStdin,
    /// Nothing at all: list every bucket the caller can see.
    Discover,
}

impl BucketSource {
    /// Pick the source for `args`.
    #[must_use]
    pub fn select(args: &Args, stdin_is_terminal: bool) -> Self {
        if args.stdin {
            Self::Stdin
        } else if let Some(path) = &args.file {
            Self::File(path.clone())
        } else if !args.buckets.is_empty() {
            Self::Args(args.buckets.clone())
        } else if !stdin_is_terminal {
            Self::PipedStdin
        } else {
            Self::Discover
        }
    }

    /// Read the explicit bucket names. Returns `None` for [`Self::Discover`].
    pub async fn load(&self) -> Result<Option<Vec<String>>> {
        let names = match self {
            Self::Stdin => read_stdin().await?,
            Self::File(path) => read_file(path).await?,
            Self::Args(names) => names.clone(),
            Self::PipedStdin => {
                let names = read_stdin().await?;
                if names.is_empty() {
                    bail!("no buckets provided via stdin");
                }
                names
            }
            Self::Discover => return Ok(None),
        };
        Ok(Some(names))
    }
}

/// Split line-delimited input into trimmed, non-empty names.
#[must_use]
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

async fn read_file(path: &Path) -> Result<Vec<String>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("error reading from file {}", path.display()))?;
    Ok(parse_lines(&text))
}

async fn read_stdin() -> Result<Vec<String>> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("error reading from stdin")?;
    Ok(parse_lines(&text))
}
