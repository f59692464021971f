//! Result table rendering.

use s3probe_core::{BucketName, BucketResult, CheckKind, Verdict};

const BUCKET_HEADER: &str = "BUCKET";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Printed after the last row.
pub const LEGEND: &str = "\nLegend:\n  ANON - Anonymous (unauthenticated) access\n  AUTH - Authenticated access\n\n";

/// Whether to emit ANSI colors.
#[must_use]
pub fn use_color(stdout_is_terminal: bool, no_color: Option<&str>) -> bool {
    stdout_is_terminal && no_color.is_none_or(str::is_empty)
}

/// Fixed-width table layout sized for a known set of buckets.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    bucket_width: usize,
    color: bool,
}

impl TableRenderer {
    /// Size the bucket column for the longest of `buckets`.
    pub fn new<'a>(buckets: impl IntoIterator<Item = &'a BucketName>, color: bool) -> Self {
        let bucket_width = buckets
            .into_iter()
            .map(|b| b.as_str().chars().count())
            .fold(BUCKET_HEADER.len(), usize::max);
        Self {
            bucket_width,
            color,
        }
    }

    /// Column header plus separator line.
    #[must_use]
    pub fn header(&self) -> String {
        let mut line = format!("{BUCKET_HEADER:<width$}", width = self.bucket_width);
        let mut rule = "-".repeat(self.bucket_width);
        for kind in CheckKind::ALL {
            let label = kind.label();
            line.push_str(&format!(" | {label}"));
            rule.push_str("-+-");
            rule.push_str(&"-".repeat(label.len()));
        }
        format!("{line}\n{rule}")
    }

    /// One row for a bucket result.
    #[must_use]
    pub fn row(&self, result: &BucketResult) -> String {
        let mut line = format!(
            "{bucket:<width$}",
            bucket = result.bucket().as_str(),
            width = self.bucket_width
        );
        for (kind, outcome) in result.iter() {
            line.push_str(" | ");
            line.push_str(&self.cell(outcome.verdict, kind.label().len()));
        }
        line
    }

    /// Verbose detail lines for the denied checks of a result.
    #[must_use]
    pub fn details(&self, result: &BucketResult) -> Vec<String> {
        result
            .iter()
            .filter_map(|(kind, outcome)| {
                outcome
                    .detail
                    .as_deref()
                    .map(|detail| format!("  {}: {kind}: {detail}", result.bucket()))
            })
            .collect()
    }

    fn cell(&self, verdict: Verdict, width: usize) -> String {
        let text = format!("{:<width$}", verdict.as_str());
        if !self.color {
            return text;
        }
        let color = if verdict.is_allowed() { GREEN } else { RED };
        format!("{color}{text}{RESET}")
    }
}
