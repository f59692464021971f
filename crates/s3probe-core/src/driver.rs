//! The bucket driver.
//!
//! [`BucketDriver`] walks an ordered list of buckets. For each one it spawns
//! the eight checks as separate tasks, waits for all of them, hands the
//! assembled [`BucketResult`] to a [`ResultSink`], and pauses before moving
//! on. Buckets are processed strictly one after another, so at most eight
//! checks are in flight at any time.
//!
//! A shutdown signal stops the driver before the next bucket. The checks of
//! the current bucket are allowed to finish unless `abort_in_flight` is
//! configured, in which case the bucket's scope is cancelled and every
//! pending check resolves to denied.

use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{Identity, S3Api};
use crate::config::ProbeConfig;
use crate::engine::ProbeEngine;
use crate::error::{ProbeError, ProbeResult};
use crate::scope::ProbeScope;
use crate::types::{BucketName, BucketResult, CheckKind, CheckOutcome};

/// Receives one result per probed bucket, in input order.
pub trait ResultSink {
    /// Accept the result for a bucket.
    fn accept(&mut self, result: BucketResult);
}

impl<F: FnMut(BucketResult)> ResultSink for F {
    fn accept(&mut self, result: BucketResult) {
        self(result);
    }
}

/// Drives the probe engine over a sequence of buckets.
pub struct BucketDriver<A: ?Sized> {
    engine: Arc<ProbeEngine<A>>,
    delay: Duration,
    abort_in_flight: bool,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<A: ?Sized> std::fmt::Debug for BucketDriver<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketDriver")
            .field("engine", &self.engine)
            .field("delay", &self.delay)
            .field("abort_in_flight", &self.abort_in_flight)
            .finish_non_exhaustive()
    }
}

impl<A: S3Api + ?Sized> BucketDriver<A> {
    /// Create a driver over `api`.
    #[must_use]
    pub fn new(api: Arc<A>, config: &ProbeConfig) -> Self {
        Self {
            engine: Arc::new(ProbeEngine::new(api, config)),
            delay: config.bucket_delay(),
            abort_in_flight: config.abort_in_flight,
            shutdown: None,
        }
    }

    /// Observe a shutdown signal. Sending `true` stops the run before the
    /// next bucket.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// The engine used for each bucket.
    #[must_use]
    pub fn engine(&self) -> &Arc<ProbeEngine<A>> {
        &self.engine
    }

    /// List every bucket visible to the caller.
    pub async fn discover(&self) -> ProbeResult<Vec<BucketName>> {
        let names = self
            .engine
            .api()
            .list_buckets(Identity::Authenticated)
            .await
            .map_err(ProbeError::Discovery)?;

        let buckets: Vec<BucketName> = names.iter().filter_map(|n| BucketName::parse(n)).collect();
        info!(count = buckets.len(), "discovered buckets");
        Ok(buckets)
    }

    /// Discover the caller's buckets and probe all of them.
    pub async fn run_discovered<S: ResultSink + ?Sized>(&self, sink: &mut S) -> ProbeResult<usize> {
        let buckets = self.discover().await?;
        Ok(self.run(buckets, sink).await)
    }

    /// Probe every bucket in order, reporting each result to `sink`.
    ///
    /// Identifiers that are empty after trimming are skipped silently.
    /// Returns the number of buckets reported.
    pub async fn run<I, S>(&self, buckets: I, sink: &mut S) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        S: ResultSink + ?Sized,
    {
        let buckets: Vec<BucketName> = buckets
            .into_iter()
            .filter_map(|raw| BucketName::parse(raw.as_ref()))
            .collect();
        let total = buckets.len();
        let mut reported = 0;

        for (index, bucket) in buckets.into_iter().enumerate() {
            if self.shutdown_requested() {
                warn!(remaining = total - index, "shutdown requested, stopping");
                break;
            }

            let result = self.probe_bucket(bucket).await;
            sink.accept(result);
            reported += 1;

            if index + 1 < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        reported
    }

    /// Run all eight checks for one bucket concurrently.
    ///
    /// Each check runs as its own task under a scope created for this bucket
    /// alone. Outcomes are stored by check slot, so completion order does not
    /// matter. A task that panics yields a denied outcome for its slot.
    pub async fn probe_bucket(&self, bucket: BucketName) -> BucketResult {
        info!(bucket = %bucket, "probing bucket");
        let (handle, scope) = ProbeScope::new();

        let tasks = CheckKind::ALL.map(|kind| {
            let engine = Arc::clone(&self.engine);
            let bucket = bucket.clone();
            let scope = scope.clone();
            tokio::spawn(async move { engine.run_check(kind, bucket.as_str(), &scope).await })
        });

        let label = bucket.clone();
        let collect = pin!(async move {
            let mut outcomes: [CheckOutcome; CheckKind::COUNT] = Default::default();
            for (kind, task) in CheckKind::ALL.into_iter().zip(tasks) {
                outcomes[kind.slot()] = match task.await {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        warn!(bucket = %label, check = %kind, error = %err, "check task failed");
                        CheckOutcome::denied(Some(format!("task failed: {err}")))
                    }
                };
            }
            outcomes
        });

        let outcomes = match (&self.shutdown, self.abort_in_flight) {
            (Some(shutdown), true) => {
                let mut collect = collect;
                tokio::select! {
                    outcomes = &mut collect => outcomes,
                    () = wait_for_shutdown(shutdown.clone()) => {
                        warn!(bucket = %bucket, "shutdown requested, cancelling in-flight checks");
                        handle.cancel();
                        collect.await
                    }
                }
            }
            _ => collect.await,
        };

        let result = BucketResult::new(bucket, outcomes);
        debug!(
            bucket = %result.bucket(),
            allowed = result.verdicts().iter().filter(|v| v.is_allowed()).count(),
            "bucket probed"
        );
        result
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }
}

/// Resolve once `true` is sent on the shutdown channel; never resolves if
/// the sender goes away first.
async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
