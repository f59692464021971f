//! Bucket-scoped cancellation.
//!
//! The driver creates one [`ProbeScope`] per bucket and hands a clone to each
//! of that bucket's checks. Cancelling the scope through its
//! [`ScopeHandle`] makes every call still waiting under it resolve to
//! [`ApiError::cancelled`]; scopes of different buckets are independent.

use std::future::Future;

use tokio::sync::watch;

use crate::api::{ApiError, ApiResult};

/// Cancellation side of a [`ProbeScope`].
#[derive(Debug)]
pub struct ScopeHandle {
    tx: watch::Sender<bool>,
}

impl ScopeHandle {
    /// Cancel every call currently or subsequently guarded by the scope.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Cancellation scope shared by the checks of one bucket.
#[derive(Debug, Clone)]
pub struct ProbeScope {
    rx: watch::Receiver<bool>,
}

impl ProbeScope {
    /// Create a scope together with the handle that cancels it.
    #[must_use]
    pub fn new() -> (ScopeHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (ScopeHandle { tx }, Self { rx })
    }

    /// A scope that can never be cancelled.
    #[must_use]
    pub fn detached() -> Self {
        let (_, scope) = Self::new();
        scope
    }

    /// Whether the scope has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the scope is cancelled. Never resolves for a scope whose
    /// handle was dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Run an API call unless the scope is cancelled first.
    pub async fn guard<T, F>(&self, call: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        if self.is_cancelled() {
            return Err(ApiError::cancelled());
        }
        tokio::select! {
            biased;
            () = self.cancelled() => Err(ApiError::cancelled()),
            result = call => result,
        }
    }
}
