//! Shared plumbing for pulling board and score state from the server.

use crate::error::ProtocolError;
use crate::observer::{RefreshTarget, SessionEvent, SessionObserver};
use crate::protocol::Sentinels;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Pause before the first retry; each further retry waits one step longer.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Anything that can re-read the full game state from the server.
///
/// The move coordinator only needs this seam, which keeps the number of
/// refreshes it triggers observable.
#[async_trait::async_trait]
pub trait Refresh: Send + Sync {
    /// Re-reads board and scores.
    async fn refresh(&self) -> RefreshReport;
}

/// Settings and sinks shared by one refresh pass.
#[derive(Clone, Copy)]
pub struct RefreshContext<'a> {
    /// Wire vocabulary.
    pub sentinels: &'a Sentinels,
    /// Extra attempts after a transient failure.
    pub retries: u32,
    /// Receives changes as they are applied.
    pub observer: &'a dyn SessionObserver,
}

/// A query that still failed after its retries.
#[derive(Debug, Clone)]
pub struct RefreshFailure {
    /// Which cell or score was being read.
    pub target: RefreshTarget,
    /// The last error seen.
    pub error: ProtocolError,
}

/// Summary of one refresh pass.
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    /// Number of cells or scores whose value changed.
    pub changed: usize,
    /// Queries that could not be answered.
    pub failures: Vec<RefreshFailure>,
}

impl RefreshReport {
    /// True when every query was answered.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Folds another report into this one.
    pub fn merge(mut self, other: RefreshReport) -> Self {
        self.changed += other.changed;
        self.failures.extend(other.failures);
        self
    }

    pub(crate) fn record_failure(
        &mut self,
        target: RefreshTarget,
        error: ProtocolError,
        observer: &dyn SessionObserver,
    ) {
        warn!(query = %target, error = %error, "Refresh query failed");
        observer.on_event(SessionEvent::RefreshFailed {
            target,
            error: error.clone(),
        });
        self.failures.push(RefreshFailure { target, error });
    }
}

/// Runs `attempt` until it succeeds, fails permanently, or retries run out.
pub(crate) async fn with_retries<F, Fut>(
    retries: u32,
    mut attempt: F,
) -> Result<String, ProtocolError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, ProtocolError>>,
{
    let mut tries = 0;
    loop {
        match attempt().await {
            Ok(answer) => return Ok(answer),
            Err(err) if tries < retries && err.is_retryable() => {
                tries += 1;
                let delay = RETRY_BACKOFF * tries;
                warn!(error = %err, attempt = tries, ?delay, "Retrying query");
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
