//! Fail-soft call boundary.
//!
//! Wraps a fallible future with a timeout and a cancellation token. Any
//! failure, timeout or cancellation is logged and reported as `None`, so
//! callers only ever pick between a value and their default.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Default per-call timeout for remote collaborators
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How a guarded call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    Failed(String),
    TimedOut,
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            _ => None,
        }
    }
}

/// Run `call` unless `cancel` fires or `timeout` elapses first
pub async fn guard<T, E, F>(
    operation: &str,
    cancel: &CancellationToken,
    timeout: Duration,
    call: F,
) -> Outcome<T>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    if cancel.is_cancelled() {
        debug!(operation, "Skipped: already cancelled");
        return Outcome::Cancelled;
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(operation, "Cancelled in flight");
            Outcome::Cancelled
        }
        result = tokio::time::timeout(timeout, call) => match result {
            Ok(Ok(value)) => Outcome::Done(value),
            Ok(Err(e)) => {
                error!(operation, error = %e, "Call failed");
                Outcome::Failed(e.to_string())
            }
            Err(_) => {
                warn!(operation, ?timeout, "Call timed out");
                Outcome::TimedOut
            }
        }
    }
}
