//! Job watching types and traits

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

// ============================================================================
// Polling Policy
// ============================================================================

/// How often and for how long a job is polled
///
/// Fixed at watcher construction. There are no defaults: the external
/// contract gives no processing-time guarantees, so callers choose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollingPolicy {
    initial_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f64,
    max_total_wait: Duration,
}

impl PollingPolicy {
    /// Create a validated policy
    pub fn new(
        initial_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f64,
        max_total_wait: Duration,
    ) -> Result<Self> {
        if initial_delay.is_zero() {
            return Err(Error::invalid_value("initial_delay", "must be greater than zero"));
        }
        if max_delay < initial_delay {
            return Err(Error::invalid_value(
                "max_delay",
                format!("{max_delay:?} is shorter than initial_delay {initial_delay:?}"),
            ));
        }
        if !backoff_multiplier.is_finite() || backoff_multiplier < 1.0 {
            return Err(Error::invalid_value(
                "backoff_multiplier",
                format!("{backoff_multiplier} must be a finite number >= 1"),
            ));
        }
        if max_total_wait.is_zero() {
            return Err(Error::invalid_value("max_total_wait", "must be greater than zero"));
        }

        Ok(Self {
            initial_delay,
            max_delay,
            backoff_multiplier,
            max_total_wait,
        })
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    pub fn max_total_wait(&self) -> Duration {
        self.max_total_wait
    }

    /// Infinite sequence of waits between polls
    pub fn delays(&self) -> PollDelays {
        PollDelays {
            next: self.initial_delay,
            max: self.max_delay,
            multiplier: self.backoff_multiplier,
        }
    }

    /// Waits actually taken before the deadline, with the last one clamped
    pub fn schedule(&self) -> Vec<Duration> {
        let mut waits = Vec::new();
        let mut remaining = self.max_total_wait;
        for delay in self.delays() {
            if remaining.is_zero() {
                break;
            }
            let wait = delay.min(remaining);
            waits.push(wait);
            remaining -= wait;
        }
        waits
    }
}

/// Iterator over poll delays: `initial, initial * m, ...` capped at `max_delay`
#[derive(Debug, Clone)]
pub struct PollDelays {
    next: Duration,
    max: Duration,
    multiplier: f64,
}

impl Iterator for PollDelays {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        self.next = Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .unwrap_or(self.max)
            .min(self.max);
        Some(current)
    }
}

// ============================================================================
// Watch Phase
// ============================================================================

/// Phases of a single watch
///
/// `Polling -> Waiting -> Polling ...` until one of the final phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchPhase {
    /// Fetching the status
    Polling,
    /// Sleeping between polls
    Waiting,
    /// A terminal status was observed
    Terminal,
    /// The total wait budget ran out
    TimedOut,
    /// The caller cancelled
    Cancelled,
    /// The status fetch failed
    FetchFailed,
}

impl WatchPhase {
    /// Check if no further transition is possible
    pub fn is_final(self) -> bool {
        matches!(
            self,
            Self::Terminal | Self::TimedOut | Self::Cancelled | Self::FetchFailed
        )
    }

    /// Check if moving to `next` is a legal transition
    pub fn can_transition_to(self, next: WatchPhase) -> bool {
        match self {
            Self::Polling => matches!(
                next,
                Self::Waiting | Self::Terminal | Self::TimedOut | Self::Cancelled | Self::FetchFailed
            ),
            Self::Waiting => matches!(next, Self::Polling | Self::TimedOut | Self::Cancelled),
            _ => false,
        }
    }
}

impl fmt::Display for WatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Polling => "polling",
            Self::Waiting => "waiting",
            Self::Terminal => "terminal",
            Self::TimedOut => "timed_out",
            Self::Cancelled => "cancelled",
            Self::FetchFailed => "fetch_failed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Status Traits
// ============================================================================

/// A status enum that knows which of its values are final
pub trait TerminalStatus {
    fn is_terminal(&self) -> bool;
}

/// Fetches the current status of one job
#[async_trait]
pub trait StatusFetcher<S>: Send {
    async fn fetch_status(&mut self) -> Result<S>;
}

#[async_trait]
impl<S, F, Fut> StatusFetcher<S> for F
where
    S: Send + 'static,
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<S>> + Send + 'static,
{
    async fn fetch_status(&mut self) -> Result<S> {
        (self)().await
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Create a connected cancel handle and signal
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx: Some(rx) })
}

/// Requests cancellation of every watch holding the paired signal
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Request cancellation
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observed by a watcher at every wait point
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that never fires
    pub fn never() -> Self {
        Self { rx: None }
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolve once cancellation is requested
    ///
    /// Pends forever if the handle is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        let Some(rx) = self.rx.as_mut() else {
            return std::future::pending().await;
        };

        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return std::future::pending().await;
            }
        }
    }
}

// ============================================================================
// Watch Error
// ============================================================================

/// Why a watch ended without a terminal status
#[derive(Error, Debug)]
pub enum WatchError<S> {
    #[error("still {last_status:?} after {elapsed:?} (limit {max_total_wait:?})")]
    TimedOut {
        /// Last non-terminal status observed
        last_status: S,
        elapsed: Duration,
        max_total_wait: Duration,
    },

    #[error("watch cancelled")]
    Cancelled {
        /// Last status observed before cancellation, if any poll happened
        last_status: Option<S>,
    },

    #[error("status fetch failed: {0}")]
    StatusFetch(#[source] Error),
}

impl<S> WatchError<S> {
    /// Phase the watch ended in
    pub fn phase(&self) -> WatchPhase {
        match self {
            Self::TimedOut { .. } => WatchPhase::TimedOut,
            Self::Cancelled { .. } => WatchPhase::Cancelled,
            Self::StatusFetch(_) => WatchPhase::FetchFailed,
        }
    }

    /// Last status observed, if any
    pub fn last_status(&self) -> Option<&S> {
        match self {
            Self::TimedOut { last_status, .. } => Some(last_status),
            Self::Cancelled { last_status } => last_status.as_ref(),
            Self::StatusFetch(_) => None,
        }
    }
}

impl<S: fmt::Display> From<WatchError<S>> for Error {
    fn from(err: WatchError<S>) -> Self {
        match err {
            WatchError::TimedOut {
                last_status,
                elapsed,
                ..
            } => Error::Timeout {
                elapsed_ms: elapsed.as_millis() as u64,
                last_status: last_status.to_string(),
            },
            WatchError::Cancelled { last_status } => Error::Cancelled {
                last_status: last_status.map(|s| s.to_string()),
            },
            WatchError::StatusFetch(source) => Error::status_fetch(source),
        }
    }
}
