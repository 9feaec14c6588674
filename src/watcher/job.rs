//! Job watcher
//!
//! Polls a status-bearing resource until it reaches a terminal state, the
//! total wait budget runs out, or the caller cancels.

use super::types::{
    CancelSignal, PollingPolicy, StatusFetcher, TerminalStatus, WatchError, WatchPhase,
};
use std::fmt;
use tokio::time::Instant;
use tracing::debug;

/// Outcome of [`JobWatcher::wait`]
pub type WatchResult<S> = std::result::Result<S, WatchError<S>>;

/// Waits for asynchronous jobs (feeds, reports, service jobs) to finish
///
/// One watcher can be reused for any number of sequential or concurrent
/// waits; each call owns its own poll loop.
#[derive(Debug, Clone)]
pub struct JobWatcher {
    policy: PollingPolicy,
    cancel: CancelSignal,
}

impl JobWatcher {
    /// Create a watcher that can only end by terminal status, timeout or fetch error
    pub fn new(policy: PollingPolicy) -> Self {
        Self {
            policy,
            cancel: CancelSignal::never(),
        }
    }

    /// Observe a cancellation signal at every wait point
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn policy(&self) -> &PollingPolicy {
        &self.policy
    }

    /// Wait for a status of a type that classifies itself
    pub async fn wait_until_terminal<S, F>(&self, fetcher: F) -> WatchResult<S>
    where
        S: TerminalStatus + fmt::Debug,
        F: StatusFetcher<S>,
    {
        self.wait(fetcher, S::is_terminal).await
    }

    /// Poll until `is_terminal` accepts a status
    ///
    /// The first poll happens immediately. Between polls the watcher sleeps
    /// the next scheduled delay, shortened so it never sleeps past
    /// `max_total_wait`. Once the budget is spent the watch fails with the
    /// last non-terminal status and no further poll is made.
    pub async fn wait<S, F, P>(&self, mut fetcher: F, is_terminal: P) -> WatchResult<S>
    where
        S: fmt::Debug,
        F: StatusFetcher<S>,
        P: Fn(&S) -> bool,
    {
        let started = Instant::now();
        let max_total_wait = self.policy.max_total_wait();
        let mut cancel = self.cancel.clone();
        let mut delays = self.policy.delays();
        let mut phase = WatchPhase::Polling;
        let mut last_status: Option<S> = None;
        let mut polls: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                transition(&mut phase, WatchPhase::Cancelled);
                return Err(WatchError::Cancelled { last_status });
            }

            let status = match fetcher.fetch_status().await {
                Ok(status) => status,
                Err(e) => {
                    transition(&mut phase, WatchPhase::FetchFailed);
                    return Err(WatchError::StatusFetch(e));
                }
            };
            polls += 1;

            if is_terminal(&status) {
                transition(&mut phase, WatchPhase::Terminal);
                debug!(
                    "Job reached {:?} after {} polls in {:?}",
                    status,
                    polls,
                    started.elapsed()
                );
                return Ok(status);
            }

            let elapsed = started.elapsed();
            let remaining = max_total_wait.saturating_sub(elapsed);
            if remaining.is_zero() {
                transition(&mut phase, WatchPhase::TimedOut);
                return Err(WatchError::TimedOut {
                    last_status: status,
                    elapsed,
                    max_total_wait,
                });
            }

            let delay = delays.next().unwrap_or(remaining).min(remaining);
            debug!("Job is {:?} (poll {}), next poll in {:?}", status, polls, delay);
            transition(&mut phase, WatchPhase::Waiting);

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = cancel.cancelled() => {
                    transition(&mut phase, WatchPhase::Cancelled);
                    return Err(WatchError::Cancelled { last_status: Some(status) });
                }
            }

            // Sleeping can overshoot the deadline on a real clock
            let elapsed = started.elapsed();
            if elapsed > max_total_wait {
                transition(&mut phase, WatchPhase::TimedOut);
                return Err(WatchError::TimedOut {
                    last_status: status,
                    elapsed,
                    max_total_wait,
                });
            }

            last_status = Some(status);
            transition(&mut phase, WatchPhase::Polling);
        }
    }
}

fn transition(phase: &mut WatchPhase, next: WatchPhase) {
    debug_assert!(
        phase.can_transition_to(next),
        "illegal watch transition {phase} -> {next}"
    );
    *phase = next;
}
