//! Tests for the job watcher module

use super::*;
use crate::catalogue::{ProcessingStatus, ServiceJobStatus};
use crate::error::{Error, Result};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn policy(initial: u64, max: u64, multiplier: f64, total: u64) -> PollingPolicy {
    PollingPolicy::new(secs(initial), secs(max), multiplier, secs(total)).unwrap()
}

/// Returns scripted statuses, repeating the last one forever
#[derive(Clone)]
struct ScriptedStatus {
    script: Arc<Mutex<VecDeque<Result<ProcessingStatus>>>>,
    repeat: ProcessingStatus,
    polls: Arc<AtomicUsize>,
}

impl ScriptedStatus {
    fn new(script: Vec<Result<ProcessingStatus>>, repeat: ProcessingStatus) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            repeat,
            polls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn always(status: ProcessingStatus) -> Self {
        Self::new(Vec::new(), status)
    }

    fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusFetcher<ProcessingStatus> for ScriptedStatus {
    async fn fetch_status(&mut self) -> Result<ProcessingStatus> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or(Ok(self.repeat))
    }
}

// ============================================================================
// Policy Tests
// ============================================================================

#[test]
fn test_policy_rejects_invalid_values() {
    assert!(PollingPolicy::new(Duration::ZERO, secs(8), 2.0, secs(20)).is_err());
    assert!(PollingPolicy::new(secs(10), secs(8), 2.0, secs(20)).is_err());
    assert!(PollingPolicy::new(secs(1), secs(8), 0.5, secs(20)).is_err());
    assert!(PollingPolicy::new(secs(1), secs(8), f64::NAN, secs(20)).is_err());
    assert!(PollingPolicy::new(secs(1), secs(8), 2.0, Duration::ZERO).is_err());

    let err = PollingPolicy::new(secs(1), secs(8), 0.5, secs(20)).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "backoff_multiplier"));
}

#[test]
fn test_policy_delays_double_up_to_cap() {
    let delays: Vec<Duration> = policy(1, 8, 2.0, 20).delays().take(7).collect();
    assert_eq!(
        delays,
        vec![secs(1), secs(2), secs(4), secs(8), secs(8), secs(8), secs(8)]
    );
}

#[test]
fn test_policy_constant_delays() {
    let delays: Vec<Duration> = policy(3, 3, 1.0, 20).delays().take(3).collect();
    assert_eq!(delays, vec![secs(3), secs(3), secs(3)]);
}

#[test]
fn test_policy_schedule_clamps_last_wait() {
    assert_eq!(
        policy(1, 8, 2.0, 20).schedule(),
        vec![secs(1), secs(2), secs(4), secs(8), secs(5)]
    );
}

#[test]
fn test_policy_huge_multiplier_saturates_at_cap() {
    let delays: Vec<Duration> = policy(1, 60, 1e300, 600).delays().take(3).collect();
    assert_eq!(delays, vec![secs(1), secs(60), secs(60)]);
}

// ============================================================================
// Phase Tests
// ============================================================================

#[test]
fn test_final_phases_never_reenter_polling() {
    for phase in [
        WatchPhase::Terminal,
        WatchPhase::TimedOut,
        WatchPhase::Cancelled,
        WatchPhase::FetchFailed,
    ] {
        assert!(phase.is_final());
        assert!(!phase.can_transition_to(WatchPhase::Polling));
        assert!(!phase.can_transition_to(WatchPhase::Waiting));
    }
}

#[test]
fn test_loop_transitions() {
    assert!(WatchPhase::Polling.can_transition_to(WatchPhase::Waiting));
    assert!(WatchPhase::Waiting.can_transition_to(WatchPhase::Polling));
    assert!(WatchPhase::Polling.can_transition_to(WatchPhase::Terminal));
    assert!(!WatchPhase::Waiting.can_transition_to(WatchPhase::Terminal));
    assert!(!WatchPhase::Waiting.can_transition_to(WatchPhase::FetchFailed));
    assert!(!WatchPhase::Polling.is_final());
}

// ============================================================================
// Status Classification Tests
// ============================================================================

#[test]
fn test_processing_status_terminal() {
    assert!(ProcessingStatus::Done.is_terminal());
    assert!(ProcessingStatus::Cancelled.is_terminal());
    assert!(ProcessingStatus::Fatal.is_terminal());
    assert!(!ProcessingStatus::InQueue.is_terminal());
    assert!(!ProcessingStatus::InProgress.is_terminal());
}

#[test]
fn test_service_job_status_terminal() {
    assert!(ServiceJobStatus::Completed.is_terminal());
    assert!(ServiceJobStatus::NotFulfillable.is_terminal());
    assert!(!ServiceJobStatus::PendingSchedule.is_terminal());
    assert!(!ServiceJobStatus::Hold.is_terminal());
    assert!(!ServiceJobStatus::PaymentDeclined.is_terminal());
}

// ============================================================================
// Watcher Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_polls_until_done() {
    let fetcher = ScriptedStatus::new(
        vec![
            Ok(ProcessingStatus::InQueue),
            Ok(ProcessingStatus::InProgress),
            Ok(ProcessingStatus::Done),
        ],
        ProcessingStatus::Done,
    );
    let watcher = JobWatcher::new(policy(1, 8, 2.0, 60));

    let status = watcher
        .wait(fetcher.clone(), |s: &ProcessingStatus| *s == ProcessingStatus::Done)
        .await
        .unwrap();

    assert_eq!(status, ProcessingStatus::Done);
    assert_eq!(fetcher.polls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_first_poll_is_immediate() {
    let fetcher = ScriptedStatus::always(ProcessingStatus::Fatal);
    let watcher = JobWatcher::new(policy(5, 5, 1.0, 60));
    let start = Instant::now();

    let status = watcher.wait_until_terminal(fetcher.clone()).await.unwrap();

    assert_eq!(status, ProcessingStatus::Fatal);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(fetcher.polls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_waits_follow_backoff_schedule() {
    let fetcher = ScriptedStatus::new(
        vec![
            Ok(ProcessingStatus::InQueue),
            Ok(ProcessingStatus::InProgress),
            Ok(ProcessingStatus::InProgress),
            Ok(ProcessingStatus::InProgress),
        ],
        ProcessingStatus::Done,
    );
    let watcher = JobWatcher::new(policy(1, 8, 2.0, 60));
    let start = Instant::now();

    watcher.wait_until_terminal(fetcher.clone()).await.unwrap();

    // 1 + 2 + 4 + 8
    assert_eq!(start.elapsed(), secs(15));
    assert_eq!(fetcher.polls(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_never_terminal_times_out_at_deadline() {
    let fetcher = ScriptedStatus::always(ProcessingStatus::InProgress);
    let watcher = JobWatcher::new(policy(1, 8, 2.0, 20));
    let start = Instant::now();

    let err = watcher.wait_until_terminal(fetcher.clone()).await.unwrap_err();

    assert!(start.elapsed() <= secs(20));
    assert_eq!(err.phase(), WatchPhase::TimedOut);
    match err {
        WatchError::TimedOut {
            last_status,
            elapsed,
            max_total_wait,
        } => {
            assert_eq!(last_status, ProcessingStatus::InProgress);
            assert_eq!(elapsed, secs(20));
            assert_eq!(max_total_wait, secs(20));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    // Polls at 0, 1, 3, 7, 15 and 20 seconds
    assert_eq!(fetcher.polls(), 6);

    // Nothing polls after the watch ended
    tokio::time::sleep(secs(60)).await;
    assert_eq!(fetcher.polls(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_error_surfaces_immediately() {
    let fetcher = ScriptedStatus::new(
        vec![
            Ok(ProcessingStatus::InQueue),
            Err(Error::http_status(500, "boom")),
        ],
        ProcessingStatus::Done,
    );
    let watcher = JobWatcher::new(policy(1, 8, 2.0, 60));

    let err = watcher.wait_until_terminal(fetcher.clone()).await.unwrap_err();

    assert!(matches!(err, WatchError::StatusFetch(Error::HttpStatus { status: 500, .. })));
    assert!(err.last_status().is_none());
    assert_eq!(fetcher.polls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_wait_returns_immediately() {
    let fetcher = ScriptedStatus::always(ProcessingStatus::InProgress);
    let (handle, signal) = cancel_pair();
    let watcher = JobWatcher::new(policy(1, 8, 2.0, 600)).with_cancel(signal);
    let start = Instant::now();

    let (result, ()) = tokio::join!(watcher.wait_until_terminal(fetcher.clone()), async {
        // Polls happen at 0s and 1s; the second wait runs until 3s
        tokio::time::sleep(Duration::from_millis(1500)).await;
        handle.cancel();
    });

    let err = result.unwrap_err();
    assert_eq!(start.elapsed(), Duration::from_millis(1500));
    assert!(matches!(
        err,
        WatchError::Cancelled {
            last_status: Some(ProcessingStatus::InProgress)
        }
    ));
    assert_eq!(fetcher.polls(), 2);

    tokio::time::sleep(secs(60)).await;
    assert_eq!(fetcher.polls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_first_poll() {
    let fetcher = ScriptedStatus::always(ProcessingStatus::InProgress);
    let (handle, signal) = cancel_pair();
    handle.cancel();
    let watcher = JobWatcher::new(policy(1, 8, 2.0, 60)).with_cancel(signal);

    let err = watcher.wait_until_terminal(fetcher.clone()).await.unwrap_err();

    assert!(matches!(err, WatchError::Cancelled { last_status: None }));
    assert_eq!(fetcher.polls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_handle_never_cancels() {
    let fetcher = ScriptedStatus::new(
        vec![Ok(ProcessingStatus::InQueue)],
        ProcessingStatus::Done,
    );
    let (handle, signal) = cancel_pair();
    drop(handle);
    let watcher = JobWatcher::new(policy(1, 8, 2.0, 60)).with_cancel(signal);

    let status = watcher.wait_until_terminal(fetcher).await.unwrap();
    assert_eq!(status, ProcessingStatus::Done);
}

#[tokio::test(start_paused = true)]
async fn test_closure_fetcher_and_custom_predicate() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let watcher = JobWatcher::new(policy(1, 1, 1.0, 60));

    let status = watcher
        .wait(
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    Ok::<_, Error>(if n < 2 {
                        ServiceJobStatus::PendingSchedule
                    } else {
                        ServiceJobStatus::Hold
                    })
                }
            },
            |s: &ServiceJobStatus| *s == ServiceJobStatus::Hold,
        )
        .await
        .unwrap();

    assert_eq!(status, ServiceJobStatus::Hold);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_independent_watches_run_concurrently() {
    let watcher = JobWatcher::new(policy(1, 1, 1.0, 60));
    let feed = ScriptedStatus::new(
        vec![Ok(ProcessingStatus::InQueue), Ok(ProcessingStatus::InProgress)],
        ProcessingStatus::Done,
    );
    let report = ScriptedStatus::always(ProcessingStatus::Cancelled);

    let (a, b) = tokio::join!(
        watcher.wait_until_terminal(feed.clone()),
        watcher.wait_until_terminal(report.clone())
    );

    assert_eq!(a.unwrap(), ProcessingStatus::Done);
    assert_eq!(b.unwrap(), ProcessingStatus::Cancelled);
    assert_eq!(feed.polls(), 3);
    assert_eq!(report.polls(), 1);
}

#[test]
fn test_watch_error_into_crate_error() {
    let err: Error = WatchError::TimedOut {
        last_status: ProcessingStatus::InProgress,
        elapsed: Duration::from_millis(20_000),
        max_total_wait: secs(20),
    }
    .into();
    assert_eq!(err.to_string(), "Job still 'IN_PROGRESS' after 20000ms");

    let err: Error = WatchError::Cancelled {
        last_status: Some(ProcessingStatus::InQueue),
    }
    .into();
    assert!(matches!(err, Error::Cancelled { last_status: Some(ref s) } if s == "IN_QUEUE"));

    let err: Error = WatchError::<ProcessingStatus>::StatusFetch(Error::transport("reset")).into();
    assert!(matches!(err, Error::StatusFetch { .. }));
}
