//! Job watcher module
//!
//! Waits for asynchronously processed resources (feeds, reports, service
//! jobs) to reach a terminal processing status.
//!
//! # Overview
//!
//! A caller supplies a [`StatusFetcher`] and either relies on the status
//! type's [`TerminalStatus`] classification or passes its own predicate.
//! [`JobWatcher`] polls with capped exponential backoff, bounded by a total
//! wait budget, and observes an optional [`CancelSignal`] at every wait point.
//! The watcher never interrupts an in-flight status fetch.

mod job;
mod types;

pub use job::{JobWatcher, WatchResult};
pub use types::{
    cancel_pair, CancelHandle, CancelSignal, PollDelays, PollingPolicy, StatusFetcher,
    TerminalStatus, WatchError, WatchPhase,
};

#[cfg(test)]
mod tests;
