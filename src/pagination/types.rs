//! Pagination types and traits
//!
//! Defines the page shape, the per-iteration state, the retry policy for
//! throttled fetches, and the fetcher seam callers plug their transport into.

use crate::error::Result;
use crate::types::{BackoffType, OptionStringExt};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// One fetched batch of items
///
/// A missing continuation token means the listing is exhausted. An empty
/// token is normalized to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in this page, in server order
    pub items: Vec<T>,
    /// Opaque token to pass back for the next page
    pub continuation_token: Option<String>,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, continuation_token: Option<String>) -> Self {
        Self {
            items,
            continuation_token: continuation_token.none_if_empty(),
        }
    }

    /// Create a page followed by another one
    pub fn more(items: Vec<T>, token: impl Into<String>) -> Self {
        Self::new(items, Some(token.into()))
    }

    /// Create the final page
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            continuation_token: None,
        }
    }

    /// Check if this is the final page
    pub fn is_last(&self) -> bool {
        self.continuation_token.is_none()
    }
}

/// A list response that can be viewed as a [`Page`]
///
/// Implementations surface API business errors found in the body as
/// [`Error::Api`](crate::Error::Api) instead of an empty page.
pub trait Paginated {
    /// Element type of the listing
    type Item;

    /// Convert the response into a page
    fn into_page(self) -> Result<Page<Self::Item>>;
}

/// Where an iteration stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationPhase {
    /// More fetches are legal
    #[default]
    Active,
    /// The last page has been fetched
    Exhausted,
    /// A fetch failed; no further fetches happen
    Failed,
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Token for the next fetch (`None` before the first fetch)
    pub token: Option<String>,
    /// Token used for the most recent fetch
    pub previous_token: Option<String>,
    /// Pages fetched so far
    pub pages_fetched: u64,
    /// Items handed to the consumer so far
    pub items_yielded: u64,
    /// Current phase
    pub phase: PaginationPhase,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if another fetch is legal
    pub fn is_active(&self) -> bool {
        self.phase == PaginationPhase::Active
    }

    /// Check if the listing was fully consumed
    pub fn is_exhausted(&self) -> bool {
        self.phase == PaginationPhase::Exhausted
    }

    /// Check if iteration ended with an error
    pub fn is_failed(&self) -> bool {
        self.phase == PaginationPhase::Failed
    }

    /// Record a fetched page's continuation token
    pub fn advance(&mut self, next_token: Option<String>) {
        self.pages_fetched += 1;
        self.previous_token = self.token.take();
        match next_token {
            Some(token) => self.token = Some(token),
            None => self.phase = PaginationPhase::Exhausted,
        }
    }

    /// True when the next fetch would reuse the token just used
    pub fn is_stalled(&self) -> bool {
        self.token.is_some() && self.token == self.previous_token
    }

    /// Mark iteration as failed
    pub fn mark_failed(&mut self) {
        self.phase = PaginationPhase::Failed;
    }
}

/// Bounded backoff for throttled page fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; a page costs at most `max_retries + 1` calls
    pub max_retries: u32,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Upper bound for any single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_type: BackoffType::Exponential,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Create an exponential policy
    pub fn new(max_retries: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff_type: BackoffType::Exponential,
            initial_backoff,
            max_backoff,
        }
    }

    /// Never retry
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Set backoff type
    #[must_use]
    pub fn with_backoff_type(mut self, backoff_type: BackoffType) -> Self {
        self.backoff_type = backoff_type;
        self
    }

    /// Delay before retry number `attempt` (zero-based)
    ///
    /// A server hint wins over the computed delay; both are capped at `max_backoff`.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(hint) => hint.min(self.max_backoff),
            None => self
                .backoff_type
                .delay(attempt, self.initial_backoff, self.max_backoff),
        }
    }
}

/// Fetches one page given the continuation token (`None` for the first page)
///
/// This is the seam to the caller's transport. Throttling must be reported
/// as [`Error::RateLimited`](crate::Error::RateLimited) to be retried.
#[async_trait]
pub trait PageFetcher<T>: Send {
    async fn fetch_page(&mut self, token: Option<String>) -> Result<Page<T>>;
}

#[async_trait]
impl<T, F, Fut> PageFetcher<T> for F
where
    T: Send + 'static,
    F: FnMut(Option<String>) -> Fut + Send,
    Fut: Future<Output = Result<Page<T>>> + Send + 'static,
{
    async fn fetch_page(&mut self, token: Option<String>) -> Result<Page<T>> {
        (self)(token).await
    }
}
