//! Cursor paginator
//!
//! Turns a token-based "fetch next page" primitive into a single lazy
//! sequence of items. Pages are fetched one at a time, only when the
//! consumer asks for an item and the current page is used up.

use super::types::{Page, PageFetcher, PaginationState, RetryPolicy};
use crate::error::{Error, Result};
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Drives a [`PageFetcher`] until the listing is exhausted
///
/// Throttled fetches (`Error::RateLimited`) are retried according to the
/// [`RetryPolicy`]; every other error ends the iteration immediately.
pub struct CursorPaginator<T, F> {
    fetcher: F,
    retry: RetryPolicy,
    max_pages: Option<u64>,
    state: PaginationState,
    buffer: VecDeque<T>,
    _item: PhantomData<fn() -> T>,
}

impl<T, F> CursorPaginator<T, F>
where
    F: PageFetcher<T>,
{
    /// Create a new paginator with the default retry policy
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            retry: RetryPolicy::default(),
            max_pages: None,
            state: PaginationState::new(),
            buffer: VecDeque::new(),
            _item: PhantomData,
        }
    }

    /// Set the rate-limit retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fail instead of fetching more than `max_pages` pages
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u64) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Current iteration state
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Pull the next item, fetching a page only when the buffer is empty
    ///
    /// Returns `Ok(None)` once the listing is exhausted or after a failure.
    pub async fn next_item(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                self.state.items_yielded += 1;
                return Ok(Some(item));
            }

            match self.fetch_next().await? {
                Some(items) => self.buffer.extend(items),
                None => return Ok(None),
            }
        }
    }

    /// Pull the next whole page
    ///
    /// Items still buffered from a partially consumed page are returned first.
    /// Sparse pages are returned as empty vectors rather than skipped.
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>> {
        if !self.buffer.is_empty() {
            let items: Vec<T> = self.buffer.drain(..).collect();
            self.state.items_yielded += items.len() as u64;
            return Ok(Some(items));
        }

        let page = self.fetch_next().await?;
        if let Some(items) = &page {
            self.state.items_yielded += items.len() as u64;
        }
        Ok(page)
    }

    /// Consume the whole listing
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut all = Vec::new();
        while let Some(item) = self.next_item().await? {
            all.push(item);
        }
        Ok(all)
    }

    /// Convert into a lazy stream of items
    ///
    /// The stream ends after yielding the first error. Dropping it stops all
    /// fetching; nothing is fetched ahead of demand.
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> {
        stream::unfold(Some(self), |paginator| async move {
            let mut paginator = paginator?;
            match paginator.next_item().await {
                Ok(Some(item)) => Some((Ok(item), Some(paginator))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    /// Fetch one page and advance the cursor; `None` once inactive
    async fn fetch_next(&mut self) -> Result<Option<Vec<T>>> {
        if !self.state.is_active() {
            return Ok(None);
        }

        if self.state.is_stalled() {
            self.state.mark_failed();
            return Err(Error::CursorStalled {
                token: self.state.token.clone().unwrap_or_default(),
            });
        }

        if let Some(max_pages) = self.max_pages {
            if self.state.pages_fetched >= max_pages {
                self.state.mark_failed();
                return Err(Error::PageLimitExceeded { max_pages });
            }
        }

        let page = match self.fetch_with_retry().await {
            Ok(page) => page,
            Err(e) => {
                self.state.mark_failed();
                return Err(e);
            }
        };

        self.state.advance(page.continuation_token);
        debug!(
            "Fetched page {} with {} items (more: {})",
            self.state.pages_fetched,
            page.items.len(),
            self.state.is_active()
        );

        Ok(Some(page.items))
    }

    async fn fetch_with_retry(&mut self) -> Result<Page<T>> {
        let mut attempt = 0;

        loop {
            let token = self.state.token.clone();
            match self.fetcher.fetch_page(token).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_rate_limited() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt, e.retry_after());
                    warn!(
                        "Rate limited on page {}, attempt {}/{}, retrying in {:?}",
                        self.state.pages_fetched + 1,
                        attempt + 1,
                        self.retry.max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<T, F> std::fmt::Debug for CursorPaginator<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorPaginator")
            .field("retry", &self.retry)
            .field("max_pages", &self.max_pages)
            .field("state", &self.state)
            .field("buffered", &self.buffer.len())
            .finish_non_exhaustive()
    }
}
