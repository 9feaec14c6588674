//! Pagination module
//!
//! Cursor-based iteration over token-paginated list operations.
//!
//! # Overview
//!
//! A caller supplies a [`PageFetcher`] (usually a closure over their HTTP
//! adapter). [`CursorPaginator`] hides the continuation-token bookkeeping and
//! exposes the listing as a lazy, forward-only sequence of items, retrying
//! throttled fetches with bounded backoff.
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use marketplace_kit::pagination::{CursorPaginator, Page};
//!
//! let paginator = CursorPaginator::new(|token: Option<String>| async move {
//!     let response = adapter.list_orders(token).await?;
//!     response.into_page()
//! });
//! let mut orders = Box::pin(paginator.into_stream());
//! while let Some(order) = orders.next().await {
//!     let order = order?;
//! }
//! ```

mod cursor;
mod types;

pub use cursor::CursorPaginator;
pub use types::{
    Page, PageFetcher, Paginated, PaginationPhase, PaginationState, RetryPolicy,
};
