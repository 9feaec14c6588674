// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Marketplace Kit
//!
//! Client-side building blocks for a marketplace selling-partner API:
//! lazy cursor pagination over list endpoints and bounded polling of
//! asynchronous jobs (feeds, reports, service jobs).
//!
//! ## Features
//!
//! - **Cursor Pagination**: Forward-only, lazy, with bounded retry on throttling
//! - **Job Watching**: Backoff polling with a hard total-wait budget and cancellation
//! - **Catalogue Shapes**: Typed list, status and error bodies for the public endpoints
//! - **Response Classification**: 429 / error-list / status mapping for `reqwest`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marketplace_kit::catalogue::{GetFeedsResponse, ProcessingStatus};
//! use marketplace_kit::http::{read_json, read_page};
//! use marketplace_kit::pagination::CursorPaginator;
//! use marketplace_kit::watcher::{JobWatcher, PollingPolicy};
//!
//! let mut feeds = CursorPaginator::new(|token: Option<String>| {
//!     let request = client.get(feeds_url).query(&[("nextToken", token)]);
//!     async move { read_page::<GetFeedsResponse>(request.send().await?).await }
//! });
//! while let Some(feed) = feeds.next_item().await? {
//!     println!("{} is {}", feed.feed_id, feed.processing_status);
//! }
//!
//! let watcher = JobWatcher::new(PollingPolicy::new(
//!     Duration::from_secs(1),
//!     Duration::from_secs(30),
//!     2.0,
//!     Duration::from_secs(600),
//! )?);
//! let status: ProcessingStatus = watcher.wait_until_terminal(fetch_feed_status).await?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │        CursorPaginator       │          JobWatcher          │
//! │  next_item / next_page /     │  wait / wait_until_terminal  │
//! │  collect_all / into_stream   │  PollingPolicy · CancelSignal│
//! └──────────────┬───────────────┴───────────────┬──────────────┘
//!                │ PageFetcher                   │ StatusFetcher
//! ┌──────────────┴───────────────────────────────┴──────────────┐
//! │   http: check_response · read_page · read_json              │
//! │   catalogue: Feed · Report · Order · InventorySummary · ... │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the kit
pub mod error;

/// Common types and type aliases
pub mod types;

/// Wire shapes of the marketplace endpoints
pub mod catalogue;

/// Response classification over `reqwest`
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Asynchronous job polling
pub mod watcher;

/// Configuration loading
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, KitConfig};
pub use pagination::{CursorPaginator, Page, PageFetcher, Paginated, RetryPolicy};
pub use watcher::{JobWatcher, PollingPolicy, StatusFetcher, TerminalStatus, WatchError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
