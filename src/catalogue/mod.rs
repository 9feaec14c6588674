//! Catalogue module
//!
//! Wire shapes of the marketplace API that the paginator and job watcher
//! consume: list responses carrying continuation tokens, and resources
//! carrying a processing status.
//!
//! # Overview
//!
//! Field names, optionality and enum values mirror the external contract
//! exactly. Closed string sets are Rust enums, so an unknown value fails at
//! deserialization instead of travelling through as a bare string.
//!
//! Every list response implements [`Paginated`](crate::pagination::Paginated),
//! and every status enum implements
//! [`TerminalStatus`](crate::watcher::TerminalStatus).

mod errors;
mod feeds;
mod inventory;
mod orders;
mod reports;
mod services;

pub use errors::{ApiError, ErrorList};
pub use feeds::{CreateFeedResponse, Feed, GetFeedsResponse, ProcessingStatus};
pub use inventory::{
    GetInventorySummariesResponse, GetInventorySummariesResult, Granularity, InventorySummary,
    Pagination,
};
pub use orders::{FulfillmentChannel, GetOrdersResponse, Money, Order, OrderStatus, OrdersList};
pub use reports::{CreateReportResponse, GetReportsResponse, Report};
pub use services::{
    GetServiceJobByServiceJobIdResponse, GetServiceJobsResponse, JobListing, ServiceJob,
    ServiceJobStatus,
};
