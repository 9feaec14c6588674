//! Feeds: submitted documents processed asynchronously

use crate::error::Result;
use crate::pagination::{Page, Paginated};
use crate::watcher::TerminalStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing status of a feed or report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    /// Processing was cancelled before it completed
    Cancelled,
    /// Processing completed
    Done,
    /// Processing aborted due to a fatal error
    Fatal,
    /// Processing is under way
    InProgress,
    /// Waiting to be processed
    InQueue,
}

impl ProcessingStatus {
    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cancelled => "CANCELLED",
            Self::Done => "DONE",
            Self::Fatal => "FATAL",
            Self::InProgress => "IN_PROGRESS",
            Self::InQueue => "IN_QUEUE",
        }
    }
}

impl TerminalStatus for ProcessingStatus {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::Fatal)
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feed submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub feed_id: String,
    pub feed_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace_ids: Option<Vec<String>>,
    pub created_time: DateTime<Utc>,
    pub processing_status: ProcessingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_end_time: Option<DateTime<Utc>>,
    /// Present once processing is done and a result document exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_feed_document_id: Option<String>,
}

/// Response of the list-feeds operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFeedsResponse {
    pub feeds: Vec<Feed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl Paginated for GetFeedsResponse {
    type Item = Feed;

    fn into_page(self) -> Result<Page<Feed>> {
        Ok(Page::new(self.feeds, self.next_token))
    }
}

/// Response of the create-feed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedResponse {
    pub feed_id: String,
}
