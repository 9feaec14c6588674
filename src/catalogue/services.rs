//! Service jobs: on-site services attached to orders

use super::errors::{check_errors, ApiError};
use crate::error::{Error, Result};
use crate::pagination::{Page, Paginated};
use crate::watcher::TerminalStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a service job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceJobStatus {
    NotServiced,
    Cancelled,
    Completed,
    PendingSchedule,
    NotFulfillable,
    Hold,
    PaymentDeclined,
}

impl ServiceJobStatus {
    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotServiced => "NOT_SERVICED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
            Self::PendingSchedule => "PENDING_SCHEDULE",
            Self::NotFulfillable => "NOT_FULFILLABLE",
            Self::Hold => "HOLD",
            Self::PaymentDeclined => "PAYMENT_DECLINED",
        }
    }
}

// A declined payment can still be retried by the buyer, so it is not final.
impl TerminalStatus for ServiceJobStatus {
    fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Cancelled | Self::NotServiced | Self::NotFulfillable
        )
    }
}

impl fmt::Display for ServiceJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceJob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_job_status: Option<ServiceJobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

/// One page of service jobs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_result_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<ServiceJob>>,
}

/// Response of the list-service-jobs operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetServiceJobsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<JobListing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ApiError>>,
}

impl Paginated for GetServiceJobsResponse {
    type Item = ServiceJob;

    fn into_page(self) -> Result<Page<ServiceJob>> {
        check_errors(self.errors)?;
        let listing = self.payload.unwrap_or_default();
        Ok(Page::new(
            listing.jobs.unwrap_or_default(),
            listing.next_page_token,
        ))
    }
}

/// Response of the get-service-job operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetServiceJobByServiceJobIdResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ServiceJob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ApiError>>,
}

impl GetServiceJobByServiceJobIdResponse {
    /// Extract the job status, surfacing API errors unchanged
    pub fn into_status(self) -> Result<ServiceJobStatus> {
        check_errors(self.errors)?;
        self.payload
            .and_then(|job| job.service_job_status)
            .ok_or_else(|| Error::Other("service job response carries no status".to_string()))
    }
}
