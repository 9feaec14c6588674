//! Inventory: fulfillment inventory summaries

use super::errors::{check_errors, ApiError};
use crate::error::Result;
use crate::pagination::{Page, Paginated};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Granularity of the returned summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Granularity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity_id: Option<String>,
}

/// Inventory summary for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fn_sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_quantity: Option<i32>,
}

/// Payload of the inventory summaries operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetInventorySummariesResult {
    pub granularity: Granularity,
    pub inventory_summaries: Vec<InventorySummary>,
}

/// Continuation block of the inventory summaries operation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Response of the inventory summaries operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetInventorySummariesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<GetInventorySummariesResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ApiError>>,
}

impl Paginated for GetInventorySummariesResponse {
    type Item = InventorySummary;

    fn into_page(self) -> Result<Page<InventorySummary>> {
        check_errors(self.errors)?;
        let items = self
            .payload
            .map(|p| p.inventory_summaries)
            .unwrap_or_default();
        let token = self.pagination.and_then(|p| p.next_token);
        Ok(Page::new(items, token))
    }
}
