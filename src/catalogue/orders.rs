//! Orders: the order listing operation and its payload

use super::errors::{check_errors, ApiError};
use crate::error::Result;
use crate::pagination::{Page, Paginated};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Placed but not yet available for shipment (preorders)
    PendingAvailability,
    /// Placed but payment has not been authorized
    Pending,
    Unshipped,
    PartiallyShipped,
    Shipped,
    /// Shipped, but the seller has not confirmed the invoice
    InvoiceUnconfirmed,
    Canceled,
    /// Cannot be fulfilled (multi-channel orders only)
    Unfulfillable,
}

/// Whether the order is fulfilled by the marketplace or by the seller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FulfillmentChannel {
    /// Fulfilled by the marketplace
    AFN,
    /// Fulfilled by the seller
    MFN,
}

/// A monetary amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Money {
    /// ISO 4217 currency code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    /// Decimal amount, kept as the string the API sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// An order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    pub amazon_order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_order_id: Option<String>,
    pub purchase_date: DateTime<Utc>,
    pub last_update_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment_channel: Option<FulfillmentChannel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_total: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_items_shipped: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_items_unshipped: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_prime: Option<bool>,
}

/// One page of orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrdersList {
    pub orders: Vec<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_before: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
}

/// Response of the list-orders operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetOrdersResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<OrdersList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ApiError>>,
}

impl Paginated for GetOrdersResponse {
    type Item = Order;

    fn into_page(self) -> Result<Page<Order>> {
        check_errors(self.errors)?;
        Ok(match self.payload {
            Some(list) => Page::new(list.orders, list.next_token),
            None => Page::last(Vec::new()),
        })
    }
}
