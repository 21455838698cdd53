//! Order Model
//!
//! Created once at checkout with status PENDING. Items are immutable;
//! status is the only mutable field and transitions exactly once.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order status state machine: PENDING -> {ACCEPTED, REJECTED}, terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Order line item
///
/// `movementId` binds the line to the OUT/PENDING movement created at
/// reservation time, so confirm/release can resolve the exact movement
/// instead of guessing by product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub movement_id: Option<String>,
}

/// Order entity
///
/// Persisted field names are camelCase: they are a contract for
/// clients reading the collection directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Record id as an "orders:key" string, empty when unsaved
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}
