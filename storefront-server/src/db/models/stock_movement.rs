//! Stock Movement Model
//!
//! Append-only ledger entry. A movement is never mutated after creation
//! except for the one-way PENDING -> CONFIRMED / PENDING -> RETURNED
//! status transition, which also stamps `resolvedAt`.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Movement direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// Stock addition (initial stock, restock). Never status-gated.
    In,
    /// Reservation / consumption. Gated by [`MovementStatus`].
    Out,
}

/// Lifecycle of an OUT movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementStatus {
    /// Reserved but unconfirmed - counts against availability
    Pending,
    /// Consumed - counts against availability
    Confirmed,
    /// Released back to the available pool
    Returned,
}

/// Immutable ledger entry
///
/// Persisted field names are camelCase: they are a contract for
/// clients reading the collection directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Record id string of the product ("product:xyz")
    pub product_id: String,
    pub kind: MovementKind,
    pub quantity: i64,
    #[serde(default)]
    pub note: Option<String>,
    /// Absent for IN movements
    #[serde(default)]
    pub status: Option<MovementStatus>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl StockMovement {
    /// Record id as a "stock_movement:key" string, empty when unsaved
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Whether this entry counts against derived availability
    pub fn counts_against_stock(&self) -> bool {
        self.kind == MovementKind::Out && self.status != Some(MovementStatus::Returned)
    }
}
