//! Cart Entry Model
//!
//! One document per (userId, productId) pair; quantity accumulates on
//! repeated adds. Pure CRUD, not part of the stock core.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// Payload for adding to the cart
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAdd {
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
}
