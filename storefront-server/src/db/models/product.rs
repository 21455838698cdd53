//! Product Model
//!
//! Catalog entity. Stock is never stored here - it is always derived
//! from the movement ledger.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product model
///
/// Persisted field names are camelCase: they are a contract for
/// clients reading the collection directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub price: f64,
    /// Record id string of the owning category ("category:xyz")
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Payload for product creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub image: Option<String>,
    pub description: Option<String>,
    /// Optional opening stock, recorded as an IN movement on creation
    pub initial_stock: Option<i64>,
}

/// Product enriched with its derived available quantity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithStock {
    #[serde(flatten)]
    pub product: Product,
    pub available: i64,
}
