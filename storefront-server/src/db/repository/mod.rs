//! Repository Module
//!
//! Provides CRUD operations for the SurrealDB collections.

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod stock_movement;

// Re-exports
pub use cart::CartRepository;
pub use category::CategoryRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use stock_movement::StockMovementRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings everywhere above the repository layer
// =============================================================================
//
// API payloads and persisted references carry record ids as strings.
// Repositories accept either the full "table:id" form or the bare key
// and normalize through the helpers below.

/// Strip the "table:" prefix from an id if present
pub fn record_key<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

/// Build a RecordId from a possibly-prefixed id string
pub fn record_id(table: &str, id: &str) -> RecordId {
    RecordId::from_table_key(table, record_key(table, id))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_strips_known_prefix_only() {
        assert_eq!(record_key("product", "product:abc"), "abc");
        assert_eq!(record_key("product", "abc"), "abc");
        assert_eq!(record_key("product", "category:abc"), "category:abc");
    }
}
