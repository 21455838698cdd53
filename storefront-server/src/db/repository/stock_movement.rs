//! Stock Movement Repository
//!
//! Persistence for the append-only ledger. Entries are only ever
//! appended; the single permitted mutation is the conditional
//! PENDING -> resolved status transition in [`resolve_if_pending`],
//! which is a store-side conditional write.
//!
//! [`resolve_if_pending`]: StockMovementRepository::resolve_if_pending

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{MovementStatus, StockMovement};
use chrono::{DateTime, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const MOVEMENT_TABLE: &str = "stock_movement";

#[derive(Clone)]
pub struct StockMovementRepository {
    base: BaseRepository,
}

impl StockMovementRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append one ledger entry
    pub async fn create(&self, movement: StockMovement) -> RepoResult<StockMovement> {
        let created: Option<StockMovement> = self
            .base
            .db()
            .create(MOVEMENT_TABLE)
            .content(movement)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to record stock movement".to_string()))
    }

    /// Full ledger scan for one product
    pub async fn find_by_product(&self, product_id: &str) -> RepoResult<Vec<StockMovement>> {
        let movements: Vec<StockMovement> = self
            .base
            .db()
            .query("SELECT * FROM stock_movement WHERE productId = $pid")
            .bind(("pid", product_id.to_string()))
            .await?
            .take(0)?;
        Ok(movements)
    }

    /// All unresolved OUT movements for one product
    pub async fn find_pending_by_product(
        &self,
        product_id: &str,
    ) -> RepoResult<Vec<StockMovement>> {
        let movements: Vec<StockMovement> = self
            .base
            .db()
            .query(
                "SELECT * FROM stock_movement \
                 WHERE productId = $pid AND kind = 'OUT' AND status = 'PENDING'",
            )
            .bind(("pid", product_id.to_string()))
            .await?
            .take(0)?;
        Ok(movements)
    }

    /// Find movement by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<StockMovement>> {
        let rid = record_id(MOVEMENT_TABLE, id);
        let movement: Option<StockMovement> = self.base.db().select(rid).await?;
        Ok(movement)
    }

    /// Conditionally transition a movement out of PENDING.
    ///
    /// The WHERE clause makes the check-and-set atomic at the store:
    /// returns `None` when the movement is missing or not PENDING, in
    /// which case nothing was written.
    pub async fn resolve_if_pending(
        &self,
        id: &str,
        new_status: MovementStatus,
        resolved_at: DateTime<Utc>,
    ) -> RepoResult<Option<StockMovement>> {
        let rid = record_id(MOVEMENT_TABLE, id);
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET status = $status, resolvedAt = $resolved_at \
                 WHERE status = 'PENDING' RETURN AFTER",
            )
            .bind(("id", rid))
            .bind(("status", new_status))
            .bind(("resolved_at", resolved_at))
            .await?;
        let movements: Vec<StockMovement> = result.take(0)?;
        Ok(movements.into_iter().next())
    }
}
