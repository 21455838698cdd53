//! Stock Ledger
//!
//! Append-only record of stock movements per product. Available stock
//! is never stored - it is recomputed from the full ledger on every
//! read, which trades an O(ledger) scan for consistency by
//! construction.

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::StockError;
use crate::db::models::{MovementKind, MovementStatus, StockMovement};
use crate::db::repository::{ProductRepository, StockMovementRepository, record_id};

const PRODUCT_TABLE: &str = "product";

/// Append-only movement ledger with derived availability
#[derive(Clone)]
pub struct StockLedger {
    products: ProductRepository,
    movements: StockMovementRepository,
}

impl StockLedger {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            movements: StockMovementRepository::new(db),
        }
    }

    /// Normalize a product reference to the persisted "product:key" form
    pub fn product_ref(product_id: &str) -> String {
        record_id(PRODUCT_TABLE, product_id).to_string()
    }

    /// Derived available quantity:
    /// sum(IN) - sum(OUT where status != RETURNED).
    ///
    /// Can go negative on a corrupted ledger (e.g. manual edits);
    /// callers must treat that as zero, see [`available_for_sale`].
    ///
    /// [`available_for_sale`]: StockLedger::available_for_sale
    pub async fn available(&self, product_id: &str) -> Result<i64, StockError> {
        let pid = Self::product_ref(product_id);
        let ledger = self.movements.find_by_product(&pid).await?;

        let mut sum: i64 = 0;
        for entry in &ledger {
            match entry.kind {
                MovementKind::In => sum += entry.quantity,
                MovementKind::Out => {
                    if entry.counts_against_stock() {
                        sum -= entry.quantity;
                    }
                }
            }
        }
        Ok(sum)
    }

    /// Available quantity clamped at zero. A negative derived value is
    /// flagged for audit instead of crashing the caller.
    pub async fn available_for_sale(&self, product_id: &str) -> Result<i64, StockError> {
        let available = self.available(product_id).await?;
        if available < 0 {
            tracing::warn!(
                target: "audit",
                product_id = %product_id,
                available,
                "Negative derived stock - ledger corrupted, treating as zero"
            );
            return Ok(0);
        }
        Ok(available)
    }

    /// Append one immutable entry.
    ///
    /// Fails with [`StockError::InvalidQuantity`] unless quantity is a
    /// positive integer, and with [`StockError::ProductNotFound`] when
    /// the product reference does not resolve. IN entries are never
    /// status-gated, so any status passed with them is dropped.
    pub async fn record(
        &self,
        product_id: &str,
        kind: MovementKind,
        quantity: i64,
        note: Option<String>,
        status: Option<MovementStatus>,
    ) -> Result<StockMovement, StockError> {
        if quantity <= 0 {
            return Err(StockError::InvalidQuantity(quantity));
        }

        let pid = Self::product_ref(product_id);
        if !self.products.exists(&pid).await? {
            return Err(StockError::ProductNotFound(pid));
        }

        let status = match kind {
            MovementKind::In => None,
            MovementKind::Out => status,
        };

        let movement = StockMovement {
            id: None,
            product_id: pid.clone(),
            kind,
            quantity,
            note,
            status,
            created_at: Utc::now(),
            resolved_at: None,
        };

        let created = self.movements.create(movement).await?;
        tracing::info!(
            product_id = %pid,
            movement_id = %created.id_string(),
            ?kind,
            quantity,
            status = ?created.status,
            "Stock movement recorded"
        );
        Ok(created)
    }

    /// Transition a PENDING OUT movement to CONFIRMED or RETURNED.
    ///
    /// One-way: once resolved, a second call fails with
    /// [`StockError::InvalidTransition`] and leaves state unchanged.
    /// Sets `resolvedAt` as a side effect.
    pub async fn resolve(
        &self,
        movement_id: &str,
        new_status: MovementStatus,
    ) -> Result<StockMovement, StockError> {
        if new_status == MovementStatus::Pending {
            return Err(StockError::InvalidTransition(format!(
                "movement {movement_id} cannot transition back to PENDING"
            )));
        }

        let resolved = self
            .movements
            .resolve_if_pending(movement_id, new_status, Utc::now())
            .await?;

        match resolved {
            Some(movement) => {
                tracing::info!(
                    movement_id = %movement.id_string(),
                    product_id = %movement.product_id,
                    status = ?new_status,
                    "Stock movement resolved"
                );
                Ok(movement)
            }
            None => Err(StockError::InvalidTransition(format!(
                "movement {movement_id} is not pending"
            ))),
        }
    }

    /// Latest pending OUT movement for a product.
    ///
    /// Tie-break: maximum `createdAt`; equal timestamps are broken by
    /// the highest record id, so the pick is deterministic.
    pub async fn latest_pending(
        &self,
        product_id: &str,
    ) -> Result<Option<StockMovement>, StockError> {
        let pid = Self::product_ref(product_id);
        let pending = self.movements.find_pending_by_product(&pid).await?;
        Ok(pending
            .into_iter()
            .max_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id_string().cmp(&b.id_string()))
            }))
    }
}
