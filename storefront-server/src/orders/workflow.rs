//! Order Workflow
//!
//! Orchestrates checkout (validation, reservations, order creation)
//! and the admin decision flow. The decision policy is deliberate:
//! the order status transition always commits, stock reconciliation
//! is best-effort per item and partial failures are reported, never
//! rolled back.

use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::db::models::{MovementStatus, Order, OrderItem, OrderStatus};
use crate::db::repository::{OrderRepository, ProductRepository, RepoError};
use crate::inventory::{ReservationManager, StockError, StockLedger};

/// Order workflow error types
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Stock(StockError),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => OrderError::NotFound(msg),
            RepoError::Validation(msg) => OrderError::Validation(msg),
            RepoError::Database(msg) => OrderError::Store(msg),
        }
    }
}

/// One checkout line as submitted by the client
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: String,
    pub quantity: i64,
}

/// Per-item result of a multi-item reconciliation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement_id: Option<String>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated result of a decision or bulk reconciliation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOutcome {
    pub order: Order,
    pub items: Vec<ItemOutcome>,
}

impl DecisionOutcome {
    /// True when some per-item reconciliations failed
    pub fn is_partial(&self) -> bool {
        self.items.iter().any(|item| !item.ok)
    }
}

/// Bulk reconciliation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    Confirm,
    Return,
}

impl ReconcileAction {
    fn status(self) -> MovementStatus {
        match self {
            ReconcileAction::Confirm => MovementStatus::Confirmed,
            ReconcileAction::Return => MovementStatus::Returned,
        }
    }
}

/// Checkout and decision orchestration over the inventory core
#[derive(Clone)]
pub struct OrderWorkflow {
    orders: OrderRepository,
    products: ProductRepository,
    reservations: ReservationManager,
}

impl OrderWorkflow {
    pub fn new(db: Surreal<Db>, reservations: ReservationManager) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db),
            reservations,
        }
    }

    /// Checkout: validate, reserve every line, persist the order as
    /// PENDING.
    ///
    /// Reservations run in input order. On the first failure every
    /// reservation made so far is released before the error is
    /// returned, so a refused checkout leaks no stock.
    pub async fn checkout(
        &self,
        user_id: &str,
        items: &[CheckoutItem],
        total: f64,
    ) -> Result<Order, OrderError> {
        if items.is_empty() {
            return Err(OrderError::Validation("order has no items".to_string()));
        }
        for item in items {
            if item.quantity <= 0 {
                return Err(OrderError::Validation(format!(
                    "quantity for product {} must be a positive integer",
                    item.product_id
                )));
            }
        }
        // Resolve every product before any write
        for item in items {
            let pid = StockLedger::product_ref(&item.product_id);
            if !self.products.exists(&pid).await? {
                return Err(OrderError::Stock(StockError::ProductNotFound(pid)));
            }
        }

        let mut lines: Vec<OrderItem> = Vec::with_capacity(items.len());
        for item in items {
            match self.reservations.reserve(&item.product_id, item.quantity).await {
                Ok(movement) => lines.push(OrderItem {
                    product_id: movement.product_id.clone(),
                    quantity: item.quantity,
                    movement_id: Some(movement.id_string()),
                }),
                Err(err) => {
                    self.rollback_reservations(&lines).await;
                    return Err(err.into());
                }
            }
        }

        let order = Order {
            id: None,
            user_id: user_id.to_string(),
            items: lines,
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        let created = self.orders.create(order).await?;
        tracing::info!(
            order_id = %created.id_string(),
            user_id = %user_id,
            items = created.items.len(),
            total,
            "Order created"
        );
        Ok(created)
    }

    /// Compensation for a failed checkout: release the reservations
    /// already made. Best effort - a failed release is logged and the
    /// original error still wins.
    async fn rollback_reservations(&self, lines: &[OrderItem]) {
        for line in lines {
            let Some(movement_id) = line.movement_id.as_deref() else {
                continue;
            };
            if let Err(err) = self.reservations.release_movement(movement_id).await {
                tracing::error!(
                    movement_id = %movement_id,
                    product_id = %line.product_id,
                    error = %err,
                    "Failed to roll back reservation after refused checkout"
                );
            }
        }
    }

    /// All orders, newest first, optionally for one user
    pub async fn list_orders(&self, user_id: Option<&str>) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.find_all(user_id).await?)
    }

    /// Fetch one order
    pub async fn get_order(&self, order_id: &str) -> Result<Order, OrderError> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }

    /// Admin decision: PENDING -> ACCEPTED | REJECTED, exactly once.
    ///
    /// The status transition commits first; per-item confirm (on
    /// accept) or release (on reject) then fans out independently and
    /// the collected results are reported. Partial reconciliation
    /// failures never revert the transition.
    pub async fn decide(
        &self,
        order_id: &str,
        decision: OrderStatus,
    ) -> Result<DecisionOutcome, OrderError> {
        let action = match decision {
            OrderStatus::Accepted => ReconcileAction::Confirm,
            OrderStatus::Rejected => ReconcileAction::Return,
            OrderStatus::Pending => {
                return Err(OrderError::Validation(
                    "decision must be accepted or rejected".to_string(),
                ));
            }
        };

        let Some(order) = self.orders.transition_if_pending(order_id, decision).await? else {
            // Distinguish missing from already-decided
            return match self.orders.find_by_id(order_id).await? {
                Some(existing) => Err(OrderError::InvalidTransition(format!(
                    "order {order_id} is already {:?}",
                    existing.status
                ))),
                None => Err(OrderError::NotFound(order_id.to_string())),
            };
        };

        tracing::info!(
            order_id = %order.id_string(),
            status = ?decision,
            "Order decided"
        );

        let items = self.reconcile_items(&order, action).await;
        Ok(DecisionOutcome { order, items })
    }

    /// Bulk confirm/release of an order's reservations without
    /// touching order status (the confirm-stock / return-stock
    /// endpoints).
    pub async fn reconcile(
        &self,
        order_id: &str,
        action: ReconcileAction,
    ) -> Result<DecisionOutcome, OrderError> {
        let order = self.get_order(order_id).await?;
        let items = self.reconcile_items(&order, action).await;
        Ok(DecisionOutcome { order, items })
    }

    /// Independent per-item fan-out; results are collected, then
    /// reduced - one failed item never short-circuits the rest.
    async fn reconcile_items(&self, order: &Order, action: ReconcileAction) -> Vec<ItemOutcome> {
        let futures = order.items.iter().map(|line| async move {
            let result = self.resolve_line(line, action).await;
            match result {
                Ok(movement_id) => ItemOutcome {
                    product_id: line.product_id.clone(),
                    movement_id: Some(movement_id),
                    ok: true,
                    error: None,
                },
                Err(err) => {
                    tracing::warn!(
                        order_id = %order.id_string(),
                        product_id = %line.product_id,
                        error = %err,
                        "Per-item stock reconciliation failed"
                    );
                    ItemOutcome {
                        product_id: line.product_id.clone(),
                        movement_id: line.movement_id.clone(),
                        ok: false,
                        error: Some(err.to_string()),
                    }
                }
            }
        });
        join_all(futures).await
    }

    /// Resolve one line: by stored movement id when the line carries
    /// one, otherwise by the product's latest pending movement.
    async fn resolve_line(
        &self,
        line: &OrderItem,
        action: ReconcileAction,
    ) -> Result<String, StockError> {
        let movement = match line.movement_id.as_deref() {
            Some(movement_id) => {
                self.reservations
                    .ledger()
                    .resolve(movement_id, action.status())
                    .await?
            }
            None => match action {
                ReconcileAction::Confirm => {
                    self.reservations.confirm_product(&line.product_id).await?
                }
                ReconcileAction::Return => {
                    self.reservations.release_product(&line.product_id).await?
                }
            },
        };
        Ok(movement.id_string())
    }
}
