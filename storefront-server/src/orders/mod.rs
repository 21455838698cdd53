//! Order Domain
//!
//! Checkout orchestration and the PENDING -> {ACCEPTED, REJECTED}
//! order state machine, driving the inventory core.

pub mod workflow;

pub use workflow::{
    CheckoutItem, DecisionOutcome, ItemOutcome, OrderError, OrderWorkflow, ReconcileAction,
};

use crate::inventory::StockError;
use crate::utils::AppError;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => AppError::NotFound(format!("Order {id}")),
            OrderError::InvalidTransition(msg) => AppError::InvalidTransition(msg),
            OrderError::Validation(msg) => AppError::Validation(msg),
            OrderError::Stock(e) => e.into(),
            OrderError::Store(msg) => AppError::Database(msg),
        }
    }
}

impl From<StockError> for OrderError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::Store(msg) => OrderError::Store(msg),
            other => OrderError::Stock(other),
        }
    }
}
