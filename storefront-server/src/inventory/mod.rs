//! Inventory Core
//!
//! The stock reconciliation model: an append-only movement ledger
//! ([`StockLedger`]) with derived availability, and pessimistic
//! checkout reservations ([`ReservationManager`]) that are later
//! confirmed or released.

pub mod ledger;
pub mod reservation;

pub use ledger::StockLedger;
pub use reservation::ReservationManager;

use crate::db::repository::RepoError;
use crate::utils::AppError;
use thiserror::Error;

/// Inventory error types
#[derive(Debug, Error)]
pub enum StockError {
    #[error("Quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Out of stock for {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Soft failure: confirm/release found nothing to resolve. Callers
    /// aggregate this per item instead of aborting.
    #[error("No pending reservation for product {0}")]
    NoPendingReservation(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<RepoError> for StockError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => StockError::ProductNotFound(msg),
            RepoError::Validation(msg) => StockError::InvalidTransition(msg),
            RepoError::Database(msg) => StockError::Store(msg),
        }
    }
}

impl From<StockError> for AppError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::InvalidQuantity(q) => {
                AppError::Validation(format!("quantity must be a positive integer, got {q}"))
            }
            StockError::ProductNotFound(id) => AppError::NotFound(format!("Product {id}")),
            StockError::OutOfStock {
                product_id,
                available,
                requested,
            } => AppError::OutOfStock {
                product_id,
                available,
                requested,
            },
            StockError::InvalidTransition(msg) => AppError::InvalidTransition(msg),
            StockError::NoPendingReservation(id) => {
                AppError::Validation(format!("no pending reservation for product {id}"))
            }
            StockError::Store(msg) => AppError::Database(msg),
        }
    }
}
