//! Cart API Handlers
//!
//! Pure CRUD around `cart_entry` documents; the stock core is not
//! involved until checkout.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{CartAdd, CartEntry};
use crate::db::repository::{CartRepository, ProductRepository, RepoError};
use crate::inventory::StockLedger;
use crate::utils::validation::validate_positive_quantity;
use crate::utils::{AppError, AppResult};

/// GET /api/cart/{user_id} - list a user's cart
pub async fn list(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<CartEntry>>> {
    let repo = CartRepository::new(state.db.clone());
    let entries = repo
        .find_by_user(&user_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(entries))
}

/// POST /api/cart - add quantity, accumulating per (user, product)
pub async fn add(
    State(state): State<ServerState>,
    Json(payload): Json<CartAdd>,
) -> AppResult<Json<CartEntry>> {
    validate_positive_quantity(payload.quantity, "quantity")?;
    if payload.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId must not be empty".to_string()));
    }

    let pid = StockLedger::product_ref(&payload.product_id);
    let products = ProductRepository::new(state.db.clone());
    let exists = products
        .exists(&pid)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    if !exists {
        return Err(AppError::NotFound(format!("Product {}", payload.product_id)));
    }

    let repo = CartRepository::new(state.db.clone());
    let entry = repo
        .add(&payload.user_id, &pid, payload.quantity)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(entry))
}

/// DELETE /api/cart/{id} - remove one cart entry
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CartRepository::new(state.db.clone());
    repo.delete(&id).await.map_err(|e| match e {
        RepoError::NotFound(msg) => AppError::NotFound(msg),
        other => AppError::Database(other.to_string()),
    })?;
    Ok(Json(true))
}
