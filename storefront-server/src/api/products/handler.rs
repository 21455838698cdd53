//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{MovementKind, Product, ProductCreate, ProductWithStock};
use crate::db::repository::{CategoryRepository, ProductRepository};
use crate::inventory::StockLedger;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_non_negative_amount,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Attach derived availability to a product
async fn with_stock(ledger: &StockLedger, product: Product) -> AppResult<ProductWithStock> {
    let id = product
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::Internal("product without id".to_string()))?;
    let available = ledger.available_for_sale(&id).await?;
    Ok(ProductWithStock { product, available })
}

/// GET /api/products - all active products with derived stock
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductWithStock>>> {
    let repo = ProductRepository::new(state.db.clone());
    let ledger = StockLedger::new(state.db.clone());

    let products = repo
        .find_all()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut result = Vec::with_capacity(products.len());
    for product in products {
        result.push(with_stock(&ledger, product).await?);
    }
    Ok(Json(result))
}

/// GET /api/products/{id} - one product with derived stock
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductWithStock>> {
    let repo = ProductRepository::new(state.db.clone());
    let ledger = StockLedger::new(state.db.clone());

    let product = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("Product {}", id)))?;

    Ok(Json(with_stock(&ledger, product).await?))
}

/// POST /api/products - create product + optional initial stock
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<ProductWithStock>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "category", MAX_NAME_LEN)?;
    validate_non_negative_amount(payload.price, "price")?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(stock) = payload.initial_stock
        && stock < 0
    {
        return Err(AppError::Validation(
            "initialStock must not be negative".to_string(),
        ));
    }

    let categories = CategoryRepository::new(state.db.clone());
    let category_exists = categories
        .exists(&payload.category)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    if !category_exists {
        return Err(AppError::NotFound(format!(
            "Category {}",
            payload.category
        )));
    }

    let initial_stock = payload.initial_stock;
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .create(payload)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let ledger = StockLedger::new(state.db.clone());
    if let Some(stock) = initial_stock
        && stock > 0
        && let Some(ref id) = product.id
    {
        ledger
            .record(
                &id.to_string(),
                MovementKind::In,
                stock,
                Some("initial stock".to_string()),
                None,
            )
            .await?;
    }

    Ok((StatusCode::CREATED, Json(with_stock(&ledger, product).await?)))
}

/// Payload for stock adjustment
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockRequest {
    /// Desired derived stock after the adjustment
    pub target: i64,
}

/// Result of a stock adjustment
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockResponse {
    pub product_id: String,
    pub available: i64,
}

/// PUT /api/products/{id}/stock - adjust derived stock to a target value
///
/// The ledger is append-only, so the adjustment appends a compensating
/// movement rather than editing past entries: IN for an increase, an
/// unresolved OUT for a reduction.
pub async fn adjust_stock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AdjustStockRequest>,
) -> AppResult<Json<AdjustStockResponse>> {
    if payload.target < 0 {
        return Err(AppError::Validation(
            "target stock must not be negative".to_string(),
        ));
    }

    let repo = ProductRepository::new(state.db.clone());
    let pid = StockLedger::product_ref(&id);
    let exists = repo
        .exists(&pid)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    if !exists {
        return Err(AppError::NotFound(format!("Product {}", id)));
    }

    let ledger = StockLedger::new(state.db.clone());
    let current = ledger.available(&pid).await?;
    if current < 0 {
        return Err(AppError::Validation(format!(
            "ledger for product {id} is corrupted (derived stock {current}); adjust refused"
        )));
    }

    let diff = payload.target - current;
    if diff > 0 {
        ledger
            .record(
                &pid,
                MovementKind::In,
                diff,
                Some("manual adjustment".to_string()),
                None,
            )
            .await?;
    } else if diff < 0 {
        ledger
            .record(
                &pid,
                MovementKind::Out,
                -diff,
                Some("manual adjustment".to_string()),
                None,
            )
            .await?;
    }

    tracing::info!(
        product_id = %pid,
        from = current,
        to = payload.target,
        "Stock adjusted"
    );

    Ok(Json(AdjustStockResponse {
        product_id: pid,
        available: payload.target,
    }))
}

/// DELETE /api/products/{id} - delete product + its ledger entries
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ProductRepository::new(state.db.clone());
    repo.delete(&id).await.map_err(|e| match e {
        crate::db::repository::RepoError::NotFound(msg) => AppError::NotFound(msg),
        other => AppError::Database(other.to_string()),
    })?;

    Ok(Json(true))
}
