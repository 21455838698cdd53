//! Category API Handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate};
use crate::db::repository::CategoryRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// GET /api/categories - all categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.db.clone());
    let categories = repo
        .find_all()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(categories))
}

/// POST /api/categories - create category
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<Category>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .create(payload)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(category)))
}
