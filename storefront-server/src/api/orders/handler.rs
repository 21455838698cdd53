//! Order API Handlers
//!
//! Thin HTTP shims over [`OrderWorkflow`]; every business rule lives
//! in the workflow so the handlers only translate payloads and map
//! outcomes to status codes.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus};
use crate::orders::{CheckoutItem, DecisionOutcome, OrderWorkflow, ReconcileAction};
use crate::utils::validation::validate_non_negative_amount;
use crate::utils::{AppError, AppResult, multi_status};

/// Checkout payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: String,
    pub items: Vec<CheckoutItem>,
    pub total: f64,
}

/// Admin decision payload: `{"status": "accepted" | "rejected"}`
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub status: String,
}

/// Query filter for order listing
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub user_id: Option<String>,
}

fn workflow(state: &ServerState) -> OrderWorkflow {
    OrderWorkflow::new(state.db.clone(), state.reservations.clone())
}

/// A decision or reconciliation outcome maps to 200 when every item
/// settled and 207 when some items could not be reconciled.
fn outcome_response(outcome: DecisionOutcome) -> Response {
    if outcome.is_partial() {
        multi_status(outcome)
    } else {
        Json(outcome).into_response()
    }
}

/// POST /api/orders - checkout the submitted lines
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    if payload.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId must not be empty".to_string()));
    }
    validate_non_negative_amount(payload.total, "total")?;

    let order = workflow(&state)
        .checkout(&payload.user_id, &payload.items, payload.total)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders - all orders, newest first, optionally one user's
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = workflow(&state)
        .list_orders(query.user_id.as_deref())
        .await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = workflow(&state).get_order(&id).await?;
    Ok(Json(order))
}

/// PATCH /api/orders/{id} - accept or reject a pending order
pub async fn decide(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DecisionRequest>,
) -> AppResult<Response> {
    let decision = match payload.status.as_str() {
        "accepted" => OrderStatus::Accepted,
        "rejected" => OrderStatus::Rejected,
        other => {
            return Err(AppError::Validation(format!(
                "status must be accepted or rejected, got {other:?}"
            )));
        }
    };

    let outcome = workflow(&state).decide(&id, decision).await?;
    Ok(outcome_response(outcome))
}

/// POST /api/orders/{id}/confirm-stock - bulk confirm reservations
pub async fn confirm_stock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let outcome = workflow(&state)
        .reconcile(&id, ReconcileAction::Confirm)
        .await?;
    Ok(outcome_response(outcome))
}

/// POST /api/orders/{id}/return-stock - bulk release reservations
pub async fn return_stock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let outcome = workflow(&state)
        .reconcile(&id, ReconcileAction::Return)
        .await?;
    Ok(outcome_response(outcome))
}
