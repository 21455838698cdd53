//! Order API module
//!
//! Checkout, order listing, the admin decision endpoint and the bulk
//! stock reconciliation endpoints.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::checkout))
        .route("/{id}", get(handler::get_by_id).patch(handler::decide))
        .route("/{id}/confirm-stock", post(handler::confirm_stock))
        .route("/{id}/return-stock", post(handler::return_stock))
}
