//! Cart API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::add))
        // GET takes a user id, DELETE takes a cart entry id
        .route("/{id}", get(handler::list).delete(handler::remove))
}
