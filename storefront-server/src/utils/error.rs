//! Unified Error Handling
//!
//! Provides application-wide error types and response structures:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response envelope
//!
//! # Error code table
//!
//! | Code | Status | Meaning |
//! |------|--------|---------|
//! | E0000 | 200 | Success |
//! | E0002 | 400 | Validation failed |
//! | E0003 | 404 | Resource not found |
//! | E1001 | 400 | Out of stock |
//! | E1002 | 400 | Invalid state transition |
//! | E1003 | 207 | Partial reconciliation |
//! | E9001 | 500 | Internal error |
//! | E9002 | 500 | Database error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Unified API response structure
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 means success)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Business Logic Errors ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Out of stock for {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, data) = match &self {
            // Not found (404)
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, "E0003", msg.clone(), None)
            }

            // Validation (400)
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "E0002", msg.clone(), None)
            }

            // Out of stock (400) - carries structured detail for the client
            AppError::OutOfStock {
                product_id,
                available,
                requested,
            } => (
                StatusCode::BAD_REQUEST,
                "E1001",
                self.to_string(),
                Some(serde_json::json!({
                    "productId": product_id,
                    "available": available,
                    "requested": requested,
                })),
            ),

            // Invalid state transition (400)
            AppError::InvalidTransition(msg) => {
                (StatusCode::BAD_REQUEST, "E1002", msg.clone(), None)
            }

            // Database errors (500) - log detail, mask the message
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                    None,
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(AppResponse {
            code: code.to_string(),
            message,
            data,
        });

        (status, body).into_response()
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a 207 Multi-Status response for partially failed
/// multi-item operations. The operation result is reported, never
/// promoted to a hard failure.
pub fn multi_status<T: Serialize>(data: T) -> Response {
    let body = Json(AppResponse {
        code: "E1003".to_string(),
        message: "Partial failure".to_string(),
        data: Some(data),
    });
    (StatusCode::MULTI_STATUS, body).into_response()
}
