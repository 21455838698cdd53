//! Utility module - shared helpers and types
//!
//! # Contents
//!
//! - [`AppError`] - application error type
//! - [`AppResponse`] - API response envelope
//! - validation and logging helpers

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResponse, multi_status, ok};

/// Result type for API handlers
pub type AppResult<T> = Result<T, AppError>;
