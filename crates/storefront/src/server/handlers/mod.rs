//! Axum request handlers, one module per resource.
//!
//! Handlers stay thin: extract, call the service, wrap the result.

pub mod address;
pub mod auth;
pub mod cart;
pub mod category;
pub mod health;
pub mod order;
pub mod product;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use common::protocol::ErrorResponse;

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}
