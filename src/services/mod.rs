//! Services module - coordinator for all HTTP service handlers

pub mod auth;

// Re-exports to ease imports
pub use auth::{login_user, logout_user, refresh_token, register_user, verify_token};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
