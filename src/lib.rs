//! Server library - exposes the main modules for the integration tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod monitoring;
pub mod repositories;
pub mod services;

// Re-export of the main types to ease imports
pub use self::core::{AppError, AppState};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

/// Builds the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(configure_auth_routes(state.clone()))
        .with_state(state)
}

/// Configures the auth route group (register, login, refresh-token, logout)
fn configure_auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    // Routes that do NOT require a bearer token
    let public_routes = Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/refresh-token", post(refresh_token));

    // Logout revokes the presented token, so it must carry one
    let protected_routes = Router::new()
        .route("/logout", post(logout_user))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes.merge(protected_routes)
}
