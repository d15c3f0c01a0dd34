//! Application State - global state of the application
//!
//! Holds the repositories, the credential store handle and the immutable
//! auth configuration shared by every route and middleware.

use crate::core::config::AuthConfig;
use crate::repositories::{TokenStore, UserRepository};
use sqlx::MySqlPool;
use std::sync::Arc;

/// Global application state shared across all routes and middleware
pub struct AppState {
    /// User directory backed by MySQL
    pub user: UserRepository,

    /// Credential store tracking the live (user_id, jti) pairs
    pub tokens: Arc<dyn TokenStore>,

    /// Auth settings: signing secret, token lifetimes, hashing cost
    pub auth: AuthConfig,
}

impl AppState {
    /// Creates a new AppState wiring the user repository to the given pool.
    ///
    /// # Arguments
    /// * `pool` - shared MySQL connection pool
    /// * `tokens` - credential store implementation (Redis in production)
    /// * `auth` - immutable auth configuration
    pub fn new(pool: MySqlPool, tokens: Arc<dyn TokenStore>, auth: AuthConfig) -> Self {
        Self {
            user: UserRepository::new(pool),
            tokens,
            auth,
        }
    }
}
