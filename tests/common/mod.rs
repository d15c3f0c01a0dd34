use authgate::core::{AppState, config::AuthConfig};
use authgate::repositories::MemoryTokenStore;
use axum_test::TestServer;
use sqlx::MySqlPool;
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "test-secret-not-for-production";

/// Auth settings used by the test suite; the bcrypt cost is the minimum so
/// the hashing stays fast
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        access_token_lifetime_secs: 3600,
        refresh_token_lifetime_secs: 86400,
        bcrypt_cost: 4,
        store_timeout_ms: 1000,
    }
}

/// Creates an AppState for the tests, backed by an in-memory token store
///
/// # Arguments
/// * `pool` - MySQL connection pool
///
/// # Returns
/// Arc<AppState> configured with the test JWT secret
pub fn create_test_state(pool: MySqlPool) -> Arc<AppState> {
    Arc::new(AppState::new(
        pool,
        Arc::new(MemoryTokenStore::new()),
        test_auth_config(),
    ))
}

/// Creates a TestServer for the tests
///
/// # Arguments
/// * `state` - AppState to use for the server
///
/// # Returns
/// TestServer configured and ready to run requests
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = authgate::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}
