use authgate::core::{AppState, Config};
use authgate::monitoring::{ResourceMonitorConfig, start_resource_monitoring};
use authgate::repositories::RedisTokenStore;
use redis::aio::ConnectionManager;
use sqlx::mysql::MySqlPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load the configuration
    let config = Config::from_env()?;
    config.print_info();

    // Shared MySQL connection pool for the user directory
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    // Multiplexed Redis connection for the credential store
    let redis_client = redis::Client::open(config.redis_url.clone())?;
    let redis_manager = ConnectionManager::new(redis_client).await?;
    let tokens = Arc::new(RedisTokenStore::new(
        redis_manager,
        Duration::from_millis(config.auth.store_timeout_ms),
    ));

    let state = Arc::new(AppState::new(pool, tokens, config.auth.clone()));

    // Process resource stats in the background
    tokio::spawn(start_resource_monitoring(ResourceMonitorConfig::default()));

    let app = authgate::create_router(state).layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    info!("Server listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
