//! Core Module - infrastructural components of the application
//!
//! This module contains the "core" pieces shared by every route:
//! - Token codec and request authentication gate
//! - Configuration
//! - Error handling
//! - Application state

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

// Re-exports to ease imports
pub use auth::{
    AuthContext, Claims, TokenError, TokenKind, authentication_middleware, decode_jwt, encode_jwt,
};
pub use config::{AuthConfig, Config};
pub use error::AppError;
pub use state::AppState;
