use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::core::auth::TokenError;
use crate::repositories::token::StoreError;

#[derive(Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Closed error taxonomy for the whole application.
///
/// Every failure a handler can return falls in one of three buckets, each
/// mapped to a fixed status class: `Validation` (400), `Authentication` (401),
/// `Dependency` (500). The `code` is stable and machine readable; the message
/// is for humans. Credential failures carry uniform messages so the response
/// never reveals which check failed.
#[derive(Debug)]
pub enum AppError {
    Validation {
        code: &'static str,
        message: &'static str,
        details: Option<String>,
    },
    Authentication {
        code: &'static str,
        message: &'static str,
    },
    Dependency {
        code: &'static str,
        message: &'static str,
    },
}

impl AppError {
    pub fn validation(code: &'static str, message: &'static str) -> Self {
        Self::Validation {
            code,
            message,
            details: None,
        }
    }

    pub fn unauthorized(code: &'static str, message: &'static str) -> Self {
        Self::Authentication { code, message }
    }

    pub fn dependency(code: &'static str, message: &'static str) -> Self {
        Self::Dependency { code, message }
    }

    /// Attach human-readable details; only validation errors expose them
    pub fn with_details(mut self, extra: impl Into<String>) -> Self {
        if let Self::Validation { ref mut details, .. } = self {
            *details = Some(extra.into());
        }
        self
    }

    // Common error constructors
    pub fn invalid_credentials() -> Self {
        Self::unauthorized("INVALID_CREDENTIALS", "Invalid username or password")
    }

    pub fn invalid_token() -> Self {
        Self::unauthorized("INVALID_TOKEN", "Invalid token")
    }

    pub fn token_expired() -> Self {
        Self::unauthorized("TOKEN_EXPIRED", "Token has expired")
    }

    pub fn token_revoked() -> Self {
        Self::unauthorized("TOKEN_REVOKED", "Token has been revoked")
    }

    pub fn username_taken() -> Self {
        Self::validation("USERNAME_TAKEN", "Username already exists")
    }

    pub fn email_taken() -> Self {
        Self::validation("EMAIL_TAKEN", "Email already exists")
    }

    pub fn store_unavailable() -> Self {
        Self::dependency("STORE_UNAVAILABLE", "Credential store unavailable")
    }

    pub fn internal(message: &'static str) -> Self {
        Self::dependency("INTERNAL_ERROR", message)
    }

    /// Stable machine-readable code of this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { code, .. }
            | Self::Authentication { code, .. }
            | Self::Dependency { code, .. } => code,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Authentication { .. } => StatusCode::UNAUTHORIZED,
            Self::Dependency { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        Self::dependency("DATABASE_ERROR", "Database unavailable")
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::token_expired(),
            TokenError::InvalidSignature | TokenError::Malformed => Self::invalid_token(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Credential store error: {}", err);
        Self::store_unavailable()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::validation("VALIDATION_ERROR", "Validation error").with_details(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        Self::internal("Failed to hash password")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = Json(match self {
            Self::Validation {
                code,
                message,
                details,
            } => ErrorResponse {
                code,
                message,
                details,
            },
            Self::Authentication { code, message } | Self::Dependency { code, message } => {
                ErrorResponse {
                    code,
                    message,
                    details: None,
                }
            }
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_map_to_authentication() {
        assert_eq!(AppError::from(TokenError::Expired).code(), "TOKEN_EXPIRED");
        assert_eq!(
            AppError::from(TokenError::InvalidSignature).code(),
            "INVALID_TOKEN"
        );
        assert_eq!(
            AppError::from(TokenError::Malformed).code(),
            "INVALID_TOKEN"
        );
    }

    #[test]
    fn test_store_errors_are_dependency_failures() {
        let err = AppError::from(StoreError::Timeout);
        assert_eq!(err.code(), "STORE_UNAVAILABLE");
        assert!(matches!(err, AppError::Dependency { .. }));
    }

    #[test]
    fn test_details_only_on_validation() {
        let err = AppError::invalid_credentials().with_details("should be dropped");
        assert!(matches!(err, AppError::Authentication { .. }));
    }
}
