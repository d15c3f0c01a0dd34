//! Token codec and request authentication gate
//!
//! The codec is a pure function of its input and the shared secret: it signs
//! and verifies HS256 tokens with strongly typed claims. The authentication
//! middleware extracts the bearer token, verifies it through the auth
//! service and attaches an [`AuthContext`] to the request for downstream
//! handlers.

use crate::core::{AppError, AppState};
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

/// Kind of credential a token represents. Access tokens are short lived;
/// refresh tokens are long lived and only spendable on /refresh-token.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by every signed token.
///
/// Unknown fields are rejected on decode: our issuer never adds extra
/// claims, so any surplus field means the token was not minted here.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    pub sub: i32,
    pub jti: String,
    pub kind: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

/// Typed failures of the token codec
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token is malformed")]
    Malformed,
}

/// Identity attached to the request once the bearer token has been verified
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i32,
    pub token_id: String,
    pub claims: Claims,
}

/// Signs a token of the given kind for `user_id`, valid for `ttl_secs`.
/// Returns the encoded token together with its fresh jti, which the caller
/// must register in the credential store.
#[instrument(skip(secret), fields(user_id = %user_id))]
pub fn encode_jwt(
    user_id: i32,
    kind: TokenKind,
    ttl_secs: i64,
    secret: &str,
) -> Result<(String, String), AppError> {
    debug!("Encoding JWT token");
    let jti = Uuid::new_v4().to_string();
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        jti: jti.clone(),
        kind,
        exp: (now + Duration::seconds(ttl_secs)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        AppError::internal("Failed to sign token")
    })?;

    Ok((token, jti))
}

/// Verifies signature and expiry of a token. Only HS256 is accepted: a token
/// that claims any other algorithm fails as [`TokenError::InvalidSignature`],
/// so an attacker cannot downgrade the check.
pub fn decode_jwt(token: &str, secret: &str) -> Result<TokenData<Claims>, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("JWT validation failed: {:?}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    })
}

/// Per-request authentication gate.
///
/// The Authorization header must be exactly `Bearer <token>`; any deviation
/// is a 401. Verified requests continue with an [`AuthContext`] extension.
#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let auth_header = match req.headers().get(http::header::AUTHORIZATION) {
        Some(header) => header.to_str().map_err(|_| {
            warn!("Authorization header is not valid UTF-8");
            AppError::unauthorized("UNAUTHORIZED", "Invalid authorization header")
        })?,
        None => {
            warn!("Missing authorization header");
            return Err(AppError::unauthorized(
                "UNAUTHORIZED",
                "Authorization header is required",
            ));
        }
    };

    let parts: Vec<&str> = auth_header.split(' ').collect();
    if parts.len() != 2 || parts[0] != "Bearer" || parts[1].is_empty() {
        warn!("Malformed authorization header");
        return Err(AppError::unauthorized(
            "UNAUTHORIZED",
            "Invalid authorization header format",
        ));
    }

    let context = crate::services::auth::verify_token(&state, parts[1]).await?;
    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_roundtrip_preserves_claims() {
        let (token, jti) = encode_jwt(42, TokenKind::Access, 3600, SECRET).unwrap();
        let data = decode_jwt(&token, SECRET).unwrap();

        assert_eq!(data.claims.sub, 42);
        assert_eq!(data.claims.jti, jti);
        assert_eq!(data.claims.kind, TokenKind::Access);
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn test_each_issuance_gets_a_fresh_jti() {
        let (_, jti_a) = encode_jwt(1, TokenKind::Access, 60, SECRET).unwrap();
        let (_, jti_b) = encode_jwt(1, TokenKind::Access, 60, SECRET).unwrap();
        assert_ne!(jti_a, jti_b);
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let (token, _) = encode_jwt(7, TokenKind::Access, 3600, SECRET).unwrap();

        // Flip the last character of the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert_eq!(
            decode_jwt(&tampered, SECRET).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let (token, _) = encode_jwt(7, TokenKind::Access, 3600, SECRET).unwrap();
        assert_eq!(
            decode_jwt(&token, "some-other-secret").unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let (token, _) = encode_jwt(7, TokenKind::Access, -120, SECRET).unwrap();
        assert_eq!(decode_jwt(&token, SECRET).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_algorithm_substitution_is_rejected() {
        // Same secret, different MAC algorithm: must not verify
        let claims = Claims {
            sub: 7,
            jti: "x".to_string(),
            kind: TokenKind::Access,
            exp: (Utc::now() + Duration::seconds(3600)).timestamp() as usize,
            iat: Utc::now().timestamp() as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            decode_jwt(&token, SECRET).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn test_extra_claims_are_rejected() {
        #[derive(Serialize)]
        struct PaddedClaims {
            sub: i32,
            jti: String,
            kind: TokenKind,
            exp: usize,
            iat: usize,
            admin: bool,
        }

        let claims = PaddedClaims {
            sub: 7,
            jti: "x".to_string(),
            kind: TokenKind::Access,
            exp: (Utc::now() + Duration::seconds(3600)).timestamp() as usize,
            iat: Utc::now().timestamp() as usize,
            admin: true,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(decode_jwt(&token, SECRET).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_garbage_input_is_malformed() {
        assert_eq!(
            decode_jwt("not.a.jwt", SECRET).unwrap_err(),
            TokenError::Malformed
        );
        assert_eq!(decode_jwt("", SECRET).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_token_kind_wire_format() {
        assert_eq!(serde_json::to_string(&TokenKind::Access).unwrap(), "\"access\"");
        assert_eq!(
            serde_json::to_string(&TokenKind::Refresh).unwrap(),
            "\"refresh\""
        );
    }
}
