//! Auth services - registration, login, token refresh, logout, verification
//!
//! This module is the sole writer of the credential store: tokens enter the
//! store at login/refresh and leave it at logout or natural expiry.

use crate::core::{AppError, AppState, AuthContext, TokenKind, decode_jwt, encode_jwt};
use crate::dtos::{
    CreateUserDTO, LoginDTO, RefreshTokenDTO, RegisterUserDTO, TokenPairDTO, UserDTO,
};
use crate::entities::User;
use crate::repositories::{Create, Read};
use axum::{
    Extension,
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterUserDTO>,
) -> Result<Json<UserDTO>, AppError> {
    debug!("Registering new user");
    body.validate()?;

    if !USERNAME_RE.is_match(&body.username) {
        warn!("Registration rejected: invalid username format");
        return Err(
            AppError::validation("VALIDATION_ERROR", "Validation error")
                .with_details("Username may only contain letters, digits and underscores"),
        );
    }

    // A single query detects both kinds of duplicate
    if let Some(existing) = state
        .user
        .find_by_username_or_email(&body.username, &body.email)
        .await?
    {
        warn!("Registration rejected: username or email already in use");
        return Err(if existing.username == body.username {
            AppError::username_taken()
        } else {
            AppError::email_taken()
        });
    }

    let password_hash = User::hash_password(&body.password, state.auth.bcrypt_cost)?;

    let new_user = CreateUserDTO {
        username: body.username,
        email: body.email,
        password: password_hash,
        first_name: body.first_name,
        last_name: body.last_name,
        avatar_url: body.avatar_url,
    };

    let created = state.user.create(&new_user).await?;
    info!("User registered with id {}", created.user_id);
    Ok(Json(UserDTO::from(created)))
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>,
) -> Result<Json<TokenPairDTO>, AppError> {
    debug!("Login attempt");

    // Same outward failure whether the username is unknown or the password
    // mismatches: the response must not reveal which check failed
    let user = match state.user.find_by_username(&body.username).await? {
        Some(user) => user,
        None => {
            warn!("Login failed: unknown username");
            return Err(AppError::invalid_credentials());
        }
    };

    if !user.verify_password(&body.password) {
        warn!("Login failed: password mismatch for user {}", user.user_id);
        return Err(AppError::invalid_credentials());
    }

    let access_token = issue_token(&state, user.user_id, TokenKind::Access).await?;
    let refresh_token = issue_token(&state, user.user_id, TokenKind::Refresh).await?;

    info!("User {} logged in", user.user_id);
    Ok(Json(TokenPairDTO {
        access_token,
        refresh_token,
        user: UserDTO::from(user),
    }))
}

#[instrument(skip(state, body))]
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshTokenDTO>,
) -> Result<Json<TokenPairDTO>, AppError> {
    debug!("Refreshing access token");
    body.validate()?;

    let context = verify_token(&state, &body.refresh_token).await?;
    if context.claims.kind != TokenKind::Refresh {
        warn!("Refresh rejected: presented token is not a refresh token");
        return Err(AppError::invalid_token());
    }

    let user = match state.user.read(&context.user_id).await? {
        Some(user) => user,
        None => {
            warn!("Refresh rejected: user {} no longer exists", context.user_id);
            return Err(AppError::invalid_token());
        }
    };

    // Additive refresh: a new access token is issued, while the refresh
    // token is returned unchanged and stays valid until its own expiry
    let access_token = issue_token(&state, user.user_id, TokenKind::Access).await?;

    info!("Access token refreshed for user {}", user.user_id);
    Ok(Json(TokenPairDTO {
        access_token,
        refresh_token: body.refresh_token,
        user: UserDTO::from(user),
    }))
}

#[instrument(skip(state, context), fields(user_id = %context.user_id))]
pub async fn logout_user(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<AuthContext>,
) -> Result<impl IntoResponse, AppError> {
    // Revocation is idempotent and touches only the presented token: the
    // sibling token of the pair stays valid
    state.tokens.revoke(context.user_id, &context.token_id).await?;

    info!("Token {} revoked", context.token_id);
    Ok((StatusCode::OK, "Logout successful"))
}

/// The single verification gate used by the request middleware and the
/// refresh flow: cryptographic check first (no store round trip for forged
/// tokens), then the revocation check. A store failure is surfaced as such,
/// never as an invalid-token verdict.
#[instrument(skip(state, token))]
pub async fn verify_token(state: &AppState, token: &str) -> Result<AuthContext, AppError> {
    let data = decode_jwt(token, &state.auth.jwt_secret)?;
    let claims = data.claims;

    let valid = state.tokens.is_valid(claims.sub, &claims.jti).await?;
    if !valid {
        warn!(
            "Token {} for user {} is not in the credential store",
            claims.jti, claims.sub
        );
        return Err(AppError::token_revoked());
    }

    Ok(AuthContext {
        user_id: claims.sub,
        token_id: claims.jti.clone(),
        claims,
    })
}

/// Issues a token of the given kind and records its jti in the credential
/// store with a TTL equal to the token lifetime.
async fn issue_token(state: &AppState, user_id: i32, kind: TokenKind) -> Result<String, AppError> {
    let ttl_secs = match kind {
        TokenKind::Access => state.auth.access_token_lifetime_secs,
        TokenKind::Refresh => state.auth.refresh_token_lifetime_secs,
    };

    let (token, jti) = encode_jwt(user_id, kind, ttl_secs as i64, &state.auth.jwt_secret)?;
    state
        .tokens
        .register(user_id, &jti, Duration::from_secs(ttl_secs))
        .await?;

    Ok(token)
}
