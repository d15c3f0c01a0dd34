//! Auth DTOs - login and refresh payloads, token pair responses

use crate::dtos::UserDTO;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login payload (only username and password)
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginDTO {
    pub username: String,
    pub password: String,
}

/// Refresh payload carrying the long-lived refresh token
#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct RefreshTokenDTO {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Response for login and refresh: the token pair plus the owning user
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenPairDTO {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserDTO,
}
