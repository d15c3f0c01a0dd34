//! User DTOs - Data Transfer Objects for users

use crate::entities::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Public representation of a user; never carries the password hash
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserDTO {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.user_id,
            username: value.username,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            avatar_url: value.avatar_url,
            created_at: value.created_at,
        }
    }
}

/// Registration payload submitted by the client
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct RegisterUserDTO {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(length(min = 6, max = 72, message = "Password must be between 6 and 72 characters"))]
    pub password: String,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,

    #[validate(length(max = 255, message = "Avatar URL must be at most 255 characters"))]
    pub avatar_url: Option<String>,
}

/// Internal DTO used to insert a new user row; the password is already hashed
#[derive(Debug, Clone)]
pub struct CreateUserDTO {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
}
