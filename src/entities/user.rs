//! User entity with password hashing helpers

use bcrypt::{hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Verify a candidate password against the stored bcrypt hash
    pub fn verify_password(&self, candidate: &str) -> bool {
        verify(candidate, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with the configured cost
    pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
        let hash = hash(password, cost)?;
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(password_hash: String) -> User {
        User {
            user_id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: password_hash,
            first_name: None,
            last_name: None,
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = User::hash_password("secret1", 4).unwrap();
        let user = test_user(hash);

        assert!(user.verify_password("secret1"));
        assert!(!user.verify_password("secret2"));
    }

    #[test]
    fn test_verify_with_garbage_hash_is_false() {
        let user = test_user("not-a-bcrypt-hash".to_string());
        assert!(!user.verify_password("anything"));
    }
}
