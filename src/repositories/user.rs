//! UserRepository - user directory over MySQL

use super::{Create, Read};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use sqlx::{Error, MySqlPool};

const USER_COLUMNS: &str =
    "user_id, username, email, password, first_name, last_name, avatar_url, created_at";

pub struct UserRepository {
    connection_pool: MySqlPool,
}

impl UserRepository {
    pub fn new(connection_pool: MySqlPool) -> UserRepository {
        Self { connection_pool }
    }

    /// Find user by exact username match; usernames are unique
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = ?",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    /// Find user by exact email match; emails are unique
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    /// Find a user that holds either the given username or the given email.
    /// Used by registration to detect duplicates with a single query.
    pub async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = ? OR email = ?",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password, first_name, last_name, avatar_url) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.avatar_url)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_id() as i32;

        // Read the row back so the caller sees the database-assigned fields
        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<User, i32> for UserRepository {
    async fn read(&self, id: &i32) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE user_id = ?",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{Create, Read};

    fn sample_user() -> CreateUserDTO {
        CreateUserDTO {
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            password: "$2b$04$placeholderplaceholderplaceholderplaceholderplace".to_string(),
            first_name: Some("Carol".to_string()),
            last_name: None,
            avatar_url: None,
        }
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_create_then_read(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let created = repo.create(&sample_user()).await?;
        assert_eq!(created.username, "carol");
        assert_eq!(created.email, "carol@example.com");

        let read_back = repo.read(&created.user_id).await?;
        assert_eq!(read_back.unwrap().username, "carol");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_find_by_username_and_email(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        assert!(repo.find_by_username("alice").await?.is_some());
        assert!(repo.find_by_username("nonexistent").await?.is_none());
        assert!(repo.find_by_email("bob@example.com").await?.is_some());

        // Either column matches
        assert!(
            repo.find_by_username_or_email("alice", "unused@example.com")
                .await?
                .is_some()
        );
        assert!(
            repo.find_by_username_or_email("unused", "alice@example.com")
                .await?
                .is_some()
        );
        assert!(
            repo.find_by_username_or_email("unused", "unused@example.com")
                .await?
                .is_none()
        );
        Ok(())
    }
}
