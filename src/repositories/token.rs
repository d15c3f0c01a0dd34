//! TokenStore - credential store tracking the live (user_id, jti) pairs
//!
//! The store is the revocation authority: a token is operationally valid
//! only while its pair is present here. Entries carry a TTL equal to the
//! token lifetime, so natural expiry needs no explicit cleanup.

use async_trait::async_trait;
use dashmap::DashMap;
use redis::aio::ConnectionManager;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Typed failures of the credential store.
///
/// A timeout or transport failure is never an "invalid token" verdict:
/// callers must surface it as the store being unreachable. Only a definitive
/// miss may be treated as revoked.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(#[from] redis::RedisError),
    #[error("credential store operation timed out")]
    Timeout,
}

/// Key-value mapping of the currently valid token ids per user.
///
/// Implementations must be safe for concurrent use from all request
/// handlers. The auth service is the only writer.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Records a (user_id, jti) pair as valid for `ttl`
    async fn register(&self, user_id: i32, jti: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Removes a pair; removing an absent pair is not an error
    async fn revoke(&self, user_id: i32, jti: &str) -> Result<(), StoreError>;

    /// Existence check for a pair
    async fn is_valid(&self, user_id: i32, jti: &str) -> Result<bool, StoreError>;
}

fn token_key(user_id: i32, jti: &str) -> String {
    format!("user:{}:jwt-tokens:{}", user_id, jti)
}

/// Redis-backed store shared by all server instances
pub struct RedisTokenStore {
    manager: ConnectionManager,
    op_timeout: Duration,
}

impl RedisTokenStore {
    /// # Arguments
    /// * `manager` - multiplexed Redis connection, cheap to clone per call
    /// * `op_timeout` - deadline applied to every store operation
    pub fn new(manager: ConnectionManager, op_timeout: Duration) -> Self {
        Self {
            manager,
            op_timeout,
        }
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn register(&self, user_id: i32, jti: &str, ttl: Duration) -> Result<(), StoreError> {
        let key = token_key(user_id, jti);
        let mut conn = self.manager.clone();
        // Redis rejects EX 0, and a zero TTL would make the entry useless anyway
        let ttl_secs = ttl.as_secs().max(1);

        timeout(
            self.op_timeout,
            redis::cmd("SET")
                .arg(&key)
                .arg(jti)
                .arg("EX")
                .arg(ttl_secs)
                .query_async::<_, ()>(&mut conn),
        )
        .await
        .map_err(|_| {
            warn!("Timed out registering token {} for user {}", jti, user_id);
            StoreError::Timeout
        })??;

        debug!("Registered token {} for user {} (ttl {}s)", jti, user_id, ttl_secs);
        Ok(())
    }

    async fn revoke(&self, user_id: i32, jti: &str) -> Result<(), StoreError> {
        let key = token_key(user_id, jti);
        let mut conn = self.manager.clone();

        timeout(
            self.op_timeout,
            redis::cmd("DEL").arg(&key).query_async::<_, ()>(&mut conn),
        )
        .await
        .map_err(|_| {
            warn!("Timed out revoking token {} for user {}", jti, user_id);
            StoreError::Timeout
        })??;

        debug!("Revoked token {} for user {}", jti, user_id);
        Ok(())
    }

    async fn is_valid(&self, user_id: i32, jti: &str) -> Result<bool, StoreError> {
        let key = token_key(user_id, jti);
        let mut conn = self.manager.clone();

        let exists: bool = timeout(
            self.op_timeout,
            redis::cmd("EXISTS").arg(&key).query_async(&mut conn),
        )
        .await
        .map_err(|_| {
            warn!("Timed out checking token {} for user {}", jti, user_id);
            StoreError::Timeout
        })??;

        Ok(exists)
    }
}

/// In-process store used by the test suite. Entries expire lazily: an entry
/// whose deadline has passed is treated (and removed) as absent.
pub struct MemoryTokenStore {
    entries: DashMap<String, Instant>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn register(&self, user_id: i32, jti: &str, ttl: Duration) -> Result<(), StoreError> {
        self.entries
            .insert(token_key(user_id, jti), Instant::now() + ttl);
        Ok(())
    }

    async fn revoke(&self, user_id: i32, jti: &str) -> Result<(), StoreError> {
        self.entries.remove(&token_key(user_id, jti));
        Ok(())
    }

    async fn is_valid(&self, user_id: i32, jti: &str) -> Result<bool, StoreError> {
        let key = token_key(user_id, jti);
        // Copy the deadline out so the map guard is released before removal
        let deadline = match self.entries.get(&key) {
            Some(entry) => *entry,
            None => return Ok(false),
        };

        if Instant::now() < deadline {
            Ok(true)
        } else {
            self.entries.remove(&key);
            Ok(false)
        }
    }
}
