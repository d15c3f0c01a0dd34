//! Repositories module - coordinator for all data-access components
//!
//! Each repository owns the access path to one backing service: the user
//! directory lives in MySQL, the credential store in Redis.

pub mod token;
pub mod traits;
pub mod user;

// Re-exports of the traits to ease imports
pub use traits::{Create, Read};

// Re-exports of the repository types to ease imports
pub use token::{MemoryTokenStore, RedisTokenStore, StoreError, TokenStore};
pub use user::UserRepository;
