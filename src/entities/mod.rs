//! Entities module - domain entities of the application
//!
//! Each entity corresponds to a table in the database.

pub mod user;

// Re-exports to ease imports
pub use user::User;
