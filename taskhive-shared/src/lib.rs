//! # TaskHive Shared
//!
//! Core library for the TaskHive task-management platform. Everything
//! that is not HTTP lives here:
//!
//! - [`auth`]: password hashing, JWT pairs, role policy, Axum middleware
//! - [`models`]: users, organizations, tasks, permission grants and
//!   their PostgreSQL operations
//! - [`db`]: connection pooling and embedded migrations
//! - [`audit`]: structured security audit events
//!
//! The API crate composes these into an Axum application.

pub mod audit;
pub mod auth;
pub mod db;
pub mod models;

/// Library version from Cargo metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
