//! # TaskHive API
//!
//! HTTP layer of the TaskHive task-management platform: configuration,
//! the Axum router, route handlers, and the response/error envelopes.
//! Domain logic lives in `taskhive-shared`.

pub mod app;
pub mod config;
pub mod error;
pub mod response;
pub mod routes;
