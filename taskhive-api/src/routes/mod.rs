/// HTTP route handlers
///
/// - [`health`]: liveness and database connectivity
/// - [`auth`]: login, account creation, token refresh (public)
/// - [`tasks`]: organization-scoped task CRUD and stats (bearer-authed)
pub mod auth;
pub mod health;
pub mod tasks;
