/// Data models and their database operations
///
/// Each model owns its SQL: handlers call associated functions on the
/// model types rather than writing queries inline. Row mutations on
/// organization resources always bind the organization id.
pub mod organization;
pub mod permission;
pub mod task;
pub mod user;
