/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id hashing and the password complexity policy
/// - [`jwt`]: access/refresh token pairs signed with distinct secrets
/// - [`policy`]: pure role/resource authorization decisions
/// - [`middleware`]: Axum bearer-token middleware injecting [`middleware::CurrentUser`]
///
/// # Request Flow
///
/// 1. `POST /auth/login` verifies credentials and issues a token pair
/// 2. `require_auth` validates the access token on protected routes and
///    resolves the subject to a `CurrentUser`
/// 3. Handlers consult `policy` before touching organization resources
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
