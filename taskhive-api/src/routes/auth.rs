/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/login` - Verify credentials and issue a token pair
/// - `POST /auth/create-account` - Register a new user
/// - `POST /auth/refresh` - Exchange a refresh token for a fresh pair
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use taskhive_shared::{
    audit,
    auth::{jwt, password, policy::Role},
    models::user::{CreateUser, User},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{messages, ApiError, FieldErrors},
    response::{Created, Success},
};

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "email must be an email"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: String,
}

/// Login response payload, wrapped in the success envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Authenticated user
    pub user: UserSummary,

    /// Issued token pair
    pub tokens: jwt::TokenPair,
}

/// Slimmed-down user for auth responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User id
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Role set
    pub roles: Vec<Role>,
}

/// Account creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// Email address
    #[validate(email(message = "email must be an email"))]
    pub email: String,

    /// Plaintext password, checked against the complexity policy
    pub password: String,

    /// Must match `password` exactly
    #[validate(must_match(other = "password", message = "confirmPassword must match password"))]
    pub confirm_password: String,
}

/// Token refresh request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token issued at login
    pub refresh_token: String,
}

/// Login endpoint
///
/// Verifies email and password and issues an access/refresh token pair.
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "SecureP@ss1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or the password is wrong
/// - `404 Not Found`: no account uses this email
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Success<LoginResponse>, ApiError> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound(messages::NO_USER_FOUND.to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::BadRequest(messages::INVALID_LOGIN.to_string()));
    }

    let tokens = jwt::issue_token_pair(
        user.id,
        &user.roles,
        &state.config.jwt.access_secret,
        &state.config.jwt.refresh_secret,
    )?;

    audit::log_login(user.id, &user.email);

    Ok(Success(LoginResponse {
        user: UserSummary {
            id: user.id,
            email: user.email,
            roles: user.roles,
        },
        tokens,
    }))
}

/// Account creation endpoint
///
/// New accounts start with the VIEWER role; stronger roles are granted
/// administratively.
///
/// # Endpoint
///
/// ```text
/// POST /auth/create-account
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss1",
///   "confirmPassword": "SecureP@ss1"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed (weak password, confirm
///   mismatch, malformed email)
/// - `409 Conflict`: email already registered
pub async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Created<serde_json::Value>, ApiError> {
    req.validate()?;

    // The complexity policy reports a single catch-all message
    if let Err(message) = password::validate_password_strength(&req.password) {
        return Err(ApiError::Validation(vec![FieldErrors {
            property: "password".to_string(),
            constraints: vec![message],
        }]));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email.to_lowercase(),
            password_hash,
            roles: vec![Role::Viewer],
        },
    )
    .await?;

    audit::log_account_created(user.id, &user.email);

    Ok(Created(json!({ "message": "Account created successfully" })))
}

/// Token refresh endpoint
///
/// Validates the refresh token against the refresh secret, re-loads the
/// user row and issues a fresh pair carrying the current role set.
///
/// # Endpoint
///
/// ```text
/// POST /auth/refresh
/// Content-Type: application/json
///
/// { "refreshToken": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: token expired, malformed, or signed with the
///   wrong secret
/// - `404 Not Found`: the subject user no longer exists
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Success<jwt::TokenPair>, ApiError> {
    let claims = jwt::validate_token(&req.refresh_token, &state.config.jwt.refresh_secret)?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound(messages::NO_USER_FOUND.to_string()))?;

    let tokens = jwt::issue_token_pair(
        user.id,
        &user.roles,
        &state.config.jwt.access_secret,
        &state.config.jwt.refresh_secret,
    )?;

    audit::log_token_refresh(user.id);

    Ok(Success(tokens))
}
