/// Bearer-token authentication middleware for Axum
///
/// Extracts the `Authorization: Bearer <token>` header, validates the
/// access token, resolves the subject to a live user row, and injects a
/// [`CurrentUser`] into request extensions for handlers to consume.
///
/// Resolving the user on every request (rather than trusting the role
/// claims alone) means a deleted user is locked out the moment their row
/// disappears, and organization membership is always current.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use sqlx::PgPool;
/// use taskhive_shared::auth::middleware::{require_auth, CurrentUser};
///
/// async fn whoami(Extension(user): Extension<CurrentUser>) -> String {
///     user.email
/// }
///
/// fn protected(pool: PgPool, access_secret: String) -> Router {
///     Router::new()
///         .route("/whoami", get(whoami))
///         .layer(middleware::from_fn(move |req, next| {
///             require_auth(pool.clone(), access_secret.clone(), req, next)
///         }))
/// }
/// ```
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use super::policy::{self, Action, Role};
use crate::models::user::User;

/// Authenticated caller attached to request extensions
///
/// Snapshot of the user row at the time the request was authenticated.
/// The password hash is deliberately not carried here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User id (JWT subject)
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Role set from the users table
    pub roles: Vec<Role>,

    /// Organization the user belongs to, if any
    pub organization_id: Option<Uuid>,
}

impl CurrentUser {
    /// Checks whether this user's roles allow an action
    pub fn can_perform(&self, action: Action) -> bool {
        policy::can_perform(&self.roles, action)
    }

    /// Checks whether this user may access a resource owned by
    /// `resource_owner_id` in `resource_org_id`
    pub fn can_access(&self, resource_owner_id: Uuid, resource_org_id: Uuid) -> bool {
        policy::can_access_resource(
            self.id,
            self.organization_id,
            &self.roles,
            resource_owner_id,
            resource_org_id,
        )
    }

    /// True when the user holds VIEWER and nothing stronger
    pub fn is_viewer_only(&self) -> bool {
        policy::is_viewer_only(&self.roles)
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            roles: user.roles,
            organization_id: user.organization_id,
        }
    }
}

/// Error type for the authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Authorization header missing
    MissingCredentials,

    /// Header present but not a Bearer token
    InvalidFormat,

    /// Token failed validation (signature, expiry, issuer)
    InvalidToken(String),

    /// Token was valid but its subject no longer exists
    UnknownUser,

    /// Database failure while resolving the user
    Database(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Token is not found for this request!".to_string())
            }
            AuthError::InvalidFormat => {
                (StatusCode::UNAUTHORIZED, "Expected a Bearer token".to_string())
            }
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::UnknownUser => (
                StatusCode::UNAUTHORIZED,
                "Invalid token!. this token cannot be validated!".to_string(),
            ),
            AuthError::Database(msg) => {
                tracing::error!(error = %msg, "auth middleware database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "message": message,
            "data": null,
        }));

        (status, body).into_response()
    }
}

/// Authentication middleware
///
/// Validates the bearer access token, loads the user row and inserts a
/// [`CurrentUser`] extension. Fails closed with 401 when anything about
/// the token is off.
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - the Authorization header is missing or not `Bearer`
/// - the token is expired, malformed, or signed with the wrong secret
/// - the subject user no longer exists
pub async fn require_auth(
    pool: PgPool,
    access_secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    let claims = validate_token(token, &access_secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("jwt expired".to_string()),
        _ => AuthError::InvalidToken("Invalid token!. this token cannot be validated!".to_string()),
    })?;

    // Resolve the subject to a live user row; the row (not the token)
    // is authoritative for roles and organization
    let user = User::find_by_id(&pool, claims.sub)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?
        .ok_or(AuthError::UnknownUser)?;

    req.extensions_mut().insert(CurrentUser::from(user));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(org: Option<Uuid>) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "viewer@example.com".to_string(),
            roles: vec![Role::Viewer],
            organization_id: org,
        }
    }

    #[test]
    fn test_current_user_can_perform_delegates_to_policy() {
        let user = viewer(None);
        assert!(user.can_perform(Action::Read));
        assert!(!user.can_perform(Action::Delete));
    }

    #[test]
    fn test_current_user_can_access_own_resource() {
        let org = Uuid::new_v4();
        let user = viewer(Some(org));
        assert!(user.can_access(user.id, org));
        assert!(!user.can_access(Uuid::new_v4(), org));
    }

    #[test]
    fn test_is_viewer_only() {
        let mut user = viewer(None);
        assert!(user.is_viewer_only());

        user.roles.push(Role::Admin);
        assert!(!user.is_viewer_only());
    }

    #[test]
    fn test_auth_error_responses_are_unauthorized() {
        assert_eq!(
            AuthError::MissingCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken("jwt expired".to_string())
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::UnknownUser.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Database("boom".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
