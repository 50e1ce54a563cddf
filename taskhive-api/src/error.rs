/// API error types and their wire representation
///
/// Every error leaves the server in the same envelope shape:
///
/// ```json
/// { "status": 404, "message": "Task not found", "data": null }
/// ```
///
/// Validation failures additionally carry a field-level breakdown in
/// `data`:
///
/// ```json
/// {
///   "status": 400,
///   "message": "Validation failed",
///   "data": [{ "property": "email", "constraints": ["email must be an email"] }]
/// }
/// ```
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use taskhive_shared::auth::jwt::JwtError;
use taskhive_shared::auth::password::PasswordError;

/// Canonical client-facing error messages
pub mod messages {
    /// Login with an email no account uses
    pub const NO_USER_FOUND: &str = "No user found!";

    /// Login with a known email but wrong password
    pub const INVALID_LOGIN: &str = "Invalid login credentials";

    /// Registration with an email that is already taken
    pub const EMAIL_EXISTS: &str = "Email already exists!.";

    /// Task id path segment is not a UUID
    pub const INVALID_TASK_ID: &str = "Invalid task ID format";

    /// Task absent or outside the caller's organization
    pub const TASK_NOT_FOUND: &str = "Task not found";

    /// Caller's roles do not allow the action
    pub const FORBIDDEN: &str = "You do not have permission to perform this action";

    /// Caller has no organization to scope the operation to
    pub const NO_ORGANIZATION: &str = "User does not belong to an organization";

    /// Refresh token rejected
    pub const INVALID_REFRESH_TOKEN: &str = "Invalid token!. this token cannot be validated!";
}

/// One field's validation failures
#[derive(Debug, Clone, Serialize)]
pub struct FieldErrors {
    /// Name of the offending request field, in wire (camelCase) form
    pub property: String,

    /// Human-readable constraint violations
    pub constraints: Vec<String>,
}

/// API error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400 with a plain message
    #[error("{0}")]
    BadRequest(String),

    /// 400 with per-field constraint violations
    #[error("Validation failed")]
    Validation(Vec<FieldErrors>),

    /// 401
    #[error("{0}")]
    Unauthorized(String),

    /// 403
    #[error("{0}")]
    Forbidden(String),

    /// 404
    #[error("{0}")]
    NotFound(String),

    /// 409
    #[error("{0}")]
    Conflict(String),

    /// 500; the detail is logged and only exposed in debug builds
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, data) = match self {
            ApiError::Validation(fields) => (
                "Validation failed".to_string(),
                json!(fields),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "internal server error");
                // The raw detail only leaves the server in debug builds
                let data = if cfg!(debug_assertions) {
                    json!(detail)
                } else {
                    json!(null)
                };
                ("Internal server error".to_string(), data)
            }
            other => (other.to_string(), json!(null)),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "message": message,
            "data": data,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // Unique constraint violation
            if db_err.code().as_deref() == Some("23505") {
                return ApiError::Conflict(messages::EMAIL_EXISTS.to_string());
            }
        }
        ApiError::Internal(err.to_string())
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("jwt expired".to_string()),
            _ => ApiError::Unauthorized(messages::INVALID_REFRESH_TOKEN.to_string()),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Converts a Rust field name to its camelCase wire form
fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldErrors> = errors
            .field_errors()
            .into_iter()
            .map(|(property, violations)| FieldErrors {
                property: to_camel_case(property),
                constraints: violations
                    .iter()
                    .map(|v| {
                        v.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{property} is invalid"))
                    })
                    .collect(),
            })
            .collect();

        // Deterministic ordering for clients and tests
        fields.sort_by(|a, b| a.property.cmp(&b.property));

        ApiError::Validation(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_error_carries_field_breakdown() {
        let err = ApiError::Validation(vec![FieldErrors {
            property: "email".to_string(),
            constraints: vec!["email must be an email".to_string()],
        }]);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_jwt_expired_maps_to_unauthorized() {
        let err: ApiError = JwtError::Expired.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "jwt expired");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("confirm_password"), "confirmPassword");
        assert_eq!(to_camel_case("email"), "email");
        assert_eq!(to_camel_case("due_date"), "dueDate");
    }

    #[test]
    fn test_validator_errors_convert_to_field_errors() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(email(message = "email must be an email"))]
            email: String,
        }

        let probe = Probe {
            email: "not-an-email".to_string(),
        };

        let err: ApiError = probe.validate().unwrap_err().into();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].property, "email");
                assert_eq!(fields[0].constraints, vec!["email must be an email"]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
