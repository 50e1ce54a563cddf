/// Success response envelope
///
/// Every successful response wraps its payload in the same shape:
///
/// ```json
/// { "status": "success", "data": { ... } }
/// ```
///
/// Handlers return [`Success`] for 200 and [`Created`] for 201; DELETE
/// handlers return `StatusCode::NO_CONTENT` with no body.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// 200 OK wrapped in the success envelope
#[derive(Debug)]
pub struct Success<T>(pub T);

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "success",
            "data": self.0,
        }));
        (StatusCode::OK, body).into_response()
    }
}

/// 201 Created wrapped in the success envelope
#[derive(Debug)]
pub struct Created<T>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "success",
            "data": self.0,
        }));
        (StatusCode::CREATED, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_200() {
        let response = Success(json!({"ok": true})).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_created_is_201() {
        let response = Created(json!({"id": 1})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
