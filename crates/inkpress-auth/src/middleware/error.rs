//! HTTP responses for auth errors.
//!
//! Implements `IntoResponse` for `AuthError`: a JSON `{"error": ...}` body
//! with the matching status code, plus a `WWW-Authenticate` challenge on
//! 401 responses. Server-side failures are reported without internal
//! detail.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = error_details(&self);

        if self.is_server_error() {
            tracing::error!(error = %self, category = %self.category(), "auth request failed");
        } else {
            tracing::debug!(error = %self, category = %self.category(), "auth request rejected");
        }

        let body = json!({ "error": message });

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            let escaped = message.replace('"', "\\\"");
            let challenge = format!("Bearer error=\"invalid_token\", error_description=\"{escaped}\"");
            if let Ok(value) = HeaderValue::from_str(&challenge) {
                headers.insert(header::WWW_AUTHENTICATE, value);
            }
        }

        (status, headers, Json(body)).into_response()
    }
}

/// Maps an error to its HTTP status and user-facing message.
///
/// Client errors carry their own message; server errors collapse to a
/// generic one so internals never leak.
fn error_details(error: &AuthError) -> (StatusCode, String) {
    match error {
        AuthError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
        }
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
        AuthError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message.clone()),
        AuthError::Forbidden { message } => (StatusCode::FORBIDDEN, message.clone()),
        AuthError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
        AuthError::Conflict { message } => (StatusCode::BAD_REQUEST, message.clone()),
        AuthError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
        AuthError::Storage { .. } | AuthError::Configuration { .. } | AuthError::Internal { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
        }
    }
}
