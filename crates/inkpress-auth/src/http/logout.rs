//! Logout endpoint handler.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::service::AuthService;

use super::{AuthHttpState, MessageResponse};

/// Handler for `POST /api/auth/logout`.
///
/// Drops the session cache entry for the presented token and clears the
/// session cookie. The token itself stays signature-valid until its own
/// expiry (only the cache shortcut is revoked), so logout succeeds even
/// with no token at all.
pub async fn logout_handler(State(state): State<AuthHttpState>, headers: HeaderMap) -> Response {
    if let Some(token) = AuthService::extract_token(&headers) {
        state.cache.invalidate_session(&token).await;
        tracing::debug!("session invalidated on logout");
    }

    (
        StatusCode::OK,
        [(header::SET_COOKIE, state.cookie.build_clear_cookie())],
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
        .into_response()
}
