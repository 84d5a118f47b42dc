//! Login endpoint handler.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::AuthError;
use crate::permissions::Role;
use crate::session::CachedSession;

use super::{AuthHttpState, AuthResponse, SUPER_ADMIN_ID, UserResponse, is_valid_email};

/// Body of `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,

    /// Account password.
    pub password: String,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), AuthError> {
        if !is_valid_email(&self.email) || self.password.is_empty() {
            return Err(AuthError::validation("Validation failed"));
        }
        Ok(())
    }
}

/// Handler for `POST /api/auth/login`.
///
/// Checks the environment super admin first, then regular users from
/// storage. Unknown user, inactive account and wrong password all produce
/// the same generic 401. On success the issued token is cached and set as
/// the session cookie.
pub async fn login_handler(
    State(state): State<AuthHttpState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    request.validate()?;
    let email = request.email.to_lowercase();

    // 1. Environment super admin.
    if state.admin.matches(&email, &request.password) {
        tracing::info!("super admin authenticated");
        let user = UserResponse {
            id: SUPER_ADMIN_ID.to_string(),
            email: email.clone(),
            username: state.admin.username.clone(),
            first_name: state.admin.first_name.clone(),
            last_name: state.admin.last_name.clone(),
            role: Role::Admin,
            avatar: None,
        };
        let token = state.auth.generate_token(SUPER_ADMIN_ID, &email, Role::Admin)?;
        return issue_session(&state, user, token).await;
    }

    // 2. Regular user from storage.
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .filter(|u| u.active)
        .ok_or(AuthError::InvalidCredentials)?;

    if !state
        .auth
        .verify_password(&request.password, &user.password_hash)
    {
        tracing::debug!(user_id = %user.id, "password mismatch");
        return Err(AuthError::InvalidCredentials);
    }

    state
        .users
        .update_last_login(&user.id, OffsetDateTime::now_utc())
        .await?;

    tracing::info!(user_id = %user.id, "user authenticated");
    let token = state
        .auth
        .generate_token(&user.id, &user.email, user.role)?;
    issue_session(&state, UserResponse::from(&user), token).await
}

/// Caches the new session and builds the cookie-setting response.
async fn issue_session(
    state: &AuthHttpState,
    user: UserResponse,
    token: String,
) -> Result<Response, AuthError> {
    if let Some(claims) = state.auth.verify_token(&token) {
        state
            .cache
            .cache_session(&token, CachedSession::from(&claims))
            .await;
    }

    let cookie = state.cookie.build_cookie(&token);
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse { user, token }),
    )
        .into_response())
}
