//! Registration endpoint handler.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::AuthError;
use crate::storage::User;

use super::{AuthHttpState, AuthResponse, UserResponse, is_valid_email, is_valid_username};

/// Body of `POST /api/auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Account email.
    pub email: String,

    /// Account password (8+ characters).
    pub password: String,

    /// Username (3+ characters, `[A-Za-z0-9_-]`).
    pub username: String,

    /// First name.
    #[serde(rename = "firstName")]
    pub first_name: String,

    /// Last name.
    #[serde(rename = "lastName")]
    pub last_name: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), AuthError> {
        if !is_valid_email(&self.email)
            || self.password.len() < 8
            || !is_valid_username(&self.username)
            || self.first_name.is_empty()
            || self.last_name.is_empty()
        {
            return Err(AuthError::validation("Validation failed"));
        }
        Ok(())
    }
}

/// Handler for `POST /api/auth/register`.
///
/// Creates a viewer-role account, issues a session token and sets the
/// session cookie. Registration does not pre-warm the session cache; the
/// first authenticated request does.
pub async fn register_handler(
    State(state): State<AuthHttpState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AuthError> {
    request.validate()?;
    let email = request.email.to_lowercase();

    if state.users.find_by_email(&email).await?.is_some()
        || state
            .users
            .find_by_username(&request.username)
            .await?
            .is_some()
    {
        return Err(AuthError::conflict("User already exists"));
    }

    let user = User::builder(&email, &request.username, state.auth.hash_password(&request.password))
        .name(&request.first_name, &request.last_name)
        .build();
    state.users.create(&user).await?;
    tracing::info!(user_id = %user.id, "user registered");

    let token = state
        .auth
        .generate_token(&user.id, &user.email, user.role)?;
    let cookie = state.cookie.build_cookie(&token);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            user: UserResponse::from(&user),
            token,
        }),
    )
        .into_response())
}
