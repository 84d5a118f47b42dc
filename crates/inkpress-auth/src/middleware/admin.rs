//! Admin-only extractor.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::error::AuthError;

use super::auth::{AuthState, SessionAuth};
use super::types::AuthContext;

/// Axum extractor that requires an authenticated admin.
///
/// Builds on [`SessionAuth`] and additionally requires the admin role by
/// identity (`can_manage_users`), so a hypothetical higher-ranked role
/// would still be rejected here.
///
/// # Errors
///
/// Rejects with 401 for missing/invalid credentials and 403 for any
/// authenticated non-admin.
pub struct AdminAuth(pub AuthContext);

impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let SessionAuth(ctx) = SessionAuth::from_request_parts(parts, state).await?;

        if !ctx.can_manage_users() {
            tracing::debug!(user_id = %ctx.user_id, role = %ctx.role, "admin access denied");
            return Err(AuthError::forbidden("Admin role required"));
        }

        Ok(AdminAuth(ctx))
    }
}
