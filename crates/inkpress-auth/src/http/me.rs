//! Current-user endpoint handler.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::AuthError;
use crate::middleware::SessionAuth;

use super::{AuthHttpState, UserResponse};

/// Body of `GET /api/auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// The authenticated user.
    pub user: UserResponse,
}

/// Handler for `GET /api/auth/me`.
///
/// Resolves the authenticated session back to the stored user row. A
/// session whose user row no longer exists (deleted account, or the
/// storage-less super admin) reports 404.
pub async fn me_handler(
    State(state): State<AuthHttpState>,
    SessionAuth(ctx): SessionAuth,
) -> Result<Json<MeResponse>, AuthError> {
    let user = state
        .users
        .find_by_id(&ctx.user_id)
        .await?
        .ok_or_else(|| AuthError::not_found("User not found"))?;

    Ok(Json(MeResponse {
        user: UserResponse::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::harness;
    use crate::middleware::AuthContext;
    use crate::permissions::Role;
    use crate::storage::{User, UserStorage};

    fn context_for(user_id: &str) -> AuthContext {
        AuthContext {
            user_id: user_id.to_string(),
            email: "a@b.com".to_string(),
            role: Role::Viewer,
            expires_at: 4_000_000_000,
        }
    }

    #[tokio::test]
    async fn test_me_returns_stored_user() {
        let h = harness();
        let user = User::builder("a@b.com", "alice", "digest")
            .name("Alice", "Author")
            .avatar("https://cdn.example.com/a.png")
            .build();
        h.users.create(&user).await.unwrap();

        let Json(body) = me_handler(State(h.state.clone()), SessionAuth(context_for(&user.id)))
            .await
            .unwrap();

        assert_eq!(body.user.id, user.id);
        assert_eq!(body.user.username, "alice");
        assert_eq!(
            body.user.avatar.as_deref(),
            Some("https://cdn.example.com/a.png")
        );
    }

    #[tokio::test]
    async fn test_me_reports_missing_user() {
        let h = harness();
        let err = me_handler(State(h.state.clone()), SessionAuth(context_for("ghost")))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AuthError::NotFound { .. }));
    }
}
