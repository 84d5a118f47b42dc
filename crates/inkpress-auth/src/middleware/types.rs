//! Authentication context available to handlers.

use crate::permissions::Role;
use crate::session::CachedSession;
use crate::token::SessionClaims;

/// The authenticated principal attached to a request.
///
/// Built either from freshly verified token claims or from a cache hit;
/// handlers cannot tell the difference, and must not need to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Owning user id (`super-admin` for the environment admin).
    pub user_id: String,

    /// Email carried in the session.
    pub email: String,

    /// Role carried in the session.
    pub role: Role,

    /// Session expiry (unix seconds).
    pub expires_at: i64,
}

impl AuthContext {
    /// Returns `true` if the principal holds at least the required role.
    #[must_use]
    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_role(required)
    }

    /// Returns `true` if the principal may create or edit blog posts.
    #[must_use]
    pub fn can_edit_blogs(&self) -> bool {
        self.role.can_edit_blogs()
    }

    /// Returns `true` if the principal may delete blog posts.
    #[must_use]
    pub fn can_delete_blogs(&self) -> bool {
        self.role.can_delete_blogs()
    }

    /// Returns `true` if the principal may manage user accounts.
    #[must_use]
    pub fn can_manage_users(&self) -> bool {
        self.role.can_manage_users()
    }
}

impl From<SessionClaims> for AuthContext {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
            expires_at: claims.exp,
        }
    }
}

impl From<CachedSession> for AuthContext {
    fn from(entry: CachedSession) -> Self {
        Self {
            user_id: entry.user_id,
            email: entry.email,
            role: entry.role,
            expires_at: entry.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: Role) -> AuthContext {
        AuthContext {
            user_id: "u1".to_string(),
            email: "a@b.com".to_string(),
            role,
            expires_at: 4_000_000_000,
        }
    }

    #[test]
    fn test_context_predicates_delegate_to_role() {
        assert!(context(Role::Editor).can_edit_blogs());
        assert!(!context(Role::Viewer).can_edit_blogs());
        assert!(context(Role::Admin).can_manage_users());
        assert!(!context(Role::Editor).can_manage_users());
        assert!(context(Role::Admin).has_role(Role::Viewer));
    }

    #[test]
    fn test_context_from_claims_and_cache_agree() {
        let claims = SessionClaims {
            user_id: "u1".to_string(),
            email: "a@b.com".to_string(),
            role: Role::Editor,
            exp: 123,
            iat: 100,
        };
        let cached = CachedSession::from(&claims);

        assert_eq!(AuthContext::from(claims), AuthContext::from(cached));
    }
}
