//! Axum handlers for the auth endpoints.
//!
//! Routes served by these handlers:
//!
//! - `POST /api/auth/login`: credential check, token issuance, cookie set
//! - `POST /api/auth/register`: self-registration (viewer role)
//! - `POST /api/auth/logout`: session cache invalidation, cookie clear
//! - `GET  /api/auth/me`: current user lookup
//!
//! Handlers own the HTTP status decisions: 401 for missing/invalid
//! credentials, 403 for insufficient role, 400/404 for request-level
//! errors.

pub mod login;
pub mod logout;
pub mod me;
pub mod register;

use std::sync::Arc;
use std::sync::LazyLock;

use axum::extract::FromRef;
use regex::Regex;
use serde::Serialize;

use crate::config::{AdminConfig, CookieConfig};
use crate::middleware::AuthState;
use crate::permissions::Role;
use crate::service::AuthService;
use crate::session::SessionCache;
use crate::storage::{User, UserStorage};

pub use login::{LoginRequest, login_handler};
pub use logout::logout_handler;
pub use me::{MeResponse, me_handler};
pub use register::{RegisterRequest, register_handler};

/// Fixed principal id for the environment-provisioned super admin.
pub const SUPER_ADMIN_ID: &str = "super-admin";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{3,}$").expect("username pattern is valid"));

/// Returns `true` for a plausibly shaped email address.
pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Returns `true` for a valid username (3+ chars, `[A-Za-z0-9_-]`).
pub(crate) fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// Shared state for the auth endpoints.
#[derive(Clone)]
pub struct AuthHttpState {
    /// Credential and token service.
    pub auth: Arc<AuthService>,

    /// Session cache fast path.
    pub cache: SessionCache,

    /// User storage backend.
    pub users: Arc<dyn UserStorage>,

    /// Environment super admin settings.
    pub admin: AdminConfig,

    /// Session cookie settings.
    pub cookie: CookieConfig,
}

impl FromRef<AuthHttpState> for AuthState {
    fn from_ref(state: &AuthHttpState) -> Self {
        AuthState::new(state.auth.clone(), state.cache.clone())
    }
}

/// Public projection of a user; never carries the password digest.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    /// User id.
    pub id: String,

    /// Email address.
    pub email: String,

    /// Username.
    pub username: String,

    /// First name.
    #[serde(rename = "firstName")]
    pub first_name: String,

    /// Last name.
    #[serde(rename = "lastName")]
    pub last_name: String,

    /// Role.
    pub role: Role,

    /// Avatar URL, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            avatar: user.avatar.clone(),
        }
    }
}

/// Body returned by login and register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The authenticated user.
    pub user: UserResponse,

    /// The issued session token.
    pub token: String,
}

/// Generic message body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}
