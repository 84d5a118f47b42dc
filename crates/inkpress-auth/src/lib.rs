//! # inkpress-auth
//!
//! Session and authentication core for the Inkpress blog CMS.
//!
//! This crate provides:
//! - A compact HS256 session token codec (issue/verify)
//! - Password digesting and credential verification
//! - A fail-open session cache for low-latency re-verification
//! - A role hierarchy with pure authorization predicates
//! - Axum extractors and handlers for the auth endpoints
//!
//! ## Overview
//!
//! A login exchanges credentials for a signed session token carried in an
//! `HttpOnly` cookie or a `Bearer` header. Subsequent requests verify the
//! token, consulting the session cache first, and consult the role
//! hierarchy before touching content. Logout invalidates the cache entry;
//! the stateless token dies on its own expiry.
//!
//! ## Modules
//!
//! - [`config`] - Auth configuration (secret, lifetimes, cookie, admin)
//! - [`token`] - Session token claims and codec
//! - [`service`] - Credential and token lifecycle service
//! - [`session`] - Cache-backed session fast path
//! - [`permissions`] - Role hierarchy and predicates
//! - [`storage`] - Storage traits for auth-related data
//! - [`middleware`] - Axum extractors for authenticated routes
//! - [`http`] - Axum handlers for the auth endpoints

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod permissions;
pub mod service;
pub mod session;
pub mod storage;
pub mod token;

pub use config::{AdminConfig, AuthConfig, ConfigError, CookieConfig, INSECURE_DEV_SECRET};
pub use error::{AuthError, ErrorCategory};
pub use http::{
    AuthHttpState, AuthResponse, LoginRequest, MeResponse, MessageResponse, RegisterRequest,
    SUPER_ADMIN_ID, UserResponse, login_handler, logout_handler, me_handler, register_handler,
};
pub use middleware::{AdminAuth, AuthContext, AuthState, SessionAuth};
pub use permissions::{Role, RoleParseError};
pub use service::AuthService;
pub use session::{CachedSession, SessionCache, SessionStore};
pub use storage::{User, UserBuilder, UserStorage};
pub use token::{InvalidToken, SessionClaims, TokenCodec};

/// Type alias for auth results.
pub type AuthResult<T> = Result<T, AuthError>;
