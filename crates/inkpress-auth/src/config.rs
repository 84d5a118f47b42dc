//! Authentication configuration.
//!
//! All knobs of the auth core live here: the signing secret, token and
//! cache lifetimes, the session cookie contract, and the optional
//! environment-provisioned super admin.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Development-only signing secret used when `allow_insecure_secret` is set
/// and no real secret is configured.
pub const INSECURE_DEV_SECRET: &str = "fallback-secret-change-in-production";

/// Root authentication configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// secret = "…at least 32 random bytes…"
/// token_lifetime = "24h"
/// cache_ttl = "5m"
///
/// [auth.admin]
/// email = "root@example.com"
/// password = "…"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC signing secret for session tokens.
    ///
    /// Required. Startup must fail when this is empty unless
    /// `allow_insecure_secret` is explicitly enabled.
    pub secret: String,

    /// Opt-in for the insecure development fallback secret.
    ///
    /// Never enable outside local development.
    pub allow_insecure_secret: bool,

    /// Session token validity window. Fixed per deployment, not per call.
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,

    /// Session cache entry TTL, independent of the token's own expiry.
    #[serde(with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Session cookie settings.
    pub cookie: CookieConfig,

    /// Optional super admin provisioned from the environment.
    pub admin: AdminConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            allow_insecure_secret: false,
            token_lifetime: Duration::from_secs(86_400), // 24 hours
            cache_ttl: Duration::from_secs(300),         // 5 minutes
            cookie: CookieConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The secret is empty and the insecure fallback was not opted into
    /// - A lifetime is zero
    /// - The cookie name is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() && !self.allow_insecure_secret {
            return Err(ConfigError::Missing(
                "auth.secret (set allow_insecure_secret = true to use the development fallback)"
                    .to_string(),
            ));
        }

        if self.token_lifetime.is_zero() {
            return Err(ConfigError::InvalidValue(
                "auth.token_lifetime must be > 0".to_string(),
            ));
        }

        if self.cache_ttl.is_zero() {
            return Err(ConfigError::InvalidValue(
                "auth.cache_ttl must be > 0".to_string(),
            ));
        }

        if self.cookie.name.is_empty() {
            return Err(ConfigError::InvalidValue(
                "auth.cookie.name must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the signing secret, falling back to the development default
    /// when the insecure opt-in is active.
    #[must_use]
    pub fn effective_secret(&self) -> &str {
        if self.secret.is_empty() {
            INSECURE_DEV_SECRET
        } else {
            &self.secret
        }
    }

    /// Returns `true` if the development fallback secret would be used.
    #[must_use]
    pub fn uses_insecure_secret(&self) -> bool {
        self.secret.is_empty()
    }
}

/// Session cookie configuration.
///
/// The defaults encode the cookie security contract: `HttpOnly` (no script
/// access), `Secure` (HTTPS only), `SameSite=Lax` (no cross-site sends),
/// scoped to `/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Cookie name.
    pub name: String,

    /// Set the `HttpOnly` attribute.
    pub http_only: bool,

    /// Set the `Secure` attribute.
    pub secure: bool,

    /// `SameSite` attribute value.
    pub same_site: String,

    /// Cookie path.
    pub path: String,

    /// Cookie lifetime (`Max-Age`).
    #[serde(with = "humantime_serde")]
    pub max_age: Duration,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "auth_token".to_string(),
            http_only: true,
            secure: true,
            same_site: "Lax".to_string(),
            path: "/".to_string(),
            max_age: Duration::from_secs(86_400),
        }
    }
}

impl CookieConfig {
    /// Builds the `Set-Cookie` value carrying a session token.
    #[must_use]
    pub fn build_cookie(&self, token: &str) -> String {
        self.format_cookie(token, self.max_age.as_secs())
    }

    /// Builds the `Set-Cookie` value that clears the session cookie.
    #[must_use]
    pub fn build_clear_cookie(&self) -> String {
        self.format_cookie("", 0)
    }

    fn format_cookie(&self, value: &str, max_age: u64) -> String {
        let mut cookie = format!("{}={}", self.name, value);
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site));
        cookie.push_str(&format!("; Max-Age={}", max_age));
        cookie.push_str(&format!("; Path={}", self.path));
        cookie
    }
}

/// Super admin credentials provisioned from the environment.
///
/// When `email` and `password` are both set, a login with exactly those
/// credentials authenticates as the fixed `super-admin` principal with the
/// admin role, without consulting user storage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Super admin email. Unset disables the super admin.
    pub email: Option<String>,

    /// Super admin password, compared verbatim.
    pub password: Option<String>,

    /// Display username for the super admin.
    pub username: String,

    /// Display first name.
    pub first_name: String,

    /// Display last name.
    pub last_name: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: None,
            password: None,
            username: "admin".to_string(),
            first_name: "Super".to_string(),
            last_name: "Admin".to_string(),
        }
    }
}

impl AdminConfig {
    /// Returns `true` if both credentials are configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }

    /// Checks a credential pair against the configured super admin.
    ///
    /// Email comparison is case-insensitive; password comparison is exact.
    #[must_use]
    pub fn matches(&self, email: &str, password: &str) -> bool {
        match (&self.email, &self.password) {
            (Some(admin_email), Some(admin_password)) => {
                admin_email.eq_ignore_ascii_case(email) && admin_password == password
            }
            _ => false,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}
