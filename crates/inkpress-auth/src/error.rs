//! Authentication and authorization error types.

use std::fmt;

/// Errors surfaced by the auth core.
///
/// Expected negative outcomes (a wrong password, a token that fails
/// verification) are reported through sentinel values (`None`) by the
/// services themselves; the variants here are what handlers and extractors
/// translate into HTTP responses. Credential and token failures are
/// deliberately message-free so callers cannot leak which check failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The supplied email/password pair did not authenticate.
    ///
    /// Covers unknown user, inactive user, and wrong password uniformly.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The presented session token failed verification.
    ///
    /// Covers malformed, tampered, and expired tokens uniformly.
    #[error("Invalid token")]
    InvalidToken,

    /// The request carried no usable credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of what was missing.
        message: String,
    },

    /// The authenticated user lacks the required role.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of the failed requirement.
        message: String,
    },

    /// The request body failed validation.
    #[error("Validation failed: {message}")]
    Validation {
        /// Description of the invalid field.
        message: String,
    },

    /// The request conflicts with existing state (e.g. duplicate user).
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// The requested entity does not exist.
    #[error("Not found: {message}")]
    NotFound {
        /// Description of what was missing.
        message: String,
    },

    /// A storage backend operation failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// The auth configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Forbidden` error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a new `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::InvalidToken
                | Self::Unauthorized { .. }
                | Self::Forbidden { .. }
                | Self::Validation { .. }
                | Self::Conflict { .. }
                | Self::NotFound { .. }
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Storage { .. } | Self::Configuration { .. } | Self::Internal { .. }
        )
    }

    /// Returns `true` if this is an authentication error.
    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::InvalidToken | Self::Unauthorized { .. }
        )
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCredentials | Self::InvalidToken | Self::Unauthorized { .. } => {
                ErrorCategory::Authentication
            }
            Self::Forbidden { .. } => ErrorCategory::Authorization,
            Self::Validation { .. } | Self::Conflict { .. } | Self::NotFound { .. } => {
                ErrorCategory::Validation
            }
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of auth errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Identity verification failures.
    Authentication,
    /// Permission check failures.
    Authorization,
    /// Request validation failures.
    Validation,
    /// Storage backend failures.
    Infrastructure,
    /// Configuration problems.
    Configuration,
    /// Unexpected internal errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Authorization => write!(f, "authorization"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
