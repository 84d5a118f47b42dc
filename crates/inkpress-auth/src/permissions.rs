//! Role hierarchy and authorization predicates.
//!
//! Roles form a total order (`viewer < editor < admin`) expressed through a
//! single numeric rank. All authorization decisions are pure functions over
//! roles; nothing in this module touches request state or storage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user's role within the CMS.
///
/// Roles are ranked; a higher-ranked role satisfies any requirement a
/// lower-ranked role satisfies. The one exception is user management,
/// which is tied to [`Role::Admin`] by identity rather than rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access. Default role for self-registered users.
    Viewer,
    /// Can create, edit, and delete blog content.
    Editor,
    /// Full access, including user management.
    Admin,
}

impl Role {
    /// Numeric rank used for ordering comparisons.
    ///
    /// Only the relative order matters; the magnitudes leave room for
    /// intermediate roles.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Viewer => 10,
            Self::Editor => 50,
            Self::Admin => 100,
        }
    }

    /// Returns `true` if this role satisfies the required role.
    #[must_use]
    pub fn has_role(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Returns `true` if this role may create or edit blog posts.
    #[must_use]
    pub fn can_edit_blogs(self) -> bool {
        self.has_role(Self::Editor)
    }

    /// Returns `true` if this role may delete blog posts.
    #[must_use]
    pub fn can_delete_blogs(self) -> bool {
        self.has_role(Self::Editor)
    }

    /// Returns `true` if this role may manage user accounts.
    ///
    /// Deliberately an identity check, not a rank comparison: user
    /// management stays admin-only even if a role outranking admin is
    /// ever introduced.
    #[must_use]
    pub fn can_manage_users(self) -> bool {
        self == Self::Admin
    }

    /// Returns the role name as stored in tokens and the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}
