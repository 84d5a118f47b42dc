//! User entity and storage trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AuthResult;
use crate::permissions::Role;

/// A registered user.
///
/// The password is stored only as a digest; the plaintext never reaches
/// storage. When exposing a user over the API, project it into a response
/// type that omits `password_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (UUID string).
    pub id: String,

    /// Email address, stored lowercase, unique.
    pub email: String,

    /// Username, unique.
    pub username: String,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Password digest (lowercase hex SHA-256).
    pub password_hash: String,

    /// Assigned role.
    pub role: Role,

    /// Optional avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Whether the account may authenticate.
    pub active: bool,

    /// Last successful login, if any.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login_at: Option<OffsetDateTime>,

    /// When the user was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the user was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Creates a builder for a new user.
    ///
    /// Generates a fresh UUID, defaults to the viewer role and an active
    /// account, and lowercases the email.
    #[must_use]
    pub fn builder(
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> UserBuilder {
        UserBuilder::new(email, username, password_hash)
    }
}

/// Builder for [`User`].
pub struct UserBuilder {
    email: String,
    username: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    role: Role,
    avatar: Option<String>,
    active: bool,
}

impl UserBuilder {
    fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into().to_lowercase(),
            username: username.into(),
            password_hash: password_hash.into(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Viewer,
            avatar: None,
            active: true,
        }
    }

    /// Sets the first and last name.
    #[must_use]
    pub fn name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets the avatar URL.
    #[must_use]
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Builds the user.
    #[must_use]
    pub fn build(self) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: uuid::Uuid::new_v4().to_string(),
            email: self.email,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash: self.password_hash,
            role: self.role,
            avatar: self.avatar,
            active: self.active,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Storage trait for users.
///
/// Lookup keys (email, username) are compared exactly as stored; callers
/// normalize email to lowercase before lookup and storage.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: &str) -> AuthResult<Option<User>>;

    /// Finds a user by (lowercase) email.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>>;

    /// Persists a new user.
    ///
    /// # Errors
    ///
    /// Returns a conflict error if a user with the same id already exists,
    /// or a storage error if the operation fails.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Records a successful login.
    ///
    /// Updating a user that no longer exists is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn update_last_login(&self, id: &str, at: OffsetDateTime) -> AuthResult<()>;
}
