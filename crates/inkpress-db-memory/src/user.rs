//! In-memory user storage.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use time::OffsetDateTime;

use inkpress_auth::{AuthError, AuthResult, User, UserStorage};

/// In-memory [`UserStorage`] keyed by user id.
///
/// Email and username lookups scan the map; fine at the scale this backend
/// is meant for.
pub struct MemoryUserStorage {
    users: DashMap<String, User>,
}

impl MemoryUserStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Creates a store pre-populated with the given users.
    #[must_use]
    pub fn seeded(users: Vec<User>) -> Self {
        let store = Self::new();
        for user in users {
            store.users.insert(user.id.clone(), user);
        }
        store
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no users are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for MemoryUserStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStorage for MemoryUserStorage {
    async fn find_by_id(&self, id: &str) -> AuthResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.value().clone()))
    }

    async fn create(&self, user: &User) -> AuthResult<()> {
        match self.users.entry(user.id.clone()) {
            Entry::Occupied(_) => Err(AuthError::conflict("User already exists")),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }

    async fn update_last_login(&self, id: &str, at: OffsetDateTime) -> AuthResult<()> {
        if let Some(mut user) = self.users.get_mut(id) {
            user.last_login_at = Some(at);
            user.updated_at = at;
        }
        Ok(())
    }
}
