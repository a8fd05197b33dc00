use crate::error::{ClassifiedError, Kind};
use crate::store::{EntityId, EntityStore};

use super::User;

/// Typed store for user accounts.
///
/// Wraps an [`EntityStore`] configured with a case-insensitive email
/// uniqueness key. Constructed once at startup and shared by reference
/// (typically `Arc`) with every consumer; there are no global instances.
pub struct UserStore {
    inner: EntityStore<User>,
}

impl UserStore {
    pub fn new() -> Self {
        UserStore {
            inner: EntityStore::with_unique_key(|user: &User| Some(user.email.to_lowercase())),
        }
    }

    /// Reset to a seed state (or empty). Startup only.
    pub fn initialize(&self, seed: Vec<User>) -> Result<(), ClassifiedError> {
        self.inner.initialize(seed)
    }

    /// Register a new account, allocating its identifier.
    ///
    /// `AlreadyExists` if the email already belongs to a live account,
    /// compared case-insensitively.
    pub fn register(&self, user: User) -> Result<User, ClassifiedError> {
        self.inner.add(user).map_err(|err| {
            if err.is_kind(Kind::AlreadyExists) {
                err.with_client("a user with this email is already registered")
            } else {
                err
            }
        })
    }

    pub fn get(&self, id: EntityId) -> Result<User, ClassifiedError> {
        self.inner.get(id)
    }

    /// Replace an existing account record. The email uniqueness
    /// constraint still applies against other accounts.
    pub fn update(&self, user: User) -> Result<User, ClassifiedError> {
        self.inner.update(user).map_err(|err| {
            if err.is_kind(Kind::AlreadyExists) {
                err.with_client("a user with this email is already registered")
            } else {
                err
            }
        })
    }

    pub fn remove(&self, id: EntityId) -> Result<User, ClassifiedError> {
        self.inner.remove(id)
    }

    /// Look up an account by email, case-insensitively. Absence is a
    /// routine outcome, not an error.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, ClassifiedError> {
        let needle = email.to_lowercase();
        self.inner
            .find_first(|user| user.email.to_lowercase() == needle)
    }

    pub fn all(&self) -> Result<Vec<User>, ClassifiedError> {
        self.inner.all()
    }

    pub fn len(&self) -> Result<usize, ClassifiedError> {
        self.inner.len()
    }

    pub fn is_empty(&self) -> Result<bool, ClassifiedError> {
        self.inner.is_empty()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
