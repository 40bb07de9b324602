//! Concurrent user store.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::StoreError;
use crate::models::User;

/// Users keyed by id.
///
/// Records are only ever added. Creation checks and inserts under the
/// same shard lock, so concurrent creates of one id cannot both succeed.
#[derive(Debug, Default)]
pub struct UserStore {
    users: DashMap<String, User>,
}

impl UserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the startup records.
    pub fn seeded() -> Self {
        let store = Self::new();
        for user in User::seeds() {
            store.users.insert(user.id.clone(), user);
        }
        store
    }

    /// Look up a user by id.
    pub fn get(&self, id: &str) -> Option<User> {
        self.users.get(id).map(|entry| entry.value().clone())
    }

    /// Insert a new user, rejecting an id that is already taken.
    pub fn create(&self, user: User) -> Result<User, StoreError> {
        match self.users.entry(user.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateId(user.id)),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
