//! User records.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique user id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email address.
    pub email_address: String,
}

impl User {
    /// Create a user record.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email_address: email_address.into(),
        }
    }

    /// Records present at startup.
    pub fn seeds() -> Vec<User> {
        vec![
            User::new("abcde12345", "Yamada", "yamada@example.com"),
            User::new("fghij67890", "Tanaka", "tanaka@example.com"),
        ]
    }
}
