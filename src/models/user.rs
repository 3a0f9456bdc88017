//! User account model and identity projection

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// A registered user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Storage-assigned identifier; None until persisted
    pub id: Option<UserId>,
    pub username: String,
    /// Argon2 PHC-string password hash
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn new(username: &str, password_hash: String, created_at: NaiveDateTime) -> Self {
        Self {
            id: None,
            username: username.to_string(),
            password_hash,
            created_at,
        }
    }
}

/// Read-only identity of the authenticated user
///
/// Owned by the auth boundary and passed by value into every service; the
/// core never authenticates, it only consumes the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub username: String,
}

impl UserIdentity {
    pub fn new(id: UserId, username: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
        }
    }
}

impl From<&User> for Option<UserIdentity> {
    fn from(user: &User) -> Self {
        user.id.map(|id| UserIdentity::new(id, &user.username))
    }
}
