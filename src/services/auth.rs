//! Registration and login
//!
//! Password hashes use the Argon2 PHC string format. Login resolves a
//! username/password pair into a `UserIdentity`; the rest of the crate only
//! ever sees that projection, never the stored hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::error::{SpendlogError, SpendlogResult};
use crate::models::{User, UserIdentity};
use crate::storage::UserStore;

const MIN_USERNAME_LEN: usize = 4;
const MIN_PASSWORD_LEN: usize = 8;

/// Service handling account registration and login
pub struct AuthService<'a> {
    users: &'a UserStore,
}

impl<'a> AuthService<'a> {
    /// Create a new auth service
    pub fn new(users: &'a UserStore) -> Self {
        Self { users }
    }

    /// Register a new account
    ///
    /// The password is asked for twice; both entries must match.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        password_confirm: &str,
    ) -> SpendlogResult<UserIdentity> {
        let username = username.trim();

        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(SpendlogError::Auth(format!(
                "Username must be at least {} characters long",
                MIN_USERNAME_LEN
            )));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SpendlogError::Auth(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(SpendlogError::Auth(
                "Password must contain at least one number".to_string(),
            ));
        }
        if password != password_confirm {
            return Err(SpendlogError::Auth("Passwords do not match".to_string()));
        }
        if self.users.find_by_username(username)?.is_some() {
            return Err(SpendlogError::Auth(
                "Username is already taken".to_string(),
            ));
        }

        let hash = hash_password(password)?;
        let mut user = User::new(username, hash, Utc::now().naive_utc());
        self.users.save(&mut user)?;

        Option::<UserIdentity>::from(&user)
            .ok_or_else(|| SpendlogError::Storage("User saved without an identifier".to_string()))
    }

    /// Verify credentials and return the account's identity
    pub fn login(&self, username: &str, password: &str) -> SpendlogResult<UserIdentity> {
        let username = username.trim();

        if username.is_empty() {
            return Err(SpendlogError::Auth("Username is required".to_string()));
        }
        if password.is_empty() {
            return Err(SpendlogError::Auth("Password is required".to_string()));
        }

        let user = self
            .users
            .find_by_username(username)?
            .ok_or_else(|| {
                SpendlogError::Auth("No account found with this username".to_string())
            })?;

        verify_password(password, &user.password_hash)?;

        Option::<UserIdentity>::from(&user)
            .ok_or_else(|| SpendlogError::Storage("User record has no identifier".to_string()))
    }

    /// Resolve a username to an identity without a password check
    ///
    /// Used by commands that act on behalf of an already-known local account.
    pub fn identity_for(&self, username: &str) -> SpendlogResult<UserIdentity> {
        let user = self
            .users
            .find_by_username(username.trim())?
            .ok_or_else(|| SpendlogError::user_not_found(username.trim()))?;

        Option::<UserIdentity>::from(&user)
            .ok_or_else(|| SpendlogError::Storage("User record has no identifier".to_string()))
    }
}

fn hash_password(password: &str) -> SpendlogResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SpendlogError::Auth(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, stored_hash: &str) -> SpendlogResult<()> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| SpendlogError::Auth(format!("Stored password hash is invalid: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| SpendlogError::Auth("Incorrect password".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service(temp_dir: &TempDir) -> UserStore {
        let store = UserStore::new(temp_dir.path().join("users.json"));
        store.load().unwrap();
        store
    }

    #[test]
    fn test_register_and_login() {
        let temp_dir = TempDir::new().unwrap();
        let store = service(&temp_dir);
        let auth = AuthService::new(&store);

        let registered = auth.register("alice", "hunter2secret", "hunter2secret").unwrap();
        assert_eq!(registered.username, "alice");

        let identity = auth.login("alice", "hunter2secret").unwrap();
        assert_eq!(identity, registered);
    }

    #[test]
    fn test_register_rejects_weak_credentials() {
        let temp_dir = TempDir::new().unwrap();
        let store = service(&temp_dir);
        let auth = AuthService::new(&store);

        let err = auth.register("al", "hunter2secret", "hunter2secret").unwrap_err();
        assert_eq!(err.to_string(), "Username must be at least 4 characters long");

        let err = auth.register("alice", "short1", "short1").unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 8 characters long");

        let err = auth
            .register("alice", "nodigitshere", "nodigitshere")
            .unwrap_err();
        assert_eq!(err.to_string(), "Password must contain at least one number");

        let err = auth
            .register("alice", "hunter2secret", "hunter2other")
            .unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_register_rejects_taken_username() {
        let temp_dir = TempDir::new().unwrap();
        let store = service(&temp_dir);
        let auth = AuthService::new(&store);

        auth.register("alice", "hunter2secret", "hunter2secret").unwrap();
        let err = auth.register("alice", "different9pass", "different9pass").unwrap_err();
        assert_eq!(err.to_string(), "Username is already taken");
    }

    #[test]
    fn test_login_failures() {
        let temp_dir = TempDir::new().unwrap();
        let store = service(&temp_dir);
        let auth = AuthService::new(&store);
        auth.register("alice", "hunter2secret", "hunter2secret").unwrap();

        let err = auth.login("", "hunter2secret").unwrap_err();
        assert_eq!(err.to_string(), "Username is required");

        let err = auth.login("alice", "").unwrap_err();
        assert_eq!(err.to_string(), "Password is required");

        let err = auth.login("bob", "hunter2secret").unwrap_err();
        assert_eq!(err.to_string(), "No account found with this username");

        let err = auth.login("alice", "wrongpass99").unwrap_err();
        assert_eq!(err.to_string(), "Incorrect password");
    }

    #[test]
    fn test_stored_hash_is_not_the_password() {
        let temp_dir = TempDir::new().unwrap();
        let store = service(&temp_dir);
        let auth = AuthService::new(&store);
        auth.register("alice", "hunter2secret", "hunter2secret").unwrap();

        let user = store.find_by_username("alice").unwrap().unwrap();
        assert_ne!(user.password_hash, "hunter2secret");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[test]
    fn test_identity_for_unknown_user() {
        let temp_dir = TempDir::new().unwrap();
        let store = service(&temp_dir);
        let auth = AuthService::new(&store);

        assert!(auth.identity_for("ghost").unwrap_err().is_not_found());
    }
}
