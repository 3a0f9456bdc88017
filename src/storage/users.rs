//! User store backed by a JSON file

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{SpendlogError, SpendlogResult};
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable user data structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserData {
    next_id: i64,
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserStore {
    path: PathBuf,
    data: RwLock<HashMap<i64, User>>,
    next_id: RwLock<i64>,
}

impl UserStore {
    /// Create a new user store
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            next_id: RwLock::new(1),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> SpendlogResult<()> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self.write_data()?;
        let mut next_id = self
            .next_id
            .write()
            .map_err(|e| SpendlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        let mut max_id = 0;
        for user in file_data.users {
            if let Some(id) = user.id {
                max_id = max_id.max(id.0);
                data.insert(id.0, user);
            }
        }

        *next_id = file_data.next_id.max(max_id + 1).max(1);
        Ok(())
    }

    fn write_data(&self) -> SpendlogResult<std::sync::RwLockWriteGuard<'_, HashMap<i64, User>>> {
        self.data
            .write()
            .map_err(|e| SpendlogError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn read_data(&self) -> SpendlogResult<std::sync::RwLockReadGuard<'_, HashMap<i64, User>>> {
        self.data
            .read()
            .map_err(|e| SpendlogError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn persist(&self, data: &HashMap<i64, User>, next_id: i64) -> SpendlogResult<()> {
        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by_key(|u| u.id.map(|id| id.0).unwrap_or_default());

        write_json_atomic(&self.path, &UserData { next_id, users })
    }

    /// Persist a user, assigning an identifier on first save
    pub fn save(&self, user: &mut User) -> SpendlogResult<()> {
        let mut data = self.write_data()?;
        let mut next_id = self
            .next_id
            .write()
            .map_err(|e| SpendlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let (id, assigned) = match user.id {
            Some(id) => (id, false),
            None => {
                let id = UserId(*next_id);
                user.id = Some(id);
                *next_id += 1;
                (id, true)
            }
        };

        let previous = data.insert(id.0, user.clone());

        if let Err(e) = self.persist(&data, *next_id) {
            match previous {
                Some(old) => {
                    data.insert(id.0, old);
                }
                None => {
                    data.remove(&id.0);
                }
            }
            if assigned {
                user.id = None;
                *next_id -= 1;
            }
            return Err(e);
        }

        Ok(())
    }

    /// Look up a user by identifier
    pub fn find(&self, id: UserId) -> SpendlogResult<Option<User>> {
        let data = self.read_data()?;
        Ok(data.get(&id.0).cloned())
    }

    /// Look up a user by username (exact match)
    pub fn find_by_username(&self, username: &str) -> SpendlogResult<Option<User>> {
        let data = self.read_data()?;
        Ok(data.values().find(|u| u.username == username).cloned())
    }
}
