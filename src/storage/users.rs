//! User repository, persisted to data/users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SpendwiseError;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_poisoned;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for registered accounts
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), SpendwiseError> {
        let file_data: UserData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(lock_poisoned)?;

        data.clear();
        for user in file_data.users {
            data.insert(user.id, user);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        write_json_atomic(&self.path, &UserData { users })
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>, SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.get(&id).cloned())
    }

    /// Find a user by email, ignoring case
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>, SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.values().find(|u| u.has_email(email)).cloned())
    }

    pub fn upsert(&self, user: User) -> Result<(), SpendwiseError> {
        let mut data = self.data.write().map_err(lock_poisoned)?;
        data.insert(user.id, user);
        Ok(())
    }

    pub fn count(&self) -> Result<usize, SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.len())
    }
}
