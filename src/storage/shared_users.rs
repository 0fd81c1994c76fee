//! Shared member repository, persisted to data/shared_users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SpendwiseError;
use crate::models::{SharedUser, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_poisoned;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SharedUserData {
    shared_users: Vec<SharedUser>,
}

/// Member lists keyed by owning user
pub struct SharedUserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, Vec<SharedUser>>>,
}

impl SharedUserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), SpendwiseError> {
        let file_data: SharedUserData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(lock_poisoned)?;

        data.clear();
        for member in file_data.shared_users {
            data.entry(member.owner_id).or_default().push(member);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;

        let mut owners: Vec<_> = data.keys().copied().collect();
        owners.sort();
        let shared_users = owners
            .iter()
            .filter_map(|owner| data.get(owner))
            .flat_map(|members| members.iter().cloned())
            .collect();

        write_json_atomic(&self.path, &SharedUserData { shared_users })
    }

    pub fn get_by_owner(&self, owner_id: UserId) -> Result<Vec<SharedUser>, SpendwiseError> {
        let data = self.data.read().map_err(lock_poisoned)?;
        Ok(data.get(&owner_id).cloned().unwrap_or_default())
    }

    /// Replace an owner's whole member list, returning the previous one
    pub fn replace_for_owner(
        &self,
        owner_id: UserId,
        members: Vec<SharedUser>,
    ) -> Result<Vec<SharedUser>, SpendwiseError> {
        let mut data = self.data.write().map_err(lock_poisoned)?;

        let previous = if members.is_empty() {
            data.remove(&owner_id)
        } else {
            data.insert(owner_id, members)
        };

        Ok(previous.unwrap_or_default())
    }
}
