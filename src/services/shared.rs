//! Shared budgeting members
//!
//! The member list is replaced as a whole on every submission. Every entry is
//! validated before anything is removed, so a bad entry leaves the previous
//! list intact.

use crate::audit::{AuditEntry, EntityType};
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{SharedUser, UserId};
use crate::storage::Storage;

pub struct SharedBudgetService<'a> {
    storage: &'a Storage,
    owner: UserId,
}

impl<'a> SharedBudgetService<'a> {
    pub fn new(storage: &'a Storage, owner: UserId) -> Self {
        Self { storage, owner }
    }

    pub fn list_members(&self) -> SpendwiseResult<Vec<SharedUser>> {
        self.storage.shared_users.get_by_owner(self.owner)
    }

    /// Replace the owner's members with `(name, email)` pairs
    ///
    /// An empty list clears the members.
    pub fn replace_members(&self, members: &[(String, String)]) -> SpendwiseResult<Vec<SharedUser>> {
        let mut new_members = Vec::with_capacity(members.len());
        for (name, email) in members {
            let member = SharedUser::new(self.owner, name.as_str(), email.as_str());
            member
                .validate()
                .map_err(|e| SpendwiseError::Validation(e.to_string()))?;

            if new_members
                .iter()
                .any(|m: &SharedUser| m.email.eq_ignore_ascii_case(&member.email))
            {
                return Err(SpendwiseError::Duplicate {
                    entity_type: "Shared member",
                    identifier: member.email,
                });
            }
            new_members.push(member);
        }

        let previous = self
            .storage
            .shared_users
            .replace_for_owner(self.owner, new_members.clone())?;
        self.storage.shared_users.save()?;

        let removed = previous.iter().map(|m| {
            AuditEntry::delete(EntityType::SharedUser, m.id.to_string(), Some(m.to_string()), m)
        });
        let added = new_members.iter().map(|m| {
            AuditEntry::create(EntityType::SharedUser, m.id.to_string(), Some(m.to_string()), m)
        });
        let entries: Vec<_> = removed.chain(added).collect();
        self.storage.log_batch(&entries)?;

        log::info!(
            "replaced {} shared members with {}",
            previous.len(),
            new_members.len()
        );

        Ok(new_members)
    }
}
