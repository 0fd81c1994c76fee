//! Shared budgeting members
//!
//! A member is just a name and email recorded against the owning account. The
//! owner's member list is always replaced as a whole.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{SharedUserId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedUser {
    pub id: SharedUserId,
    pub owner_id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl SharedUser {
    pub fn new(owner_id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: SharedUserId::new(),
            owner_id,
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), SharedUserValidationError> {
        if self.name.is_empty() {
            return Err(SharedUserValidationError::EmptyName);
        }

        if !is_plausible_email(&self.email) {
            return Err(SharedUserValidationError::InvalidEmail(self.email.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for SharedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Minimal shape check: one `@` with text on both sides and no whitespace
pub fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedUserValidationError {
    EmptyName,
    InvalidEmail(String),
}

impl fmt::Display for SharedUserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Member name cannot be empty"),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: '{}'", email),
        }
    }
}

impl std::error::Error for SharedUserValidationError {}
