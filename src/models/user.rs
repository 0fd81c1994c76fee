//! Registered user accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

/// A local account. `password_hash` is an Argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Emails are compared case-insensitively
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_email_ignores_case() {
        let user = User::new("Ana", "Ana@Example.com", "hash".into());
        assert!(user.has_email("ana@example.com"));
        assert!(user.has_email(" ANA@EXAMPLE.COM "));
        assert!(!user.has_email("bo@example.com"));
    }
}
