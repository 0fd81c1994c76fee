//! Strongly-typed ID wrappers
//!
//! Each entity gets its own UUID newtype so an expense id can never be passed
//! where a category id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Short form shown to users: prefix plus the first 8 hex digits
            pub fn short(&self) -> String {
                format!("{}{}", $display_prefix, &self.0.to_string()[..8])
            }

            /// Whether a user-typed identifier refers to this ID
            ///
            /// Accepts the full UUID, the short form, or any hex prefix of at
            /// least 4 characters, with or without the display prefix.
            pub fn matches(&self, identifier: &str) -> bool {
                let needle = identifier.trim().to_lowercase();
                let needle = needle.strip_prefix($display_prefix).unwrap_or(&needle);
                needle.len() >= 4 && self.0.to_string().starts_with(needle)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.short())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(UserId, "usr-");
define_id!(ExpenseId, "exp-");
define_id!(CategoryId, "cat-");
define_id!(SharedUserId, "shr-");
