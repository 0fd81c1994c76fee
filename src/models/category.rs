//! Category model
//!
//! A category is a named spending bucket owned by one user, with a planned
//! minimum and maximum spend expressed in whole currency units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, UserId};
use super::money::MAX_UNITS;

/// Longest accepted category name
pub const MAX_CATEGORY_NAME_LEN: usize = 50;

/// A user-defined spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    /// The user this category belongs to
    pub owner_id: UserId,

    /// Category name, matched exactly against `Expense::category`
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Planned minimum spend (whole units)
    pub min_limit: i64,

    /// Planned maximum spend (whole units); zero means "no limit set"
    pub max_limit: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(owner_id: UserId, name: impl Into<String>, min_limit: i64, max_limit: i64) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            owner_id,
            name: name.into(),
            description: String::new(),
            min_limit,
            max_limit,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the maximum is usable for percentage displays
    pub fn has_max_limit(&self) -> bool {
        self.max_limit > 0
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(self.name.chars().count()));
        }

        if self.min_limit < 0 || self.max_limit < 0 {
            return Err(CategoryValidationError::NegativeLimit);
        }

        if self.min_limit > MAX_UNITS || self.max_limit > MAX_UNITS {
            return Err(CategoryValidationError::LimitTooLarge);
        }

        if self.min_limit > self.max_limit {
            return Err(CategoryValidationError::MinExceedsMax {
                min: self.min_limit,
                max: self.max_limit,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativeLimit,
    LimitTooLarge,
    MinExceedsMax { min: i64, max: i64 },
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Category name too long ({} chars, max {})",
                len, MAX_CATEGORY_NAME_LEN
            ),
            Self::NegativeLimit => write!(f, "Category limits cannot be negative"),
            Self::LimitTooLarge => {
                write!(f, "Category limits cannot exceed {}", MAX_UNITS)
            }
            Self::MinExceedsMax { min, max } => write!(
                f,
                "Category minimum limit ({}) exceeds its maximum limit ({})",
                min, max
            ),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
