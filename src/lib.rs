//! Spendwise - personal expense tracking from the terminal
//!
//! Users record expenses against categories that carry a minimum and maximum
//! spending limit. Reports compare what was spent in a date range against
//! those limits.
//!
//! # Architecture
//!
//! - `config`: Paths and user settings
//! - `error`: Custom error types
//! - `models`: Users, categories, expenses and shared members
//! - `storage`: JSON file storage layer
//! - `store`: Async store traits consumed by reports
//! - `aggregator`: Pure spending totals and limit classification
//! - `services`: Business logic layer
//! - `reports`: Spending reports and terminal charts
//! - `audit`: Audit logging system
//! - `export`: JSON, YAML and CSV export
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use spendwise::config::{paths::SpendwisePaths, settings::Settings};
//!
//! let paths = SpendwisePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod aggregator;
pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;
pub mod store;

pub use error::{SpendwiseError, SpendwiseResult};
