//! Data export
//!
//! - JSON and YAML: everything belonging to one user, minus the password hash
//! - CSV: that user's expenses, one row each

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_expenses_csv;
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
