//! Configuration: path resolution and persisted settings

pub mod paths;
pub mod settings;

pub use paths::SpendwisePaths;
pub use settings::Settings;
