//! budgetwise-config
//!
//! User preferences and store limits, persisted as JSON next to the data root.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
