use budgetwise_config::ConfigError;
use budgetwise_core::CoreError;
use thiserror::Error;

/// Top-level error for the `budgetwise` facade.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unknown currency code `{0}`")]
    UnknownCurrency(String),
}
