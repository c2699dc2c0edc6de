use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DATA_DIR_NAME: &str = "budgetwise";
const HOME_DIR_NAME: &str = ".budgetwise";

/// User preferences plus the limits the budget store enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// ISO code offered as the default currency for new budgets.
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_expense_limit")]
    pub expense_limit: usize,
    #[serde(default = "Config::default_max_selected_insights")]
    pub max_selected_insights: usize,
    #[serde(default = "Config::default_storage_key")]
    pub storage_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the collection snapshot and its backups.
    pub data_root: Option<PathBuf>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            expense_limit: Self::default_expense_limit(),
            max_selected_insights: Self::default_max_selected_insights(),
            storage_key: Self::default_storage_key(),
            data_root: None,
            backup_retention: Self::default_backup_retention(),
        }
    }
}

impl Config {
    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_expense_limit() -> usize {
        10
    }

    pub fn default_max_selected_insights() -> usize {
        6
    }

    pub fn default_storage_key() -> String {
        "budgets".into()
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }

        if let Some(base) = dirs::data_dir() {
            return base.join(DATA_DIR_NAME);
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HOME_DIR_NAME)
    }
}
