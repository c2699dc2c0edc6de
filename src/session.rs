//! Wires configuration, the on-disk adapter and the budget store together.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use budgetwise_config::{Config, ConfigManager};
use budgetwise_core::{
    estimate_payoff, BudgetStore, Clock, InsightEntry, InsightReport, LoanPayoff,
    ProjectionPoint, StoreLimits, SystemClock,
};
use budgetwise_domain::{BudgetCollection, ConversionTable, Currency};
use budgetwise_storage_json::{BackupInfo, JsonFileStore};

use crate::errors::BudgetError;

const APP_DIR_NAME: &str = "budgetwise";

/// Counts surfaced by [`Session::status`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub data_file: PathBuf,
    pub budgets: usize,
    pub active_budgets: usize,
    pub expenses: usize,
    pub backups: usize,
}

/// An open budget collection backed by JSON files on disk.
pub struct Session {
    config: Config,
    config_manager: ConfigManager,
    store: BudgetStore<JsonFileStore>,
    rates: ConversionTable,
    clock: Box<dyn Clock>,
}

impl Session {
    /// Opens the session rooted in the platform config directory.
    pub fn open_default() -> Result<Self, BudgetError> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);
        Self::open(base)
    }

    /// Loads `<base>/config/config.json` and the collection under the configured data root.
    pub fn open(base: PathBuf) -> Result<Self, BudgetError> {
        let manager = ConfigManager::with_base_dir(base)?;
        Self::open_with(manager, SystemClock)
    }

    pub fn open_with(
        config_manager: ConfigManager,
        clock: impl Clock + 'static,
    ) -> Result<Self, BudgetError> {
        let config = config_manager.load()?;
        let root = config.resolve_data_root();
        let adapter = JsonFileStore::with_retention(&root, config.backup_retention)?;
        let limits = StoreLimits {
            expense_limit: config.expense_limit,
            max_selected_insights: config.max_selected_insights,
        };
        let store = BudgetStore::open_with_key(adapter, config.storage_key.clone(), limits)?;
        info!(
            root = %root.display(),
            budgets = store.budgets().len(),
            "session opened"
        );
        Ok(Self {
            config,
            config_manager,
            store,
            rates: ConversionTable::standard().clone(),
            clock: Box::new(clock),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    /// Persists a changed config. Limits and paths apply the next time a session opens.
    pub fn update_config(&mut self, config: Config) -> Result<(), BudgetError> {
        self.config_manager.save(&config)?;
        self.config = config;
        Ok(())
    }

    /// Currency offered for new budgets, parsed from the config.
    pub fn default_currency(&self) -> Result<Currency, BudgetError> {
        Currency::from_code(&self.config.currency)
            .ok_or_else(|| BudgetError::UnknownCurrency(self.config.currency.clone()))
    }

    pub fn store(&self) -> &BudgetStore<JsonFileStore> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut BudgetStore<JsonFileStore> {
        &mut self.store
    }

    pub fn rates(&self) -> &ConversionTable {
        &self.rates
    }

    pub fn rates_mut(&mut self) -> &mut ConversionTable {
        &mut self.rates
    }

    /// Current instant according to the session clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn report(&self) -> InsightReport {
        self.store.insights(&self.rates, self.now())
    }

    pub fn insights(&self) -> Vec<InsightEntry> {
        self.store.selected_insights(&self.rates, self.now())
    }

    pub fn projection_schedule(
        &self,
        budget_id: Uuid,
        expense_id: Uuid,
    ) -> Result<Vec<ProjectionPoint>, BudgetError> {
        let projection = self.store.savings_projection(budget_id, expense_id)?;
        Ok(projection.default_schedule(self.clock.today()))
    }

    /// `None` when no loan is tracked or the payment never clears it.
    pub fn loan_payoff(&self) -> Option<LoanPayoff> {
        self.store
            .settings()
            .student_loan
            .as_ref()
            .and_then(estimate_payoff)
    }

    pub fn data_file(&self) -> PathBuf {
        self.store.storage().path_for(&self.config.storage_key)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, BudgetError> {
        Ok(self.store.storage().list_backups(&self.config.storage_key)?)
    }

    /// Loads a backup into the store. The state being replaced is itself backed up on write.
    pub fn restore_backup(&mut self, backup: &BackupInfo) -> Result<(), BudgetError> {
        let collection = self.store.storage().read_backup(backup)?;
        self.store.replace_collection(collection)?;
        info!(backup = %backup.id, "backup restored");
        Ok(())
    }

    /// Writes the collection as pretty-printed JSON to an arbitrary path.
    pub fn export_to(&self, path: &Path) -> Result<(), BudgetError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self.store.collection())?;
        fs::write(path, json)?;
        debug!(path = %path.display(), "collection exported");
        Ok(())
    }

    /// Replaces the collection with one previously written by [`Session::export_to`].
    /// Files holding invalid budgets or expenses are refused and the store is left as it was.
    pub fn import_from(&mut self, path: &Path) -> Result<(), BudgetError> {
        let data = fs::read_to_string(path)?;
        let collection: BudgetCollection = serde_json::from_str(&data)?;
        self.store.replace_collection(collection)?;
        info!(path = %path.display(), "collection imported");
        Ok(())
    }

    pub fn status(&self) -> Result<SessionStatus, BudgetError> {
        let collection = self.store.collection();
        Ok(SessionStatus {
            data_file: self.data_file(),
            budgets: collection.budgets.len(),
            active_budgets: collection.active_budgets().count(),
            expenses: collection.expense_count(),
            backups: self.list_backups()?.len(),
        })
    }
}
