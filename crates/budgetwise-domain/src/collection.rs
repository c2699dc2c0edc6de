//! Serializable snapshot of every budget plus the collection settings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::budget::Budget;
use crate::settings::Settings;

const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetCollection {
    #[serde(default = "BudgetCollection::schema_version_default")]
    pub schema_version: u8,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub settings: Settings,
}

impl BudgetCollection {
    pub fn new() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            budgets: Vec::new(),
            settings: Settings::default(),
        }
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    pub fn budget_mut(&mut self, id: Uuid) -> Option<&mut Budget> {
        self.budgets.iter_mut().find(|budget| budget.id == id)
    }

    pub fn active_budgets(&self) -> impl Iterator<Item = &Budget> {
        self.budgets.iter().filter(|budget| budget.is_active)
    }

    pub fn expense_count(&self) -> usize {
        self.budgets.iter().map(Budget::expense_count).sum()
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl Default for BudgetCollection {
    fn default() -> Self {
        Self::new()
    }
}
