//! Collection-wide settings persisted alongside the budgets.

use serde::{Deserialize, Serialize};

use crate::insight::InsightKind;

/// Number of insights selected on a fresh install.
pub const DEFAULT_SELECTED_INSIGHTS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// When false the presentation layer masks monetary values.
    #[serde(default = "Settings::default_true")]
    pub show_values: bool,
    /// Enforces the per-budget expense cap.
    #[serde(default = "Settings::default_true")]
    pub limit_expenses: bool,
    #[serde(default)]
    pub show_inactive_budgets: bool,
    #[serde(default = "Settings::default_selected_insights")]
    pub selected_insights: Vec<InsightKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_loan: Option<StudentLoan>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_values: true,
            limit_expenses: true,
            show_inactive_budgets: false,
            selected_insights: Self::default_selected_insights(),
            student_loan: None,
        }
    }
}

impl Settings {
    pub fn default_selected_insights() -> Vec<InsightKind> {
        InsightKind::ALL[..DEFAULT_SELECTED_INSIGHTS].to_vec()
    }

    fn default_true() -> bool {
        true
    }
}

/// Outstanding student-loan figures the user tracks next to their budgets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentLoan {
    pub balance: f64,
    /// Annual percentage rate as typed by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<String>,
    #[serde(default)]
    pub monthly_payment: f64,
}

impl StudentLoan {
    pub fn new(balance: f64, interest_rate: Option<String>, monthly_payment: f64) -> Self {
        Self {
            balance,
            interest_rate,
            monthly_payment,
        }
    }
}
