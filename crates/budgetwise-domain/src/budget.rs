//! Spending envelopes and their derived metrics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::currency::{ConversionTable, Currency};
use crate::expense::Expense;

/// A named spending envelope with a target amount and the expenses recorded against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default = "Budget::default_is_monthly")]
    pub is_monthly: bool,
    pub start_month: u32,
    pub start_year: i32,
    #[serde(default = "Budget::default_is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Budget {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        currency: Currency,
        start_month: u32,
        start_year: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            currency,
            icon: String::new(),
            color: String::new(),
            is_monthly: Self::default_is_monthly(),
            start_month,
            start_year,
            is_active: Self::default_is_active(),
            expenses: Vec::new(),
        }
    }

    pub fn one_time(mut self) -> Self {
        self.is_monthly = false;
        self
    }

    pub fn with_appearance(mut self, icon: impl Into<String>, color: impl Into<String>) -> Self {
        self.icon = icon.into();
        self.color = color.into();
        self
    }

    /// Total of every expense, converted into the budget's currency.
    pub fn spent_amount(&self, rates: &ConversionTable) -> f64 {
        self.expenses
            .iter()
            .map(|expense| expense.converted_amount(self.currency, rates))
            .sum()
    }

    /// Target amount minus converted spend. Negative once the budget is overspent.
    pub fn remaining_amount(&self, rates: &ConversionTable) -> f64 {
        self.amount - self.spent_amount(rates)
    }

    /// Remaining share of the target as a whole percentage, clamped to `0..=100`.
    pub fn percent_remaining(&self, rates: &ConversionTable) -> u8 {
        if self.amount <= 0.0 {
            return 0;
        }
        let percent = (self.remaining_amount(rates) / self.amount * 100.0).round();
        percent.clamp(0.0, 100.0) as u8
    }

    pub fn is_over_budget(&self, rates: &ConversionTable) -> bool {
        self.remaining_amount(rates) < 0.0
    }

    /// First day of the budget's starting month, or `None` if the month is out of range.
    pub fn period_start(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start_year, self.start_month, 1)
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn expense_mut(&mut self, id: Uuid) -> Option<&mut Expense> {
        self.expenses.iter_mut().find(|expense| expense.id == id)
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name_and_amount(&self.name, self.amount)?;
        if !(1..=12).contains(&self.start_month) {
            return Err(ValidationError::InvalidStartMonth(self.start_month));
        }
        Ok(())
    }

    pub fn default_is_monthly() -> bool {
        true
    }

    pub fn default_is_active() -> bool {
        true
    }
}

impl Identifiable for Budget {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Budget {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Amounted for Budget {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Budget {
    fn display_label(&self) -> String {
        let cadence = if self.is_monthly { "monthly" } else { "one-time" };
        format!("{} ({}, {})", self.name, self.currency, cadence)
    }
}
