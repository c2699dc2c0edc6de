//! Domain models for expenses, their categories, and reminders.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::currency::{ConversionTable, Currency};

/// Fixed set of spending categories an expense can belong to.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Savings,
    Housing,
    Food,
    Transportation,
    Utilities,
    Entertainment,
    Healthcare,
    Shopping,
    Subscriptions,
    #[default]
    Other,
}

impl ExpenseCategory {
    /// Every category in declaration order. Aggregations that need a
    /// deterministic tie-break walk this list.
    pub const ALL: [ExpenseCategory; 10] = [
        ExpenseCategory::Savings,
        ExpenseCategory::Housing,
        ExpenseCategory::Food,
        ExpenseCategory::Transportation,
        ExpenseCategory::Utilities,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Shopping,
        ExpenseCategory::Subscriptions,
        ExpenseCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Savings => "Savings",
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Healthcare => "Healthcare",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Subscriptions => "Subscriptions",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How often a reminder repeats after its first due date.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    #[default]
    Once,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for ReminderFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReminderFrequency::Once => "Once",
            ReminderFrequency::Daily => "Daily",
            ReminderFrequency::Weekly => "Weekly",
            ReminderFrequency::Monthly => "Monthly",
            ReminderFrequency::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

/// Reminder attached to a single expense; it has no lifecycle of its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub frequency: ReminderFrequency,
}

impl Reminder {
    pub fn new(due_at: DateTime<Utc>, frequency: ReminderFrequency) -> Self {
        Self { due_at, frequency }
    }

    /// A one-off reminder is pending only until it fires; repeating ones stay pending.
    pub fn is_pending(&self, now: DateTime<Utc>) -> bool {
        match self.frequency {
            ReminderFrequency::Once => self.due_at >= now,
            _ => true,
        }
    }
}

/// A single recorded cost against a budget.
///
/// `interest_rate` and `expected_annual_return` are kept as the raw text the
/// user typed. Only the projection engine parses them, because an empty or
/// unparseable value must fall through to the next rate source instead of
/// reading as zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_essential: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<Reminder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_annual_return: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_balance: Option<f64>,
}

impl Expense {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        currency: Currency,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            currency,
            category,
            date,
            is_essential: false,
            notes: String::new(),
            reminder: None,
            interest_rate: None,
            expected_annual_return: None,
            starting_balance: None,
        }
    }

    pub fn essential(mut self, is_essential: bool) -> Self {
        self.is_essential = is_essential;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_reminder(mut self, reminder: Reminder) -> Self {
        self.reminder = Some(reminder);
        self
    }

    pub fn with_interest_rate(mut self, rate: impl Into<String>) -> Self {
        self.set_interest_rate(Some(rate.into()));
        self
    }

    pub fn with_expected_annual_return(mut self, rate: impl Into<String>) -> Self {
        self.set_expected_annual_return(Some(rate.into()));
        self
    }

    pub fn with_starting_balance(mut self, balance: f64) -> Self {
        self.starting_balance = Some(balance);
        self
    }

    /// Sets the interest rate text. A non-empty value clears the expected return.
    pub fn set_interest_rate(&mut self, rate: Option<String>) {
        if rate.as_deref().is_some_and(|text| !text.trim().is_empty()) {
            self.expected_annual_return = None;
        }
        self.interest_rate = rate;
    }

    /// Sets the expected return text. A non-empty value clears the interest rate.
    pub fn set_expected_annual_return(&mut self, rate: Option<String>) {
        if rate.as_deref().is_some_and(|text| !text.trim().is_empty()) {
            self.interest_rate = None;
        }
        self.expected_annual_return = rate;
    }

    pub fn is_savings(&self) -> bool {
        self.category == ExpenseCategory::Savings
    }

    pub fn converted_amount(&self, target: Currency, rates: &ConversionTable) -> f64 {
        rates.convert(self.amount, self.currency, target)
    }

    /// Converted starting balance, or `None` when no balance was recorded.
    pub fn converted_starting_balance(
        &self,
        target: Currency,
        rates: &ConversionTable,
    ) -> Option<f64> {
        self.starting_balance
            .map(|balance| rates.convert(balance, self.currency, target))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name_and_amount(&self.name, self.amount)
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Expense {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!("{} ({}, {})", self.name, self.category, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Expense {
        Expense::new(
            "Emergency fund",
            100.0,
            Currency::Usd,
            ExpenseCategory::Savings,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
    }

    #[test]
    fn setting_one_rate_clears_the_other() {
        let mut expense = sample().with_interest_rate("4.5");
        expense.set_expected_annual_return(Some("7".into()));
        assert_eq!(expense.interest_rate, None);
        assert_eq!(expense.expected_annual_return.as_deref(), Some("7"));

        expense.set_interest_rate(Some("3".into()));
        assert_eq!(expense.expected_annual_return, None);
    }

    #[test]
    fn blank_rate_does_not_clear_the_other() {
        let mut expense = sample().with_interest_rate("4.5");
        expense.set_expected_annual_return(Some("   ".into()));
        assert_eq!(expense.interest_rate.as_deref(), Some("4.5"));
    }

    #[test]
    fn starting_balance_conversion_preserves_absence() {
        let rates = ConversionTable::new().with_rate(Currency::Usd, Currency::Eur, 0.5);
        let expense = sample();
        assert_eq!(expense.converted_starting_balance(Currency::Eur, &rates), None);
        let expense = expense.with_starting_balance(200.0);
        assert_eq!(
            expense.converted_starting_balance(Currency::Eur, &rates),
            Some(100.0)
        );
        assert_eq!(expense.converted_amount(Currency::Eur, &rates), 50.0);
    }

    #[test]
    fn one_off_reminder_expires_after_due_date() {
        let due = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 4, 30, 9, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
        let once = Reminder::new(due, ReminderFrequency::Once);
        assert!(once.is_pending(before));
        assert!(!once.is_pending(after));
        let monthly = Reminder::new(due, ReminderFrequency::Monthly);
        assert!(monthly.is_pending(after));
    }

    #[test]
    fn optional_fields_are_omitted_and_defaulted() {
        let expense = sample();
        let json = serde_json::to_value(&expense).unwrap();
        assert!(json.get("interest_rate").is_none());
        assert_eq!(json["category"], "savings");

        let minimal = serde_json::json!({
            "id": expense.id,
            "name": "Coffee",
            "amount": 3.5,
            "date": "2024-03-02"
        });
        let parsed: Expense = serde_json::from_value(minimal).unwrap();
        assert_eq!(parsed.currency, Currency::Usd);
        assert_eq!(parsed.category, ExpenseCategory::Other);
        assert!(parsed.notes.is_empty());
    }
}
