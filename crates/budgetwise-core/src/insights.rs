//! Cross-budget insight aggregation.
//!
//! The aggregator pools every expense from the budgets it is handed and
//! computes each insight independently. Empty input never fails; every
//! insight has a zero or `None` default. Callers decide which budgets to pass
//! (normally the active ones) and whether to mask values when rendering.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use budgetwise_domain::{
    calendar_months_between, format_amount, format_percent, Budget, ConversionTable, Currency,
    Expense, ExpenseCategory, InsightKind,
};

/// Placeholder shown instead of monetary values when values are hidden.
pub const MASKED_VALUE: &str = "••••";

const NONE_LABEL: &str = "None";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    /// Sum in the report's primary currency.
    pub total: f64,
}

/// Identifies one expense picked out by an insight, with its raw amount and currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub budget_id: Uuid,
    pub expense_id: Uuid,
    pub name: String,
    pub amount: f64,
    pub currency: Currency,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
}

impl ExpenseSummary {
    fn new(budget_id: Uuid, expense: &Expense) -> Self {
        Self {
            budget_id,
            expense_id: expense.id,
            name: expense.name.clone(),
            amount: expense.amount,
            currency: expense.currency,
            category: expense.category,
            date: expense.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CurrencyExposure {
    /// Distinct currencies across all pooled expenses.
    pub currencies: usize,
    /// Share of spend, after conversion, recorded outside the primary currency.
    pub foreign_share: f64,
}

/// Typed value of a single insight, before formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InsightValue {
    Percent(f64),
    Money(f64, Currency),
    Count(usize),
    Category(Option<CategoryTotal>),
    Expense(Option<ExpenseSummary>),
    Exposure(CurrencyExposure),
}

impl InsightValue {
    /// Formats the value for display; monetary amounts are masked when `show_values` is false.
    pub fn display(&self, show_values: bool) -> String {
        match self {
            InsightValue::Percent(value) => format_percent(*value),
            InsightValue::Money(amount, currency) => money(*amount, *currency, show_values),
            InsightValue::Count(count) => count.to_string(),
            InsightValue::Category(Some(top)) => top.category.label().to_string(),
            InsightValue::Expense(Some(expense)) => format!(
                "{} · {}",
                expense.name,
                money(expense.amount, expense.currency, show_values)
            ),
            InsightValue::Category(None) | InsightValue::Expense(None) => NONE_LABEL.to_string(),
            InsightValue::Exposure(exposure) => {
                let noun = if exposure.currencies == 1 {
                    "currency"
                } else {
                    "currencies"
                };
                format!(
                    "{} {} · {} foreign",
                    exposure.currencies,
                    noun,
                    format_percent(exposure.foreign_share)
                )
            }
        }
    }
}

fn money(amount: f64, currency: Currency, show_values: bool) -> String {
    if show_values {
        format_amount(amount, currency)
    } else {
        MASKED_VALUE.to_string()
    }
}

/// One rendered row of the overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightEntry {
    pub kind: InsightKind,
    pub title: &'static str,
    pub value: String,
}

/// Every insight computed over one snapshot of budgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
    pub primary_currency: Currency,
    pub savings_rate: f64,
    pub essential_percentage: f64,
    pub top_category: Option<CategoryTotal>,
    /// Non-empty categories, largest first; ties keep declaration order.
    pub category_breakdown: Vec<CategoryTotal>,
    pub budgets_exceeding: usize,
    pub total_spent: f64,
    pub monthly_average: f64,
    pub largest_expense: Option<ExpenseSummary>,
    pub recent_activity: Option<ExpenseSummary>,
    pub currency_exposure: CurrencyExposure,
    pub average_expense: f64,
    pub budget_utilization: f64,
    pub upcoming_reminders: usize,
    pub expense_count: usize,
}

impl InsightReport {
    pub fn value(&self, kind: InsightKind) -> InsightValue {
        let primary = self.primary_currency;
        match kind {
            InsightKind::SavingsRate => InsightValue::Percent(self.savings_rate),
            InsightKind::TopCategory => InsightValue::Category(self.top_category.clone()),
            InsightKind::BudgetsExceeding => InsightValue::Count(self.budgets_exceeding),
            InsightKind::TotalSpent => InsightValue::Money(self.total_spent, primary),
            InsightKind::MonthlyAverage => InsightValue::Money(self.monthly_average, primary),
            InsightKind::EssentialPercentage => InsightValue::Percent(self.essential_percentage),
            InsightKind::LargestExpense => InsightValue::Expense(self.largest_expense.clone()),
            InsightKind::RecentActivity => InsightValue::Expense(self.recent_activity.clone()),
            InsightKind::CurrencyExposure => {
                InsightValue::Exposure(self.currency_exposure.clone())
            }
            InsightKind::AverageExpense => InsightValue::Money(self.average_expense, primary),
            InsightKind::BudgetUtilization => InsightValue::Percent(self.budget_utilization),
            InsightKind::UpcomingReminders => InsightValue::Count(self.upcoming_reminders),
        }
    }

    pub fn display(&self, kind: InsightKind, show_values: bool) -> String {
        self.value(kind).display(show_values)
    }

    /// Rendered rows for `selected`, in the order given.
    pub fn entries(&self, selected: &[InsightKind], show_values: bool) -> Vec<InsightEntry> {
        selected
            .iter()
            .map(|&kind| InsightEntry {
                kind,
                title: kind.title(),
                value: self.display(kind, show_values),
            })
            .collect()
    }
}

/// Currency used by the most budgets; ties go to the one seen first, USD when empty.
pub fn primary_currency<'a>(budgets: impl IntoIterator<Item = &'a Budget>) -> Currency {
    let mut counts: Vec<(Currency, usize)> = Vec::new();
    for budget in budgets {
        match counts.iter_mut().find(|(currency, _)| *currency == budget.currency) {
            Some((_, count)) => *count += 1,
            None => counts.push((budget.currency, 1)),
        }
    }
    let mut best: Option<(Currency, usize)> = None;
    for (currency, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((currency, count));
        }
    }
    best.map(|(currency, _)| currency).unwrap_or_default()
}

/// Computes insight reports against a conversion table.
#[derive(Debug, Clone, Copy)]
pub struct InsightAggregator<'r> {
    rates: &'r ConversionTable,
}

impl<'r> InsightAggregator<'r> {
    pub fn new(rates: &'r ConversionTable) -> Self {
        Self { rates }
    }

    /// Pools the expenses of `budgets`; callers pick which budgets take part.
    pub fn compute<'b>(
        &self,
        budgets: impl IntoIterator<Item = &'b Budget>,
        now: DateTime<Utc>,
    ) -> InsightReport {
        let budgets: Vec<&Budget> = budgets.into_iter().collect();
        let primary = primary_currency(budgets.iter().copied());
        let pooled: Vec<(Uuid, &Expense)> = budgets
            .iter()
            .flat_map(|budget| budget.expenses.iter().map(move |expense| (budget.id, expense)))
            .collect();

        let total_spent: f64 = pooled
            .iter()
            .map(|(_, expense)| expense.converted_amount(primary, self.rates))
            .sum();
        let savings_total: f64 = pooled
            .iter()
            .filter(|(_, expense)| expense.is_savings())
            .map(|(_, expense)| expense.converted_amount(primary, self.rates))
            .sum();
        let essential_total: f64 = pooled
            .iter()
            .filter(|(_, expense)| expense.is_essential)
            .map(|(_, expense)| expense.converted_amount(primary, self.rates))
            .sum();

        let category_breakdown = self.category_breakdown(&pooled, primary);
        let top_category = category_breakdown.first().cloned();

        let budgets_exceeding = budgets
            .iter()
            .filter(|budget| budget.is_over_budget(self.rates))
            .count();

        // Raw amounts, summed across currencies without conversion.
        let raw_total: f64 = pooled.iter().map(|(_, expense)| expense.amount).sum();
        let monthly_average = match pooled.iter().map(|(_, expense)| expense.date).min() {
            Some(earliest) => {
                let months = calendar_months_between(earliest, now.date_naive()).max(1);
                raw_total / months as f64
            }
            None => raw_total,
        };

        // Compares raw amounts regardless of currency; the first maximum wins.
        let mut largest_expense: Option<(Uuid, &Expense)> = None;
        let mut recent_activity: Option<(Uuid, &Expense)> = None;
        for &(budget_id, expense) in &pooled {
            if largest_expense.map_or(true, |(_, best)| expense.amount > best.amount) {
                largest_expense = Some((budget_id, expense));
            }
            if recent_activity.map_or(true, |(_, best)| expense.date > best.date) {
                recent_activity = Some((budget_id, expense));
            }
        }

        let mut currencies: Vec<Currency> = pooled.iter().map(|(_, e)| e.currency).collect();
        currencies.sort();
        currencies.dedup();
        let foreign_total: f64 = pooled
            .iter()
            .filter(|(_, expense)| expense.currency != primary)
            .map(|(_, expense)| expense.converted_amount(primary, self.rates))
            .sum();

        let budgeted_total: f64 = budgets
            .iter()
            .map(|budget| self.rates.convert(budget.amount, budget.currency, primary))
            .sum();

        let upcoming_reminders = pooled
            .iter()
            .filter_map(|(_, expense)| expense.reminder.as_ref())
            .filter(|reminder| reminder.is_pending(now))
            .count();

        InsightReport {
            primary_currency: primary,
            savings_rate: percentage(savings_total, total_spent),
            essential_percentage: percentage(essential_total, total_spent),
            top_category,
            category_breakdown,
            budgets_exceeding,
            total_spent,
            monthly_average,
            largest_expense: largest_expense.map(|(id, expense)| ExpenseSummary::new(id, expense)),
            recent_activity: recent_activity.map(|(id, expense)| ExpenseSummary::new(id, expense)),
            currency_exposure: CurrencyExposure {
                currencies: currencies.len(),
                foreign_share: percentage(foreign_total, total_spent),
            },
            average_expense: if pooled.is_empty() {
                0.0
            } else {
                total_spent / pooled.len() as f64
            },
            budget_utilization: percentage(total_spent, budgeted_total),
            upcoming_reminders,
            expense_count: pooled.len(),
        }
    }

    fn category_breakdown(
        &self,
        pooled: &[(Uuid, &Expense)],
        primary: Currency,
    ) -> Vec<CategoryTotal> {
        let mut totals: HashMap<ExpenseCategory, f64> = HashMap::new();
        for (_, expense) in pooled {
            *totals.entry(expense.category).or_insert(0.0) +=
                expense.converted_amount(primary, self.rates);
        }
        let mut breakdown: Vec<CategoryTotal> = ExpenseCategory::ALL
            .into_iter()
            .filter_map(|category| {
                totals
                    .get(&category)
                    .map(|&total| CategoryTotal { category, total })
            })
            .collect();
        // Stable sort keeps declaration order among equal totals.
        breakdown.sort_by(|a, b| b.total.total_cmp(&a.total));
        breakdown
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Computes the report and renders the selected kinds in order.
pub fn compute_insights(
    budgets: &[Budget],
    selected: &[InsightKind],
    rates: &ConversionTable,
    now: DateTime<Utc>,
    show_values: bool,
) -> Vec<InsightEntry> {
    InsightAggregator::new(rates)
        .compute(budgets, now)
        .entries(selected, show_values)
}
