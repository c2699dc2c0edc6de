//! Compound-interest projections for savings expenses.
//!
//! A savings expense is modelled as equal monthly contributions of `amount`
//! starting in the month of its `date`, plus an optional lump sum deposited
//! in that same month. Values are annuity future values at a fixed monthly
//! rate derived from the expense's annual percentage.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use budgetwise_domain::Expense;

/// Horizons (in months ahead) reported by [`SavingsProjection::default_schedule`].
pub const DEFAULT_HORIZONS: [u32; 5] = [12, 60, 120, 240, 360];

/// Which expense field supplied the annual rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    InterestRate,
    ExpectedAnnualReturn,
    None,
}

/// Parses a user-entered percentage. Blank, unparseable and non-finite text yields `None`.
pub fn parse_rate(text: Option<&str>) -> Option<f64> {
    let trimmed = text?.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|rate| rate.is_finite())
}

/// Picks the annual percentage rate: interest rate first, then expected return, else zero.
pub fn select_annual_rate(expense: &Expense) -> (f64, RateSource) {
    if let Some(rate) = parse_rate(expense.interest_rate.as_deref()) {
        return (rate, RateSource::InterestRate);
    }
    if let Some(rate) = parse_rate(expense.expected_annual_return.as_deref()) {
        return (rate, RateSource::ExpectedAnnualReturn);
    }
    (0.0, RateSource::None)
}

/// Calendar months since the start month, counting the start month itself; never below 1.
pub fn months_active(start: NaiveDate, as_of: NaiveDate) -> u32 {
    let elapsed = (as_of.year() as i64 - start.year() as i64) * 12
        + (as_of.month() as i64 - start.month() as i64)
        + 1;
    elapsed.clamp(1, u32::MAX as i64) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub months_ahead: u32,
    pub total_months: u32,
    pub value: f64,
    pub contributed: f64,
    pub growth: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavingsProjection {
    contribution: f64,
    starting_balance: f64,
    annual_rate: f64,
    rate_source: RateSource,
    start: NaiveDate,
}

impl SavingsProjection {
    /// A missing starting balance counts as zero here, unlike
    /// [`Expense::converted_starting_balance`] which keeps the absence.
    pub fn for_expense(expense: &Expense) -> Self {
        let (annual_rate, rate_source) = select_annual_rate(expense);
        Self {
            contribution: expense.amount,
            starting_balance: expense.starting_balance.unwrap_or(0.0),
            annual_rate,
            rate_source,
            start: expense.date,
        }
    }

    /// Same as [`Self::for_expense`] but only for savings-category expenses.
    pub fn for_savings(expense: &Expense) -> Option<Self> {
        expense.is_savings().then(|| Self::for_expense(expense))
    }

    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    pub fn rate_source(&self) -> RateSource {
        self.rate_source
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 100.0 / 12.0
    }

    pub fn months_active(&self, as_of: NaiveDate) -> u32 {
        months_active(self.start, as_of)
    }

    /// Future value after `months` contributions. Rates at or below zero grow linearly.
    pub fn value_after(&self, months: u32) -> f64 {
        let i = self.monthly_rate();
        let n = months as f64;
        if i > 0.0 {
            let growth = (1.0 + i).powf(n);
            let contributions = self.contribution * (growth - 1.0) / i;
            let balance = self.starting_balance * growth;
            contributions + balance
        } else {
            self.contribution * n + self.starting_balance
        }
    }

    /// Principal paid in after `months`: the lump sum plus every contribution.
    pub fn total_contributed(&self, months: u32) -> f64 {
        self.contribution * months as f64 + self.starting_balance
    }

    pub fn current_value(&self, as_of: NaiveDate) -> f64 {
        self.value_after(self.months_active(as_of))
    }

    /// Value `months_ahead` months from `as_of`, computed from the original start
    /// rather than compounded forward from today's value.
    pub fn projected_value(&self, as_of: NaiveDate, months_ahead: u32) -> f64 {
        self.value_after(self.months_active(as_of).saturating_add(months_ahead))
    }

    pub fn schedule(&self, as_of: NaiveDate, horizons: &[u32]) -> Vec<ProjectionPoint> {
        let active = self.months_active(as_of);
        horizons
            .iter()
            .map(|&months_ahead| {
                let total_months = active.saturating_add(months_ahead);
                let value = self.value_after(total_months);
                let contributed = self.total_contributed(total_months);
                ProjectionPoint {
                    months_ahead,
                    total_months,
                    value,
                    contributed,
                    growth: value - contributed,
                }
            })
            .collect()
    }

    pub fn default_schedule(&self, as_of: NaiveDate) -> Vec<ProjectionPoint> {
        self.schedule(as_of, &DEFAULT_HORIZONS)
    }
}

/// Projection helpers available directly on expenses.
pub trait SavingsExt {
    fn current_value(&self, as_of: NaiveDate) -> f64;
    fn projected_value(&self, as_of: NaiveDate, months_ahead: u32) -> f64;
}

impl SavingsExt for Expense {
    fn current_value(&self, as_of: NaiveDate) -> f64 {
        SavingsProjection::for_expense(self).current_value(as_of)
    }

    fn projected_value(&self, as_of: NaiveDate, months_ahead: u32) -> f64 {
        SavingsProjection::for_expense(self).projected_value(as_of, months_ahead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetwise_domain::{Currency, ExpenseCategory};

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn savings(amount: f64, start: NaiveDate) -> Expense {
        Expense::new(
            "Nest egg",
            amount,
            Currency::Usd,
            ExpenseCategory::Savings,
            start,
        )
    }

    #[test]
    fn months_active_counts_start_month_and_floors_at_one() {
        assert_eq!(months_active(ymd(2024, 3, 31), ymd(2024, 3, 1)), 1);
        assert_eq!(months_active(ymd(2024, 3, 1), ymd(2024, 4, 1)), 2);
        assert_eq!(months_active(ymd(2023, 11, 20), ymd(2024, 2, 2)), 4);
        assert_eq!(months_active(ymd(2025, 1, 1), ymd(2024, 1, 1)), 1);
    }

    #[test]
    fn parse_rate_handles_blank_percent_and_garbage() {
        assert_eq!(parse_rate(None), None);
        assert_eq!(parse_rate(Some("")), None);
        assert_eq!(parse_rate(Some("   ")), None);
        assert_eq!(parse_rate(Some("abc")), None);
        assert_eq!(parse_rate(Some("NaN")), None);
        assert_eq!(parse_rate(Some(" 4.5 ")), Some(4.5));
        assert_eq!(parse_rate(Some("7%")), Some(7.0));
        assert_eq!(parse_rate(Some("-2")), Some(-2.0));
    }

    #[test]
    fn unparseable_interest_rate_falls_through_to_expected_return() {
        let mut expense = savings(100.0, ymd(2024, 1, 1));
        expense.interest_rate = Some("soon".into());
        expense.expected_annual_return = Some("6".into());
        let projection = SavingsProjection::for_expense(&expense);
        assert_eq!(projection.annual_rate(), 6.0);
        assert_eq!(projection.rate_source(), RateSource::ExpectedAnnualReturn);
    }

    #[test]
    fn negative_rate_degrades_to_linear_growth() {
        let expense = savings(50.0, ymd(2024, 1, 1)).with_interest_rate("-5");
        let projection = SavingsProjection::for_expense(&expense);
        assert_eq!(projection.rate_source(), RateSource::InterestRate);
        assert_eq!(projection.value_after(10), 500.0);
    }

    #[test]
    fn no_rate_grows_linearly_from_starting_balance() {
        let expense = savings(100.0, ymd(2024, 1, 1)).with_starting_balance(500.0);
        let as_of = ymd(2024, 12, 15);
        let projection = SavingsProjection::for_expense(&expense);
        assert_eq!(projection.rate_source(), RateSource::None);
        assert_eq!(projection.months_active(as_of), 12);

        let current = expense.current_value(as_of);
        assert_eq!(current, 1700.0);
        assert_eq!(expense.projected_value(as_of, 0), current);
        assert_eq!(expense.projected_value(as_of, 6), 2300.0);
    }

    #[test]
    fn compound_growth_matches_annuity_formula() {
        let expense = savings(100.0, ymd(2024, 1, 15))
            .with_interest_rate("12")
            .with_starting_balance(1000.0);
        let value = expense.current_value(ymd(2024, 12, 3));
        assert!((value - 2395.08).abs() < 0.01, "value = {value}");
    }

    #[test]
    fn schedule_reports_growth_over_contributions() {
        let expense = savings(200.0, ymd(2024, 1, 1)).with_expected_annual_return("6");
        let projection = SavingsProjection::for_expense(&expense);
        let points = projection.schedule(ymd(2024, 1, 1), &[0, 12]);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].total_months, 1);
        assert_eq!(points[1].total_months, 13);
        assert_eq!(points[1].contributed, 2600.0);
        assert!(points[1].growth > 0.0);
        assert!((points[0].value - projection.current_value(ymd(2024, 1, 1))).abs() < 1e-9);
    }

    #[test]
    fn for_savings_skips_other_categories() {
        let mut expense = savings(10.0, ymd(2024, 1, 1));
        assert!(SavingsProjection::for_savings(&expense).is_some());
        expense.category = ExpenseCategory::Food;
        assert!(SavingsProjection::for_savings(&expense).is_none());
    }
}
