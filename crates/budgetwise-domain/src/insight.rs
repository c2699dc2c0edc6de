//! Kinds of cross-budget insight a user can pin to their overview.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    SavingsRate,
    TopCategory,
    BudgetsExceeding,
    TotalSpent,
    MonthlyAverage,
    EssentialPercentage,
    LargestExpense,
    RecentActivity,
    CurrencyExposure,
    AverageExpense,
    BudgetUtilization,
    UpcomingReminders,
}

impl InsightKind {
    pub const ALL: [InsightKind; 12] = [
        InsightKind::SavingsRate,
        InsightKind::TopCategory,
        InsightKind::BudgetsExceeding,
        InsightKind::TotalSpent,
        InsightKind::MonthlyAverage,
        InsightKind::EssentialPercentage,
        InsightKind::LargestExpense,
        InsightKind::RecentActivity,
        InsightKind::CurrencyExposure,
        InsightKind::AverageExpense,
        InsightKind::BudgetUtilization,
        InsightKind::UpcomingReminders,
    ];

    pub fn title(self) -> &'static str {
        match self {
            InsightKind::SavingsRate => "Savings Rate",
            InsightKind::TopCategory => "Top Category",
            InsightKind::BudgetsExceeding => "Over Budget",
            InsightKind::TotalSpent => "Total Spent",
            InsightKind::MonthlyAverage => "Monthly Average",
            InsightKind::EssentialPercentage => "Essential Spending",
            InsightKind::LargestExpense => "Largest Expense",
            InsightKind::RecentActivity => "Recent Activity",
            InsightKind::CurrencyExposure => "Currency Exposure",
            InsightKind::AverageExpense => "Average Expense",
            InsightKind::BudgetUtilization => "Budget Utilization",
            InsightKind::UpcomingReminders => "Upcoming Reminders",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
