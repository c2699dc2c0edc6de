//! Static presentation metadata (icon and color) for categories, currencies and insights.
//!
//! Tables are built once on first access and looked up by enumerant.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::currency::Currency;
use crate::expense::ExpenseCategory;
use crate::insight::InsightKind;

/// Icon and color names handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayStyle {
    pub icon: &'static str,
    pub color: &'static str,
}

const FALLBACK_STYLE: DisplayStyle = DisplayStyle {
    icon: "questionmark.circle",
    color: "gray",
};

static CATEGORY_STYLES: Lazy<HashMap<ExpenseCategory, DisplayStyle>> = Lazy::new(|| {
    use ExpenseCategory::*;
    HashMap::from([
        (Savings, style("banknote", "green")),
        (Housing, style("house", "brown")),
        (Food, style("fork.knife", "orange")),
        (Transportation, style("car", "blue")),
        (Utilities, style("bolt", "yellow")),
        (Entertainment, style("film", "purple")),
        (Healthcare, style("cross.case", "red")),
        (Shopping, style("bag", "pink")),
        (Subscriptions, style("repeat", "indigo")),
        (Other, style("ellipsis.circle", "gray")),
    ])
});

static CURRENCY_STYLES: Lazy<HashMap<Currency, DisplayStyle>> = Lazy::new(|| {
    HashMap::from([
        (Currency::Usd, style("dollarsign.circle", "green")),
        (Currency::Eur, style("eurosign.circle", "blue")),
        (Currency::Gbp, style("sterlingsign.circle", "purple")),
        (Currency::Jpy, style("yensign.circle", "red")),
    ])
});

static INSIGHT_STYLES: Lazy<HashMap<InsightKind, DisplayStyle>> = Lazy::new(|| {
    use InsightKind::*;
    HashMap::from([
        (SavingsRate, style("percent", "green")),
        (TopCategory, style("chart.pie", "orange")),
        (BudgetsExceeding, style("exclamationmark.triangle", "red")),
        (TotalSpent, style("creditcard", "blue")),
        (MonthlyAverage, style("calendar", "teal")),
        (EssentialPercentage, style("checkmark.shield", "indigo")),
        (LargestExpense, style("arrow.up.circle", "pink")),
        (RecentActivity, style("clock", "gray")),
        (CurrencyExposure, style("globe", "cyan")),
        (AverageExpense, style("divide.circle", "mint")),
        (BudgetUtilization, style("gauge", "yellow")),
        (UpcomingReminders, style("bell", "purple")),
    ])
});

const fn style(icon: &'static str, color: &'static str) -> DisplayStyle {
    DisplayStyle { icon, color }
}

pub fn category_style(category: ExpenseCategory) -> DisplayStyle {
    CATEGORY_STYLES
        .get(&category)
        .copied()
        .unwrap_or(FALLBACK_STYLE)
}

pub fn currency_style(currency: Currency) -> DisplayStyle {
    CURRENCY_STYLES
        .get(&currency)
        .copied()
        .unwrap_or(FALLBACK_STYLE)
}

pub fn insight_style(kind: InsightKind) -> DisplayStyle {
    INSIGHT_STYLES.get(&kind).copied().unwrap_or(FALLBACK_STYLE)
}
