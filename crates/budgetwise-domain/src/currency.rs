//! Supported currencies, the fixed conversion table, and amount formatting.

use std::{collections::HashMap, fmt};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Closed set of currencies a budget or expense may be denominated in.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Jpy];

    /// ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
        }
    }

    /// Number of decimal places used when rendering amounts.
    pub fn minor_units(self) -> u8 {
        match self {
            Currency::Jpy => 0,
            _ => 2,
        }
    }

    /// Parses an ISO code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Currency> {
        let code = code.trim();
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

static STANDARD_RATES: Lazy<ConversionTable> = Lazy::new(|| {
    use Currency::*;
    ConversionTable::new()
        .with_rate(Usd, Eur, 0.85)
        .with_rate(Usd, Gbp, 0.73)
        .with_rate(Usd, Jpy, 110.0)
        .with_rate(Eur, Usd, 1.18)
        .with_rate(Eur, Gbp, 0.86)
        .with_rate(Eur, Jpy, 129.53)
        .with_rate(Gbp, Usd, 1.37)
        .with_rate(Gbp, Eur, 1.16)
        .with_rate(Gbp, Jpy, 150.89)
        .with_rate(Jpy, Usd, 0.0091)
        .with_rate(Jpy, Eur, 0.0077)
        .with_rate(Jpy, Gbp, 0.0066)
});

/// Directed exchange-rate lookup between currencies.
///
/// Entries are independent per direction; `EUR → USD` says nothing about
/// `USD → EUR`. A missing pair converts at parity rather than failing, so
/// callers must not assume every conversion yields a market-correct value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionTable {
    rates: HashMap<(Currency, Currency), f64>,
}

impl ConversionTable {
    /// Creates an empty table where every cross-currency conversion falls back to parity.
    pub fn new() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    /// The fixed rates shipped with the application.
    pub fn standard() -> &'static ConversionTable {
        &STANDARD_RATES
    }

    pub fn with_rate(mut self, from: Currency, to: Currency, rate: f64) -> Self {
        self.set_rate(from, to, rate);
        self
    }

    /// Stores a directed rate. Non-positive or non-finite rates are ignored and
    /// `false` is returned.
    pub fn set_rate(&mut self, from: Currency, to: Currency, rate: f64) -> bool {
        if !rate.is_finite() || rate <= 0.0 {
            return false;
        }
        self.rates.insert((from, to), rate);
        true
    }

    pub fn remove_rate(&mut self, from: Currency, to: Currency) -> Option<f64> {
        self.rates.remove(&(from, to))
    }

    pub fn rate(&self, from: Currency, to: Currency) -> Option<f64> {
        self.rates.get(&(from, to)).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Converts `amount` from one currency into another.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        if from == to {
            return amount;
        }
        match self.rate(from, to) {
            Some(rate) => amount * rate,
            None => amount,
        }
    }
}

/// Shorthand for converting with the standard table.
pub fn convert(amount: f64, from: Currency, to: Currency) -> f64 {
    ConversionTable::standard().convert(amount, from, to)
}

/// Renders `amount` with the currency symbol, thousands grouping and the
/// currency's minor units, e.g. `-$1,234.50` or `¥12,000`.
pub fn format_amount(amount: f64, currency: Currency) -> String {
    let precision = currency.minor_units() as usize;
    let body = format!("{:.*}", precision, amount.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let mut rendered = String::new();
    if amount < 0.0 && body.chars().any(|c| c != '0' && c != '.') {
        rendered.push('-');
    }
    rendered.push_str(currency.symbol());
    rendered.push_str(&group_digits(int_part, ','));
    if let Some(frac) = frac_part {
        rendered.push('.');
        rendered.push_str(frac);
    }
    rendered
}

/// Renders a percentage with one decimal place, dropping a trailing `.0`.
pub fn format_percent(value: f64) -> String {
    let body = format!("{:.1}", value);
    let trimmed = body.strip_suffix(".0").unwrap_or(&body);
    format!("{trimmed}%")
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
