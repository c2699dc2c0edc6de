//! Shared traits, calendar helpers, and validation errors for budgeting primitives.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in the collection.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Zero-based month index (`year * 12 + month - 1`) used for calendar arithmetic.
pub fn month_index(year: i32, month: u32) -> i64 {
    year as i64 * 12 + month as i64 - 1
}

/// Whole calendar months from `start` to `end`, ignoring the day of month.
///
/// Negative when `end` falls in an earlier month than `start`.
pub fn calendar_months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    month_index(end.year(), end.month()) - month_index(start.year(), start.month())
}

/// Reasons an entity is refused by the store before it reaches the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyName,
    NonPositiveAmount(f64),
    InvalidStartMonth(u32),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyName => f.write_str("name must not be empty"),
            ValidationError::NonPositiveAmount(amount) => {
                write!(f, "amount must be greater than zero (got {amount})")
            }
            ValidationError::InvalidStartMonth(month) => {
                write!(f, "start month must be between 1 and 12 (got {month})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

pub(crate) fn validate_name_and_amount(name: &str, amount: f64) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}
