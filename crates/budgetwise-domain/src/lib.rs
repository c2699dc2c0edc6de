//! budgetwise-domain
//!
//! Pure domain models (Budget, Expense, Reminder, Currency, settings).
//! No I/O, no storage. Only data types, derived metrics and lookup tables.

pub mod budget;
pub mod collection;
pub mod common;
pub mod currency;
pub mod display;
pub mod expense;
pub mod insight;
pub mod settings;

pub use budget::*;
pub use collection::*;
pub use common::*;
pub use currency::*;
pub use display::*;
pub use expense::*;
pub use insight::*;
pub use settings::*;
