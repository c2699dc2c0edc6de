#![doc(test(attr(deny(warnings))))]

//! Budgetwise tracks multi-currency budgets and expenses, projects savings
//! growth and aggregates spending insights across budgets.
//!
//! The facade re-exports the domain model and core engine and adds
//! [`session::Session`], which wires configuration and JSON persistence.

pub mod errors;
pub mod session;
pub mod utils;

pub use budgetwise_config::{Config, ConfigManager};
pub use budgetwise_core::*;
pub use budgetwise_domain::*;
pub use budgetwise_storage_json::{BackupInfo, JsonFileStore};
pub use errors::BudgetError;
pub use session::{Session, SessionStatus};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(version = build.version, git = build.git_hash, "budgetwise initialized");
    });
}
