#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use budgetwise::{
    Budget, Config, ConfigManager, Currency, Expense, ExpenseCategory, FixedClock, Session,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a unique base directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Config manager whose data root lives inside `base`.
pub fn config_manager(base: &PathBuf) -> ConfigManager {
    let manager = ConfigManager::with_base_dir(base.clone()).expect("create config manager");
    let mut config = Config::default();
    config.data_root = Some(base.join("data"));
    manager.save(&config).expect("save config");
    manager
}

/// Opens an isolated session whose clock is pinned to `today`.
pub fn open_session(base: &PathBuf, today: NaiveDate) -> Session {
    Session::open_with(config_manager(base), FixedClock::on(today)).expect("open session")
}

pub fn budget(name: &str, amount: f64, currency: Currency) -> Budget {
    Budget::new(name, amount, currency, 1, 2025)
}

pub fn expense(name: &str, amount: f64, currency: Currency, category: ExpenseCategory) -> Expense {
    Expense::new(name, amount, currency, category, ymd(2025, 1, 15))
}
