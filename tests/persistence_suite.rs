mod common;

use std::fs;

use budgetwise::{
    storage::decode_collection, BudgetCollection, BudgetError, CoreError, Currency,
    ExpenseCategory, InsightKind, Session, StudentLoan,
};
use common::{budget, config_manager, expense, open_session, temp_base, ymd};

#[test]
fn collection_survives_reopening() {
    let base = temp_base();
    let (budget_id, expense_id) = {
        let mut session = open_session(&base, ymd(2025, 3, 1));
        let savings = budget("Savings", 400.0, Currency::Eur);
        let fund = expense("ETF", 150.0, Currency::Eur, ExpenseCategory::Savings)
            .with_interest_rate("3.5")
            .with_starting_balance(900.0);
        let ids = (savings.id, fund.id);
        let store = session.store_mut();
        store.add_budget(savings).unwrap();
        store.add_expense(ids.0, fund).unwrap();
        store.toggle_insight(InsightKind::SavingsRate);
        store.set_student_loan(Some(StudentLoan::new(8000.0, Some("5".into()), 150.0)));
        ids
    };

    let session = open_session(&base, ymd(2025, 3, 1));
    let stored = session
        .store()
        .expense(budget_id, expense_id)
        .expect("expense persisted");
    assert_eq!(stored.interest_rate.as_deref(), Some("3.5"));
    assert_eq!(stored.starting_balance, Some(900.0));
    let settings = session.store().settings();
    assert!(!settings.selected_insights.contains(&InsightKind::SavingsRate));
    assert_eq!(settings.student_loan.as_ref().map(|loan| loan.balance), Some(8000.0));
}

#[test]
fn snapshot_lives_under_configured_data_root() {
    let base = temp_base();
    let mut session = open_session(&base, ymd(2025, 3, 1));
    session
        .store_mut()
        .add_budget(budget("Food", 250.0, Currency::Usd))
        .unwrap();

    let path = session.data_file();
    assert_eq!(path, base.join("data").join("budgets.json"));
    let collection = decode_collection(&fs::read(&path).unwrap()).expect("valid snapshot");
    assert_eq!(collection.budgets.len(), 1);
    assert_eq!(collection.schema_version, 1);
}

#[test]
fn failed_write_keeps_memory_and_disk_state() {
    let base = temp_base();
    let mut session = open_session(&base, ymd(2025, 3, 1));
    let food = budget("Food", 250.0, Currency::Usd);
    let id = food.id;
    session.store_mut().add_budget(food).unwrap();
    let path = session.data_file();
    let original = fs::read_to_string(&path).unwrap();

    // A directory at the temp path makes the next atomic write fail.
    fs::create_dir_all(path.with_extension("json.tmp")).unwrap();
    let outcome = session
        .store_mut()
        .add_expense(id, expense("Lunch", 12.0, Currency::Usd, ExpenseCategory::Food))
        .expect("write failures are not surfaced");

    assert!(outcome.is_applied());
    assert_eq!(session.store().budget(id).unwrap().expense_count(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn backups_restore_previous_state() {
    let base = temp_base();
    let mut session = open_session(&base, ymd(2025, 3, 1));
    let first = budget("First", 100.0, Currency::Usd);
    let first_id = first.id;
    session.store_mut().add_budget(first).unwrap();
    session
        .store_mut()
        .add_budget(budget("Second", 100.0, Currency::Usd))
        .unwrap();

    let backups = session.list_backups().expect("list backups");
    assert!(!backups.is_empty());
    let newest = backups[0].clone();
    session.restore_backup(&newest).expect("restore");

    let budgets = session.store().budgets();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].id, first_id);
}

#[test]
fn export_and_import_round_trip_through_a_file() {
    let base = temp_base();
    let export = base.join("exports").join("collection.json");
    let original = {
        let mut session = open_session(&base, ymd(2025, 3, 1));
        let trip = budget("Trip", 900.0, Currency::Jpy);
        let id = trip.id;
        session.store_mut().add_budget(trip).unwrap();
        session
            .store_mut()
            .add_expense(id, expense("Ramen", 1200.0, Currency::Jpy, ExpenseCategory::Food))
            .unwrap();
        session.export_to(&export).expect("export");
        session.store().collection().clone()
    };

    let other = temp_base();
    let mut fresh = open_session(&other, ymd(2025, 3, 1));
    assert!(fresh.store().budgets().is_empty());
    fresh.import_from(&export).expect("import");
    assert_eq!(fresh.store().collection(), &original);
}

#[test]
fn import_refuses_budgets_with_invalid_expenses() {
    let base = temp_base();
    let mut session = open_session(&base, ymd(2025, 3, 1));
    let kept = budget("Kept", 100.0, Currency::Usd);
    session.store_mut().add_budget(kept).unwrap();
    let before = session.store().collection().clone();

    let mut tampered = BudgetCollection::new();
    let mut trip = budget("Trip", 900.0, Currency::Usd);
    let refund = expense("Refund", -40.0, Currency::Usd, ExpenseCategory::Other);
    trip.expenses = vec![refund.clone(), refund];
    tampered.budgets.push(trip);
    let path = base.join("tampered.json");
    fs::write(&path, serde_json::to_string(&tampered).unwrap()).unwrap();

    let err = session.import_from(&path).expect_err("invalid import");
    assert!(matches!(err, BudgetError::Core(CoreError::Validation(_))));
    assert_eq!(session.store().collection(), &before);
}

#[test]
fn unknown_default_currency_is_reported() {
    let base = temp_base();
    let manager = config_manager(&base);
    let mut config = manager.load().unwrap();
    config.currency = "XYZ".into();
    manager.save(&config).unwrap();

    let session = Session::open(base.clone()).expect("open");
    assert!(session.default_currency().is_err());
    let status = session.status().expect("status");
    assert_eq!(status.budgets, 0);
    assert_eq!(status.backups, 0);
}
