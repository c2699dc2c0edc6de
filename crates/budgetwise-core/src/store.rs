//! Authoritative in-memory budget collection with write-through persistence.
//!
//! Every applied mutation re-serializes the whole collection and hands it to
//! the [`KeyValueStore`] adapter. Write failures are logged and otherwise
//! ignored; the in-memory state stays authoritative. The store expects a
//! single caller; wrap it in a mutex or actor for concurrent use.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use budgetwise_domain::{
    Budget, BudgetCollection, ConversionTable, Expense, InsightKind, Settings, StudentLoan,
};

use crate::insights::{InsightAggregator, InsightEntry, InsightReport};
use crate::projection::SavingsProjection;
use crate::selection::{InsightSelection, ToggleOutcome};
use crate::storage::{decode_collection, encode_collection, KeyValueStore, COLLECTION_KEY};
use crate::CoreError;

pub const DEFAULT_EXPENSE_LIMIT: usize = 10;
pub const DEFAULT_MAX_SELECTED_INSIGHTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    /// Expenses allowed per budget while `Settings::limit_expenses` is on.
    pub expense_limit: usize,
    pub max_selected_insights: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            expense_limit: DEFAULT_EXPENSE_LIMIT,
            max_selected_insights: DEFAULT_MAX_SELECTED_INSIGHTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    CapacityReached { limit: usize },
}

/// What a mutation did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    /// Nothing matched (unknown id or offset); the collection is untouched.
    Unchanged,
    Rejected(Rejection),
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

/// Change notification delivered to subscribers after an applied mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    BudgetAdded(Uuid),
    BudgetUpdated(Uuid),
    /// Removed budgets and every expense that went with them.
    BudgetsRemoved {
        budget_ids: Vec<Uuid>,
        expense_ids: Vec<Uuid>,
    },
    ExpenseAdded {
        budget_id: Uuid,
        expense_id: Uuid,
    },
    ExpenseUpdated {
        budget_id: Uuid,
        expense_id: Uuid,
    },
    ExpensesRemoved {
        budget_id: Uuid,
        expense_ids: Vec<Uuid>,
    },
    SettingsChanged,
    /// The whole collection was swapped, e.g. after restoring a backup.
    CollectionReplaced,
}

type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;

pub struct BudgetStore<S: KeyValueStore> {
    collection: BudgetCollection,
    storage: S,
    key: String,
    limits: StoreLimits,
    listeners: Vec<Listener>,
}

impl<S: KeyValueStore> fmt::Debug for BudgetStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BudgetStore")
            .field("key", &self.key)
            .field("budgets", &self.collection.budgets.len())
            .field("expenses", &self.collection.expense_count())
            .field("limits", &self.limits)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: KeyValueStore> BudgetStore<S> {
    /// Loads the collection stored under [`COLLECTION_KEY`], starting empty when nothing is stored.
    pub fn open(storage: S, limits: StoreLimits) -> Result<Self, CoreError> {
        Self::open_with_key(storage, COLLECTION_KEY, limits)
    }

    pub fn open_with_key(
        storage: S,
        key: impl Into<String>,
        limits: StoreLimits,
    ) -> Result<Self, CoreError> {
        let key = key.into();
        let collection = match storage.load(&key)? {
            Some(blob) => decode_collection(&blob)?,
            None => BudgetCollection::new(),
        };
        debug!(
            key = %key,
            budgets = collection.budgets.len(),
            "budget collection loaded"
        );
        Ok(Self::with_collection(storage, key, collection, limits))
    }

    /// Wraps an existing collection without reading from storage.
    pub fn with_collection(
        storage: S,
        key: impl Into<String>,
        mut collection: BudgetCollection,
        limits: StoreLimits,
    ) -> Self {
        normalize_selection(&mut collection, limits);
        Self {
            collection,
            storage,
            key: key.into(),
            limits,
            listeners: Vec::new(),
        }
    }

    /// Swaps in a whole collection and writes it through.
    ///
    /// Every budget and expense must be valid and ids must be unique. The expense
    /// cap is not checked: enabling it never trims budgets that already exceed it.
    pub fn replace_collection(
        &mut self,
        mut collection: BudgetCollection,
    ) -> Result<MutationOutcome, CoreError> {
        let mut budget_ids = HashSet::new();
        for budget in &collection.budgets {
            if !budget_ids.insert(budget.id) {
                return Err(CoreError::Validation(format!(
                    "budget {} appears more than once",
                    budget.id
                )));
            }
            validate_contents(budget, None)?;
        }
        normalize_selection(&mut collection, self.limits);
        info!(budgets = collection.budgets.len(), "replacing budget collection");
        self.collection = collection;
        Ok(self.commit(StoreEvent::CollectionReplaced))
    }

    pub fn subscribe(&mut self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn collection(&self) -> &BudgetCollection {
        &self.collection
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.collection.budgets
    }

    pub fn settings(&self) -> &Settings {
        &self.collection.settings
    }

    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.collection.budget(id)
    }

    pub fn expense(&self, budget_id: Uuid, expense_id: Uuid) -> Option<&Expense> {
        self.budget(budget_id)?.expense(expense_id)
    }

    pub fn active_budgets(&self) -> Vec<&Budget> {
        self.collection.active_budgets().collect()
    }

    /// Budgets the overview should list, honouring the inactive-visibility toggle.
    pub fn visible_budgets(&self) -> Vec<&Budget> {
        let show_inactive = self.collection.settings.show_inactive_budgets;
        self.collection
            .budgets
            .iter()
            .filter(|budget| show_inactive || budget.is_active)
            .collect()
    }

    /// Whether `add_expense` would accept another expense for this budget.
    pub fn can_add_expense(&self, budget_id: Uuid) -> bool {
        match self.budget(budget_id) {
            Some(budget) => !self.at_capacity(budget),
            None => false,
        }
    }

    fn at_capacity(&self, budget: &Budget) -> bool {
        self.collection.settings.limit_expenses
            && budget.expenses.len() >= self.limits.expense_limit
    }

    fn expense_cap(&self) -> Option<usize> {
        self.collection
            .settings
            .limit_expenses
            .then_some(self.limits.expense_limit)
    }

    /// Adds a budget together with the expenses it already carries.
    pub fn add_budget(&mut self, budget: Budget) -> Result<MutationOutcome, CoreError> {
        validate_contents(&budget, self.expense_cap())?;
        if self.collection.budget(budget.id).is_some() {
            return Err(CoreError::Validation(format!(
                "budget {} already exists",
                budget.id
            )));
        }
        let id = budget.id;
        debug!(budget_id = %id, name = %budget.name, "adding budget");
        self.collection.budgets.push(budget);
        Ok(self.commit(StoreEvent::BudgetAdded(id)))
    }

    /// Replaces the stored budget with the same id, expenses included.
    ///
    /// With the cap on, the update may keep but not grow an expense list already past the limit.
    pub fn update_budget(&mut self, budget: Budget) -> Result<MutationOutcome, CoreError> {
        let id = budget.id;
        let Some(current) = self.collection.budget(id).map(|b| b.expenses.len()) else {
            validate_contents(&budget, None)?;
            return Ok(MutationOutcome::Unchanged);
        };
        let cap = self.expense_cap().map(|limit| limit.max(current));
        validate_contents(&budget, cap)?;
        let Some(slot) = self.collection.budget_mut(id) else {
            return Ok(MutationOutcome::Unchanged);
        };
        *slot = budget;
        debug!(budget_id = %id, "updated budget");
        Ok(self.commit(StoreEvent::BudgetUpdated(id)))
    }

    pub fn delete_budget(&mut self, id: Uuid) -> MutationOutcome {
        let Some(pos) = self.collection.budgets.iter().position(|b| b.id == id) else {
            return MutationOutcome::Unchanged;
        };
        let removed = self.collection.budgets.remove(pos);
        debug!(budget_id = %id, "deleted budget");
        self.commit(StoreEvent::BudgetsRemoved {
            budget_ids: vec![removed.id],
            expense_ids: removed.expenses.iter().map(|e| e.id).collect(),
        })
    }

    /// Deletes budgets by position; out-of-range offsets are ignored.
    pub fn delete_budgets_at(&mut self, offsets: &[usize]) -> MutationOutcome {
        let targets: BTreeSet<usize> = offsets
            .iter()
            .copied()
            .filter(|&idx| idx < self.collection.budgets.len())
            .collect();
        if targets.is_empty() {
            return MutationOutcome::Unchanged;
        }
        let mut budget_ids = Vec::new();
        let mut expense_ids = Vec::new();
        for idx in targets.into_iter().rev() {
            let removed = self.collection.budgets.remove(idx);
            budget_ids.push(removed.id);
            expense_ids.extend(removed.expenses.iter().map(|e| e.id));
        }
        budget_ids.reverse();
        debug!(count = budget_ids.len(), "deleted budgets by offset");
        self.commit(StoreEvent::BudgetsRemoved {
            budget_ids,
            expense_ids,
        })
    }

    /// Appends an expense. A full budget (cap enabled) rejects the expense without error.
    pub fn add_expense(
        &mut self,
        budget_id: Uuid,
        expense: Expense,
    ) -> Result<MutationOutcome, CoreError> {
        expense.validate()?;
        let limit = self.limits.expense_limit;
        let Some(budget) = self.collection.budget(budget_id) else {
            return Ok(MutationOutcome::Unchanged);
        };
        if self.at_capacity(budget) {
            info!(budget_id = %budget_id, limit, "expense limit reached, dropping expense");
            return Ok(MutationOutcome::Rejected(Rejection::CapacityReached {
                limit,
            }));
        }
        if budget.expense(expense.id).is_some() {
            return Err(CoreError::Validation(format!(
                "expense {} already exists in budget {}",
                expense.id, budget_id
            )));
        }
        let expense_id = expense.id;
        if let Some(budget) = self.collection.budget_mut(budget_id) {
            budget.expenses.push(expense);
        }
        debug!(budget_id = %budget_id, expense_id = %expense_id, "added expense");
        Ok(self.commit(StoreEvent::ExpenseAdded {
            budget_id,
            expense_id,
        }))
    }

    pub fn update_expense(
        &mut self,
        budget_id: Uuid,
        expense: Expense,
    ) -> Result<MutationOutcome, CoreError> {
        expense.validate()?;
        let expense_id = expense.id;
        let Some(slot) = self
            .collection
            .budget_mut(budget_id)
            .and_then(|budget| budget.expense_mut(expense_id))
        else {
            return Ok(MutationOutcome::Unchanged);
        };
        *slot = expense;
        debug!(budget_id = %budget_id, expense_id = %expense_id, "updated expense");
        Ok(self.commit(StoreEvent::ExpenseUpdated {
            budget_id,
            expense_id,
        }))
    }

    /// Removes every expense carrying `expense_id` from the budget.
    pub fn delete_expense(&mut self, budget_id: Uuid, expense_id: Uuid) -> MutationOutcome {
        let Some(budget) = self.collection.budget_mut(budget_id) else {
            return MutationOutcome::Unchanged;
        };
        let before = budget.expenses.len();
        budget.expenses.retain(|expense| expense.id != expense_id);
        if budget.expenses.len() == before {
            return MutationOutcome::Unchanged;
        }
        debug!(budget_id = %budget_id, expense_id = %expense_id, "deleted expense");
        self.commit(StoreEvent::ExpensesRemoved {
            budget_id,
            expense_ids: vec![expense_id],
        })
    }

    pub fn delete_expenses_at(&mut self, budget_id: Uuid, offsets: &[usize]) -> MutationOutcome {
        let Some(budget) = self.collection.budget_mut(budget_id) else {
            return MutationOutcome::Unchanged;
        };
        let targets: BTreeSet<usize> = offsets
            .iter()
            .copied()
            .filter(|&idx| idx < budget.expenses.len())
            .collect();
        if targets.is_empty() {
            return MutationOutcome::Unchanged;
        }
        let mut expense_ids: Vec<Uuid> = targets
            .into_iter()
            .rev()
            .map(|idx| budget.expenses.remove(idx).id)
            .collect();
        expense_ids.reverse();
        self.commit(StoreEvent::ExpensesRemoved {
            budget_id,
            expense_ids,
        })
    }

    pub fn toggle_budget_active(&mut self, budget_id: Uuid) -> MutationOutcome {
        let Some(budget) = self.collection.budget_mut(budget_id) else {
            return MutationOutcome::Unchanged;
        };
        budget.is_active = !budget.is_active;
        debug!(budget_id = %budget_id, active = budget.is_active, "toggled budget");
        self.commit(StoreEvent::BudgetUpdated(budget_id))
    }

    pub fn set_show_values(&mut self, show: bool) -> MutationOutcome {
        self.update_settings(|settings| settings.show_values = show)
    }

    pub fn toggle_show_values(&mut self) -> MutationOutcome {
        self.update_settings(|settings| settings.show_values = !settings.show_values)
    }

    pub fn toggle_limit_expenses(&mut self) -> MutationOutcome {
        self.update_settings(|settings| settings.limit_expenses = !settings.limit_expenses)
    }

    pub fn toggle_show_inactive_budgets(&mut self) -> MutationOutcome {
        self.update_settings(|settings| {
            settings.show_inactive_budgets = !settings.show_inactive_budgets
        })
    }

    pub fn set_student_loan(&mut self, loan: Option<StudentLoan>) -> MutationOutcome {
        self.update_settings(|settings| settings.student_loan = loan)
    }

    /// Adds or removes an insight kind. A full selection rejects new kinds and is not persisted.
    pub fn toggle_insight(&mut self, kind: InsightKind) -> ToggleOutcome {
        let mut selection = InsightSelection::from_kinds(
            self.collection.settings.selected_insights.iter().copied(),
            self.limits.max_selected_insights,
        );
        let outcome = selection.toggle(kind);
        if outcome != ToggleOutcome::AtCapacity {
            self.update_settings(|settings| settings.selected_insights = selection.into_kinds());
        }
        outcome
    }

    fn update_settings(&mut self, apply: impl FnOnce(&mut Settings)) -> MutationOutcome {
        apply(&mut self.collection.settings);
        self.commit(StoreEvent::SettingsChanged)
    }

    /// Projection for a savings expense, looked up by id.
    pub fn savings_projection(
        &self,
        budget_id: Uuid,
        expense_id: Uuid,
    ) -> Result<SavingsProjection, CoreError> {
        let budget = self
            .budget(budget_id)
            .ok_or(CoreError::BudgetNotFound(budget_id))?;
        let expense = budget
            .expense(expense_id)
            .ok_or(CoreError::ExpenseNotFound(expense_id))?;
        SavingsProjection::for_savings(expense).ok_or_else(|| {
            CoreError::Validation(format!("expense {expense_id} is not a savings expense"))
        })
    }

    /// Insights over the active budgets.
    pub fn insights(&self, rates: &ConversionTable, now: DateTime<Utc>) -> InsightReport {
        InsightAggregator::new(rates).compute(self.collection.active_budgets(), now)
    }

    /// Rendered rows for the user's selected insights, masked per the visibility setting.
    pub fn selected_insights(
        &self,
        rates: &ConversionTable,
        now: DateTime<Utc>,
    ) -> Vec<InsightEntry> {
        let settings = &self.collection.settings;
        self.insights(rates, now)
            .entries(&settings.selected_insights, settings.show_values)
    }

    fn commit(&mut self, event: StoreEvent) -> MutationOutcome {
        self.persist();
        for listener in &self.listeners {
            listener(&event);
        }
        MutationOutcome::Applied
    }

    fn persist(&self) {
        let result = encode_collection(&self.collection)
            .and_then(|blob| self.storage.save(&self.key, &blob));
        if let Err(err) = result {
            warn!(key = %self.key, error = %err, "failed to persist budget collection");
        }
    }
}

/// Checks a budget and every expense it carries, as `add_expense` would one at a time.
fn validate_contents(budget: &Budget, cap: Option<usize>) -> Result<(), CoreError> {
    budget.validate()?;
    let mut seen = HashSet::new();
    for expense in &budget.expenses {
        expense.validate()?;
        if !seen.insert(expense.id) {
            return Err(CoreError::Validation(format!(
                "expense {} appears more than once in budget {}",
                expense.id, budget.id
            )));
        }
    }
    match cap {
        Some(limit) if budget.expenses.len() > limit => Err(CoreError::Validation(format!(
            "budget {} holds {} expenses, limit is {limit}",
            budget.id,
            budget.expenses.len()
        ))),
        _ => Ok(()),
    }
}

fn normalize_selection(collection: &mut BudgetCollection, limits: StoreLimits) {
    let selection = InsightSelection::from_kinds(
        collection.settings.selected_insights.iter().copied(),
        limits.max_selected_insights,
    );
    collection.settings.selected_insights = selection.into_kinds();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use budgetwise_domain::{Currency, ExpenseCategory};
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    fn store() -> BudgetStore<Arc<MemoryStore>> {
        BudgetStore::open(Arc::new(MemoryStore::new()), StoreLimits::default()).unwrap()
    }

    fn budget() -> Budget {
        Budget::new("Groceries", 300.0, Currency::Usd, 5, 2025)
    }

    fn expense(amount: f64) -> Expense {
        Expense::new(
            "Market",
            amount,
            Currency::Usd,
            ExpenseCategory::Food,
            NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
        )
    }

    #[test]
    fn add_budget_rejects_invalid_input() {
        let mut store = store();
        let err = store
            .add_budget(Budget::new("", 100.0, Currency::Usd, 1, 2025))
            .expect_err("empty name");
        assert!(matches!(err, CoreError::Validation(_)));
        let err = store
            .add_budget(Budget::new("Zero", 0.0, Currency::Usd, 1, 2025))
            .expect_err("zero amount");
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(store.budgets().is_empty());
    }

    #[test]
    fn duplicate_budget_ids_are_refused() {
        let mut store = store();
        let budget = budget();
        store.add_budget(budget.clone()).unwrap();
        assert!(store.add_budget(budget).is_err());
        assert_eq!(store.budgets().len(), 1);
    }

    #[test]
    fn updates_to_unknown_ids_are_silent_no_ops() {
        let mut store = store();
        let budget = budget();
        let id = budget.id;
        assert_eq!(
            store.update_budget(budget).unwrap(),
            MutationOutcome::Unchanged
        );
        assert_eq!(store.delete_budget(id), MutationOutcome::Unchanged);
        assert_eq!(
            store.update_expense(id, expense(5.0)).unwrap(),
            MutationOutcome::Unchanged
        );
        assert_eq!(
            store.add_expense(id, expense(5.0)).unwrap(),
            MutationOutcome::Unchanged
        );
        assert_eq!(
            store.delete_expense(id, Uuid::new_v4()),
            MutationOutcome::Unchanged
        );
    }

    #[test]
    fn capacity_rejection_leaves_count_unchanged() {
        let mut store = store();
        let budget = budget();
        let id = budget.id;
        store.add_budget(budget).unwrap();
        for _ in 0..DEFAULT_EXPENSE_LIMIT {
            assert!(store.add_expense(id, expense(1.0)).unwrap().is_applied());
        }
        assert!(!store.can_add_expense(id));
        let outcome = store.add_expense(id, expense(1.0)).unwrap();
        assert_eq!(
            outcome,
            MutationOutcome::Rejected(Rejection::CapacityReached { limit: 10 })
        );
        assert_eq!(store.budget(id).unwrap().expense_count(), 10);

        store.toggle_limit_expenses();
        assert!(store.can_add_expense(id));
        assert!(store.add_expense(id, expense(1.0)).unwrap().is_applied());
        assert_eq!(store.budget(id).unwrap().expense_count(), 11);
    }

    #[test]
    fn delete_expense_removes_every_duplicate() {
        let mut budget = budget();
        let dup = expense(4.0);
        budget.expenses = vec![dup.clone(), expense(2.0), dup.clone()];
        let id = budget.id;
        let mut collection = BudgetCollection::new();
        collection.budgets.push(budget);
        let mut store = BudgetStore::with_collection(
            Arc::new(MemoryStore::new()),
            COLLECTION_KEY,
            collection,
            StoreLimits::default(),
        );
        assert!(store.delete_expense(id, dup.id).is_applied());
        assert_eq!(store.budget(id).unwrap().expense_count(), 1);
    }

    #[test]
    fn nested_expenses_are_validated_on_add_budget() {
        let mut store = store();

        let mut negative = budget();
        negative.expenses.push(expense(-50.0));
        assert!(matches!(
            store.add_budget(negative),
            Err(CoreError::Validation(_))
        ));

        let mut unnamed = budget();
        let mut blank = expense(5.0);
        blank.name = String::new();
        unnamed.expenses.push(blank);
        assert!(matches!(
            store.add_budget(unnamed),
            Err(CoreError::Validation(_))
        ));

        let mut repeated = budget();
        let dup = expense(3.0);
        repeated.expenses = vec![dup.clone(), dup];
        assert!(matches!(
            store.add_budget(repeated),
            Err(CoreError::Validation(_))
        ));

        let mut crowded = budget();
        crowded.expenses = (0..DEFAULT_EXPENSE_LIMIT + 2).map(|_| expense(1.0)).collect();
        assert!(matches!(
            store.add_budget(crowded.clone()),
            Err(CoreError::Validation(_))
        ));
        assert!(store.budgets().is_empty());

        store.toggle_limit_expenses();
        assert!(store.add_budget(crowded).unwrap().is_applied());
    }

    #[test]
    fn update_budget_checks_expenses_and_cap() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = BudgetStore::open(Arc::clone(&storage), StoreLimits::default()).unwrap();
        let mut full = budget();
        full.expenses = (0..DEFAULT_EXPENSE_LIMIT).map(|_| expense(1.0)).collect();
        let id = full.id;
        store.add_budget(full.clone()).unwrap();

        let mut invalid = full.clone();
        invalid.expenses[0].amount = -1.0;
        assert!(store.update_budget(invalid).is_err());

        let mut grown = full.clone();
        grown.expenses.push(expense(1.0));
        assert!(store.update_budget(grown.clone()).is_err());
        assert_eq!(store.budget(id).unwrap().expense_count(), DEFAULT_EXPENSE_LIMIT);

        store.toggle_limit_expenses();
        assert!(store.update_budget(grown.clone()).unwrap().is_applied());
        store.toggle_limit_expenses();

        // Already past the limit: renaming keeps every expense.
        grown.name = "Food".into();
        assert!(store.update_budget(grown.clone()).unwrap().is_applied());
        grown.expenses.push(expense(1.0));
        assert!(store.update_budget(grown).is_err());

        let reopened = BudgetStore::open(storage, StoreLimits::default()).unwrap();
        assert_eq!(
            reopened.budget(id).unwrap().expense_count(),
            DEFAULT_EXPENSE_LIMIT + 1
        );
    }

    #[test]
    fn replace_collection_refuses_invalid_snapshots() {
        let mut store = store();
        let kept = budget();
        store.add_budget(kept.clone()).unwrap();

        let mut bad_expense = BudgetCollection::new();
        let mut holder = budget();
        holder.expenses.push(expense(0.0));
        bad_expense.budgets.push(holder);
        assert!(matches!(
            store.replace_collection(bad_expense),
            Err(CoreError::Validation(_))
        ));

        let mut twin_budgets = BudgetCollection::new();
        let twin = budget();
        twin_budgets.budgets = vec![twin.clone(), twin];
        assert!(store.replace_collection(twin_budgets).is_err());

        assert_eq!(store.budgets(), &[kept][..]);

        let mut valid = BudgetCollection::new();
        let mut replacement = budget();
        replacement.expenses.push(expense(8.0));
        valid.budgets.push(replacement);
        assert!(store.replace_collection(valid).unwrap().is_applied());
        assert_eq!(store.collection().expense_count(), 1);
    }

    #[test]
    fn delete_by_offsets_ignores_out_of_range() {
        let mut store = store();
        let first = budget();
        let second = budget();
        let third = budget();
        let kept = second.id;
        for b in [first, second, third] {
            store.add_budget(b).unwrap();
        }
        assert!(store.delete_budgets_at(&[0, 2, 9]).is_applied());
        assert_eq!(store.budgets().len(), 1);
        assert_eq!(store.budgets()[0].id, kept);
        assert_eq!(store.delete_budgets_at(&[5]), MutationOutcome::Unchanged);
    }

    #[test]
    fn every_applied_mutation_writes_through() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = BudgetStore::open(Arc::clone(&storage), StoreLimits::default()).unwrap();
        assert!(!storage.contains(COLLECTION_KEY));
        let budget = budget();
        let id = budget.id;
        store.add_budget(budget).unwrap();
        store.add_expense(id, expense(12.0)).unwrap();

        let reopened = BudgetStore::open(Arc::clone(&storage), StoreLimits::default()).unwrap();
        assert_eq!(reopened.collection(), store.collection());
    }

    #[test]
    fn listeners_receive_cascade_ids() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut store = store();
        let sink = Arc::clone(&events);
        store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        let mut budget = budget();
        let expense = expense(9.0);
        let expense_id = expense.id;
        budget.expenses.push(expense);
        let id = budget.id;
        store.add_budget(budget).unwrap();
        store.delete_budget(id);

        let events = events.lock().unwrap();
        assert_eq!(events[0], StoreEvent::BudgetAdded(id));
        assert_eq!(
            events[1],
            StoreEvent::BudgetsRemoved {
                budget_ids: vec![id],
                expense_ids: vec![expense_id],
            }
        );
    }

    #[test]
    fn inactive_budgets_are_hidden_until_toggled() {
        let mut store = store();
        let budget = budget();
        let id = budget.id;
        store.add_budget(budget).unwrap();
        store.toggle_budget_active(id);
        assert!(store.visible_budgets().is_empty());
        assert!(store.active_budgets().is_empty());
        store.toggle_show_inactive_budgets();
        assert_eq!(store.visible_budgets().len(), 1);
    }

    #[test]
    fn savings_projection_lookup_reports_missing_ids() {
        let mut store = store();
        let mut budget = budget();
        let food = expense(20.0);
        let mut savings = expense(50.0).with_interest_rate("3");
        savings.category = ExpenseCategory::Savings;
        let (food_id, savings_id, id) = (food.id, savings.id, budget.id);
        budget.expenses = vec![food, savings];
        store.add_budget(budget).unwrap();

        assert!(store.savings_projection(id, savings_id).is_ok());
        assert!(matches!(
            store.savings_projection(id, food_id),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            store.savings_projection(Uuid::new_v4(), savings_id),
            Err(CoreError::BudgetNotFound(_))
        ));
        assert!(matches!(
            store.savings_projection(id, Uuid::new_v4()),
            Err(CoreError::ExpenseNotFound(_))
        ));
    }

    #[test]
    fn toggling_insights_respects_cap() {
        let mut store = store();
        assert_eq!(
            store.toggle_insight(InsightKind::UpcomingReminders),
            ToggleOutcome::AtCapacity
        );
        assert_eq!(
            store.toggle_insight(InsightKind::SavingsRate),
            ToggleOutcome::Deselected
        );
        assert_eq!(
            store.toggle_insight(InsightKind::UpcomingReminders),
            ToggleOutcome::Selected
        );
        assert_eq!(
            store.settings().selected_insights.last(),
            Some(&InsightKind::UpcomingReminders)
        );
    }
}
