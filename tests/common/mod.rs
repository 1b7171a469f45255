#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use budget_progress::{
    ledger::{Budget, BudgetId, BudgetPeriod, Expense, UserId},
    storage::MemoryStore,
};
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that survives until the test binary exits.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

pub fn end_of(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_milli_opt(23, 59, 59, 999))
        .expect("valid date")
}

/// A $500 monthly budget starting 2024-01-01 with spends on Jan 5, Jan 10 and Feb 1.
pub struct GroceryFixture {
    pub store: MemoryStore,
    pub user: UserId,
    pub budget: Budget,
}

impl GroceryFixture {
    pub fn new() -> Self {
        let user = UserId::new();
        let budget = Budget::new(user, "Groceries", 500.0, BudgetPeriod::Monthly, at(2024, 1, 1));
        let mut store = MemoryStore::new();
        store.add_budget(budget.clone()).expect("add budget");
        let mut fixture = Self {
            store,
            user,
            budget,
        };
        fixture.spend(100.0, at(2024, 1, 5));
        fixture.spend(200.0, at(2024, 1, 10));
        fixture.spend(50.0, at(2024, 2, 1));
        fixture
    }

    pub fn budget_id(&self) -> BudgetId {
        self.budget.id
    }

    pub fn spend(&mut self, amount: f64, date: NaiveDateTime) {
        self.store
            .add_expense(Expense::new(self.user, self.budget.id, amount, date))
            .expect("add expense");
    }
}
