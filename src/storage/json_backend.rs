use std::{
    fs,
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    errors::Result,
    ledger::{Budget, BudgetId, Expense, Income, Snapshot, UserId},
    utils::{tmp_path, write_atomic},
};

use super::{ExpenseFilter, IncomeFilter, MemoryStore, TransactionStore};

/// A [`MemoryStore`] persisted as one JSON [`Snapshot`] document.
///
/// Mutations go through the inner store (via `DerefMut`) and reach disk on [`JsonStore::save`].
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    /// Loads the document at `path`; a missing file opens an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let data = fs::read_to_string(&path)?;
            let snapshot: Snapshot = serde_json::from_str(&data)?;
            let store = MemoryStore::from_snapshot(snapshot)?;
            info!(
                path = %path.display(),
                budgets = store.budgets().len(),
                expenses = store.expenses().len(),
                incomes = store.incomes().len(),
                "loaded store"
            );
            store
        } else {
            info!(path = %path.display(), "store file missing, starting empty");
            MemoryStore::new()
        };
        Ok(Self { path, inner })
    }

    /// Writes the current contents to a temporary sibling, then renames it into place.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.inner.to_snapshot())?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), "saved store");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Deref for JsonStore {
    type Target = MemoryStore;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for JsonStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl TransactionStore for JsonStore {
    fn find_expenses(&self, user: UserId, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        self.inner.find_expenses(user, filter)
    }

    fn find_incomes(&self, user: UserId, filter: &IncomeFilter) -> Result<Vec<Income>> {
        self.inner.find_incomes(user, filter)
    }

    fn get_budget(&self, user: UserId, budget: BudgetId) -> Result<Budget> {
        self.inner.get_budget(user, budget)
    }

    fn list_budgets(&self, user: UserId) -> Result<Vec<Budget>> {
        self.inner.list_budgets(user)
    }
}
