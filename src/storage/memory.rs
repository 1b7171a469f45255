use crate::{
    errors::{BudgetError, Result},
    ledger::{
        Budget, BudgetId, BudgetRecord, Expense, ExpenseRecord, Income, IncomeRecord, Snapshot,
        UserId,
    },
};

use super::{ExpenseFilter, IncomeFilter, TransactionStore};

/// Store holding everything in plain vectors.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    budgets: Vec<Budget>,
    expenses: Vec<Expense>,
    incomes: Vec<Income>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_budget(&mut self, budget: Budget) -> Result<BudgetId> {
        budget.validate()?;
        if self.budgets.iter().any(|existing| existing.id == budget.id) {
            return Err(BudgetError::InvalidInput(format!(
                "budget {} already exists",
                budget.id
            )));
        }
        let id = budget.id;
        self.budgets.push(budget);
        Ok(id)
    }

    pub fn add_expense(&mut self, expense: Expense) -> Result<()> {
        expense.validate()?;
        self.expenses.push(expense);
        Ok(())
    }

    pub fn add_income(&mut self, income: Income) -> Result<()> {
        income.validate()?;
        self.incomes.push(income);
        Ok(())
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn incomes(&self) -> &[Income] {
        &self.incomes
    }

    /// Builds a store from persisted records, validating every entry.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut store = Self::new();
        for record in snapshot.budgets {
            store.add_budget(Budget::try_from(record)?)?;
        }
        for record in snapshot.expenses {
            store.add_expense(Expense::try_from(record)?)?;
        }
        for record in snapshot.incomes {
            store.add_income(Income::try_from(record)?)?;
        }
        Ok(store)
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            budgets: self.budgets.iter().map(BudgetRecord::from).collect(),
            expenses: self.expenses.iter().map(ExpenseRecord::from).collect(),
            incomes: self.incomes.iter().map(IncomeRecord::from).collect(),
        }
    }
}

impl TransactionStore for MemoryStore {
    fn find_expenses(&self, user: UserId, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        Ok(self
            .expenses
            .iter()
            .filter(|expense| expense.user == user && filter.matches(expense))
            .cloned()
            .collect())
    }

    fn find_incomes(&self, user: UserId, filter: &IncomeFilter) -> Result<Vec<Income>> {
        Ok(self
            .incomes
            .iter()
            .filter(|income| income.user == user && filter.matches(income))
            .cloned()
            .collect())
    }

    fn get_budget(&self, user: UserId, budget: BudgetId) -> Result<Budget> {
        self.budgets
            .iter()
            .find(|candidate| candidate.id == budget && candidate.user == user)
            .cloned()
            .ok_or_else(|| BudgetError::NotFound(format!("budget {budget}")))
    }

    fn list_budgets(&self, user: UserId) -> Result<Vec<Budget>> {
        Ok(self
            .budgets
            .iter()
            .filter(|budget| budget.user == user)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::BudgetPeriod;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn foreign_budget_is_not_found() {
        let owner = UserId::new();
        let mut store = MemoryStore::new();
        let id = store
            .add_budget(Budget::new(owner, "Food", 300.0, BudgetPeriod::Monthly, at(2024, 1, 1)))
            .unwrap();
        assert!(store.get_budget(owner, id).is_ok());
        assert!(matches!(
            store.get_budget(UserId::new(), id),
            Err(BudgetError::NotFound(_))
        ));
        assert!(store.list_budgets(UserId::new()).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_positive_expense() {
        let mut store = MemoryStore::new();
        let err = store
            .add_expense(Expense::new(UserId::new(), BudgetId::new(), 0.0, at(2024, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, BudgetError::InvalidInput(_)));
    }

    #[test]
    fn rejects_duplicate_budget_ids() {
        let budget = Budget::new(
            UserId::new(),
            "Rent",
            900.0,
            BudgetPeriod::Monthly,
            at(2024, 1, 1),
        );
        let mut store = MemoryStore::new();
        store.add_budget(budget.clone()).unwrap();
        assert!(store.add_budget(budget).is_err());
    }

    #[test]
    fn finds_only_the_users_expenses() {
        let user = UserId::new();
        let budget = BudgetId::new();
        let mut store = MemoryStore::new();
        store
            .add_expense(Expense::new(user, budget, 10.0, at(2024, 1, 2)))
            .unwrap();
        store
            .add_expense(Expense::new(UserId::new(), budget, 99.0, at(2024, 1, 2)))
            .unwrap();
        let found = store
            .find_expenses(user, &ExpenseFilter::for_budget(budget))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amount, 10.0);
    }

    #[test]
    fn snapshot_round_trip_keeps_entities() {
        let user = UserId::new();
        let mut store = MemoryStore::new();
        let id = store
            .add_budget(Budget::new(user, "Fun", 50.0, BudgetPeriod::Weekly, at(2024, 1, 1)))
            .unwrap();
        store
            .add_expense(Expense::new(user, id, 12.5, at(2024, 1, 3)).with_description("cinema"))
            .unwrap();
        let restored = MemoryStore::from_snapshot(store.to_snapshot()).unwrap();
        assert_eq!(restored.budgets(), store.budgets());
        assert_eq!(restored.expenses(), store.expenses());
    }
}
