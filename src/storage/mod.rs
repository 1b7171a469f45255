//! Transaction store abstraction and the shipped backends.

pub mod json_backend;
pub mod memory;

use chrono::NaiveDateTime;

use crate::{
    errors::Result,
    ledger::{Budget, BudgetId, CategoryId, Expense, Income, UserId},
};

pub use json_backend::JsonStore;
pub use memory::MemoryStore;

/// Read access to a user's budgets and transactions.
///
/// Every query is scoped to one user; implementations never return another user's data.
pub trait TransactionStore: Send + Sync {
    fn find_expenses(&self, user: UserId, filter: &ExpenseFilter) -> Result<Vec<Expense>>;
    fn find_incomes(&self, user: UserId, filter: &IncomeFilter) -> Result<Vec<Income>>;
    /// Fails with `NotFound` when the budget is missing or owned by someone else.
    fn get_budget(&self, user: UserId, budget: BudgetId) -> Result<Budget>;
    fn list_budgets(&self, user: UserId) -> Result<Vec<Budget>>;
}

/// Expense query. Date bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExpenseFilter {
    pub budget_id: Option<BudgetId>,
    pub category_id: Option<CategoryId>,
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
}

impl ExpenseFilter {
    pub fn for_budget(budget: BudgetId) -> Self {
        Self {
            budget_id: Some(budget),
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category: CategoryId) -> Self {
        self.category_id = Some(category);
        self
    }

    pub fn since(mut self, from: NaiveDateTime) -> Self {
        self.date_from = Some(from);
        self
    }

    pub fn until(mut self, to: NaiveDateTime) -> Self {
        self.date_to = Some(to);
        self
    }

    pub fn between(self, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        self.since(from).until(to)
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.budget_id.map_or(true, |id| expense.budget == id)
            && self
                .category_id
                .map_or(true, |id| expense.category == Some(id))
            && within(expense.date, self.date_from, self.date_to)
    }
}

/// Income query. Date bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IncomeFilter {
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
}

impl IncomeFilter {
    pub fn since(mut self, from: NaiveDateTime) -> Self {
        self.date_from = Some(from);
        self
    }

    pub fn until(mut self, to: NaiveDateTime) -> Self {
        self.date_to = Some(to);
        self
    }

    pub fn between(self, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        self.since(from).until(to)
    }

    pub fn matches(&self, income: &Income) -> bool {
        within(income.date, self.date_from, self.date_to)
    }
}

fn within(date: NaiveDateTime, from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> bool {
    from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn expense_filter_bounds_are_inclusive() {
        let budget = BudgetId::new();
        let filter = ExpenseFilter::for_budget(budget).between(at(2024, 1, 1), at(2024, 1, 31));
        let edge = Expense::new(UserId::new(), budget, 10.0, at(2024, 1, 31));
        let outside = Expense::new(UserId::new(), budget, 10.0, at(2024, 2, 1));
        let other_budget = Expense::new(UserId::new(), BudgetId::new(), 10.0, at(2024, 1, 15));
        assert!(filter.matches(&edge));
        assert!(!filter.matches(&outside));
        assert!(!filter.matches(&other_budget));
    }

    #[test]
    fn category_filter_skips_uncategorized() {
        let category = CategoryId::new();
        let filter = ExpenseFilter::default().in_category(category);
        let tagged = Expense::new(UserId::new(), BudgetId::new(), 1.0, at(2024, 1, 1))
            .with_category(category);
        let untagged = Expense::new(UserId::new(), BudgetId::new(), 1.0, at(2024, 1, 1));
        assert!(filter.matches(&tagged));
        assert!(!filter.matches(&untagged));
    }

    #[test]
    fn open_income_filter_matches_everything() {
        let income = Income::new(UserId::new(), "Gift", 5.0, at(1999, 12, 31));
        assert!(IncomeFilter::default().matches(&income));
        assert!(!IncomeFilter::default().since(at(2000, 1, 1)).matches(&income));
    }
}
