//! Budget progress: how much of a budget has been spent in its current period.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::{
    errors::Result,
    ledger::{
        resolve_period, Budget, BudgetId, BudgetProgress, DateWindow, Expense, ProgressRecord,
        UserId,
    },
    storage::{ExpenseFilter, TransactionStore},
};

pub struct BudgetService;

impl BudgetService {
    pub fn resolve_period(budget: &Budget, reference: NaiveDateTime) -> DateWindow {
        resolve_period(budget, reference)
    }

    /// Progress of `budget` over the period containing `reference`.
    ///
    /// Ownership is not checked here; fetch the budget through the store first.
    pub fn calculate_progress(
        budget: &Budget,
        reference: NaiveDateTime,
        store: &dyn TransactionStore,
    ) -> Result<ProgressRecord> {
        Ok(Self::track(budget, reference, store)?.record)
    }

    /// Like [`BudgetService::calculate_progress`], keeping the window and match count.
    pub fn track(
        budget: &Budget,
        reference: NaiveDateTime,
        store: &dyn TransactionStore,
    ) -> Result<BudgetProgress> {
        let period = resolve_period(budget, reference);
        let filter = ExpenseFilter::for_budget(budget.id).between(period.start, period.end);
        let expenses = store.find_expenses(budget.user, &filter)?;
        Ok(Self::progress_from_expenses(budget, period, &expenses))
    }

    /// Computes progress from an in-memory list.
    ///
    /// Expenses for other budgets or outside `period` are ignored.
    pub fn progress_from_expenses(
        budget: &Budget,
        period: DateWindow,
        expenses: &[Expense],
    ) -> BudgetProgress {
        let matched: Vec<&Expense> = expenses
            .iter()
            .filter(|expense| expense.budget == budget.id && period.contains(expense.date))
            .collect();
        let total_spent: f64 = matched.iter().map(|expense| expense.amount).sum();
        let record = ProgressRecord::from_parts(budget.amount, total_spent);
        let threshold_reached = total_spent > 0.0
            && (budget.amount <= 0.0
                || record.percentage_spent >= f64::from(budget.notification_threshold));
        debug!(
            budget = %budget.id,
            %period,
            total_spent,
            remaining = record.remaining,
            percentage = record.percentage_spent,
            over = record.is_over_budget,
            "calculated budget progress"
        );
        BudgetProgress {
            budget_id: budget.id,
            name: budget.display_name(),
            amount: budget.amount,
            period,
            record,
            matched_expenses: matched.len(),
            threshold_reached,
        }
    }

    pub fn progress_for(
        store: &dyn TransactionStore,
        user: UserId,
        budget_id: BudgetId,
        reference: NaiveDateTime,
    ) -> Result<BudgetProgress> {
        let budget = store.get_budget(user, budget_id)?;
        Self::track(&budget, reference, store)
    }

    /// Progress of every active budget of `user`, ordered by name.
    pub fn overview(
        store: &dyn TransactionStore,
        user: UserId,
        reference: NaiveDateTime,
    ) -> Result<Vec<BudgetProgress>> {
        let mut budgets: Vec<Budget> = store
            .list_budgets(user)?
            .into_iter()
            .filter(|budget| budget.is_active)
            .collect();
        budgets.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        budgets
            .iter()
            .map(|budget| Self::track(budget, reference, store))
            .collect()
    }

    /// Active budgets whose spend has reached their notification threshold.
    pub fn threshold_alerts(
        store: &dyn TransactionStore,
        user: UserId,
        reference: NaiveDateTime,
    ) -> Result<Vec<BudgetProgress>> {
        Ok(Self::overview(store, user, reference)?
            .into_iter()
            .filter(|progress| progress.threshold_reached)
            .collect())
    }
}
