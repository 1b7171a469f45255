//! Predicted totals for a reporting window.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::{
    errors::Result,
    ledger::{
        occurrences_between, project_recurring_total, project_totals, BelongsToCategory, CategoryId,
        DateWindow, Expense, Income, UserId,
    },
    storage::{ExpenseFilter, IncomeFilter, TransactionStore},
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// `None` groups uncategorized expenses.
    pub category: Option<CategoryId>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub window: DateWindow,
    pub predicted_income: f64,
    pub predicted_expenses: f64,
    pub net: f64,
    pub expenses_by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Income,
    Expense,
}

/// One concrete occurrence of a (possibly recurring) transaction.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingItem {
    pub date: NaiveDateTime,
    pub kind: FlowKind,
    pub amount: f64,
    pub label: String,
}

pub struct SummaryService;

impl SummaryService {
    /// Projects the given transactions into `window`.
    pub fn summarize(
        window: DateWindow,
        incomes: &[Income],
        expenses: &[Expense],
    ) -> DashboardSummary {
        let predicted_income = project_totals(incomes, window.start, window.end);
        let predicted_expenses = project_totals(expenses, window.start, window.end);

        let mut by_category: BTreeMap<Option<CategoryId>, f64> = BTreeMap::new();
        for expense in expenses {
            let total = project_recurring_total(expense, window.start, window.end);
            if total != 0.0 {
                *by_category.entry(expense.category_id()).or_default() += total;
            }
        }

        DashboardSummary {
            window,
            predicted_income,
            predicted_expenses,
            net: predicted_income - predicted_expenses,
            expenses_by_category: by_category
                .into_iter()
                .map(|(category, total)| CategoryTotal { category, total })
                .collect(),
        }
    }

    /// Loads the user's transactions and summarizes them over `window`.
    ///
    /// Only the upper bound is pushed to the store: a recurring series anchored before the
    /// window can still land inside it.
    pub fn dashboard(
        store: &dyn TransactionStore,
        user: UserId,
        window: DateWindow,
    ) -> Result<DashboardSummary> {
        let (incomes, expenses) = Self::load(store, user, window)?;
        let summary = Self::summarize(window, &incomes, &expenses);
        debug!(
            %user,
            %window,
            income = summary.predicted_income,
            expenses = summary.predicted_expenses,
            net = summary.net,
            "computed dashboard summary"
        );
        Ok(summary)
    }

    /// Every occurrence inside `window`, oldest first.
    pub fn upcoming(
        store: &dyn TransactionStore,
        user: UserId,
        window: DateWindow,
    ) -> Result<Vec<UpcomingItem>> {
        let (incomes, expenses) = Self::load(store, user, window)?;
        let mut items = Vec::new();
        for income in &incomes {
            items.extend(
                occurrences_between(income, window.start, window.end).map(|date| UpcomingItem {
                    date,
                    kind: FlowKind::Income,
                    amount: income.amount,
                    label: income.source.clone(),
                }),
            );
        }
        for expense in &expenses {
            let label = expense.description.clone().unwrap_or_default();
            items.extend(
                occurrences_between(expense, window.start, window.end).map(|date| UpcomingItem {
                    date,
                    kind: FlowKind::Expense,
                    amount: expense.amount,
                    label: label.clone(),
                }),
            );
        }
        items.sort_by(|a, b| a.date.cmp(&b.date));
        debug!(%user, %window, count = items.len(), "listed upcoming occurrences");
        Ok(items)
    }

    fn load(
        store: &dyn TransactionStore,
        user: UserId,
        window: DateWindow,
    ) -> Result<(Vec<Income>, Vec<Expense>)> {
        let incomes = store.find_incomes(user, &IncomeFilter::default().until(window.end))?;
        let expenses = store.find_expenses(user, &ExpenseFilter::default().until(window.end))?;
        Ok((incomes, expenses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ledger::{BudgetId, Cadence},
        storage::MemoryStore,
    };
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn quarter() -> DateWindow {
        DateWindow::new(
            at(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 3, 31)
                .unwrap()
                .and_hms_milli_opt(23, 59, 59, 999)
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn dashboard_projects_recurring_income_and_expenses() {
        let user = UserId::new();
        let budget = BudgetId::new();
        let groceries = CategoryId::new();
        let mut store = MemoryStore::new();
        store
            .add_income(
                Income::new(user, "Salary", 1000.0, at(2023, 12, 15))
                    .with_recurrence(Cadence::Monthly),
            )
            .unwrap();
        store
            .add_expense(
                Expense::new(user, budget, 100.0, at(2024, 1, 10))
                    .with_recurrence(Cadence::Monthly)
                    .with_category(groceries),
            )
            .unwrap();
        store
            .add_expense(Expense::new(user, budget, 40.0, at(2024, 2, 2)))
            .unwrap();
        store
            .add_expense(Expense::new(user, budget, 500.0, at(2024, 4, 2)))
            .unwrap();

        let summary = SummaryService::dashboard(&store, user, quarter()).unwrap();
        assert_eq!(summary.predicted_income, 3000.0);
        assert_eq!(summary.predicted_expenses, 340.0);
        assert_eq!(summary.net, 2660.0);
        assert_eq!(
            summary.expenses_by_category,
            vec![
                CategoryTotal { category: None, total: 40.0 },
                CategoryTotal { category: Some(groceries), total: 300.0 },
            ]
        );
    }

    #[test]
    fn empty_store_summarizes_to_zero() {
        let summary =
            SummaryService::dashboard(&MemoryStore::new(), UserId::new(), quarter()).unwrap();
        assert_eq!(summary.predicted_income, 0.0);
        assert_eq!(summary.net, 0.0);
        assert!(summary.expenses_by_category.is_empty());
    }

    #[test]
    fn upcoming_lists_occurrences_in_order() {
        let user = UserId::new();
        let mut store = MemoryStore::new();
        store
            .add_income(
                Income::new(user, "Salary", 1000.0, at(2024, 1, 15))
                    .with_recurrence(Cadence::Monthly),
            )
            .unwrap();
        store
            .add_expense(
                Expense::new(user, BudgetId::new(), 9.0, at(2024, 2, 1))
                    .with_description("streaming"),
            )
            .unwrap();
        let items = SummaryService::upcoming(&store, user, quarter()).unwrap();
        let dates: Vec<_> = items.iter().map(|item| item.date).collect();
        assert_eq!(
            dates,
            vec![at(2024, 1, 15), at(2024, 2, 1), at(2024, 2, 15), at(2024, 3, 15)]
        );
        assert_eq!(items[1].kind, FlowKind::Expense);
        assert_eq!(items[1].label, "streaming");
    }

    #[test]
    fn upcoming_agrees_with_dashboard_over_long_windows() {
        let user = UserId::new();
        let mut store = MemoryStore::new();
        store
            .add_expense(
                Expense::new(user, BudgetId::new(), 2.0, at(2024, 1, 1))
                    .with_recurrence(Cadence::Daily),
            )
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 12, 31)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        let window = DateWindow::new(at(2024, 1, 1), end).unwrap();
        let items = SummaryService::upcoming(&store, user, window).unwrap();
        let summary = SummaryService::dashboard(&store, user, window).unwrap();
        assert_eq!(items.len(), 1096);
        assert_eq!(summary.predicted_expenses, 2.0 * items.len() as f64);
        assert_eq!(items.last().map(|item| item.date), Some(at(2026, 12, 31)));
    }
}
