//! JSON wire shapes exchanged with stores and presentation layers.
//!
//! Records use camelCase field names and ISO-8601 date strings. Converting a record into
//! a domain entity is where every boundary check happens.

use serde::{Deserialize, Serialize};

use super::{
    budget::{Budget, BudgetPeriod, DEFAULT_NOTIFICATION_THRESHOLD},
    common::{BudgetId, CategoryId, Scheduled, TransactionId, UserId},
    time_interval::Cadence,
    transaction::{Expense, Income},
};
use crate::{
    core::dates::{format_instant, parse_instant},
    errors::{BudgetError, Result},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    pub id: BudgetId,
    pub user: UserId,
    #[serde(default)]
    pub name: String,
    pub amount: f64,
    pub period: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(default = "BudgetRecord::default_active")]
    pub is_active: bool,
    #[serde(default = "BudgetRecord::default_threshold")]
    pub notification_threshold: u8,
}

impl BudgetRecord {
    fn default_active() -> bool {
        true
    }

    fn default_threshold() -> u8 {
        DEFAULT_NOTIFICATION_THRESHOLD
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: TransactionId,
    pub user: UserId,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_frequency: Option<String>,
    pub budget: BudgetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeRecord {
    pub id: TransactionId,
    pub user: UserId,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_frequency: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Everything a store holds, as persisted by the JSON backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub budgets: Vec<BudgetRecord>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
    #[serde(default)]
    pub incomes: Vec<IncomeRecord>,
}

/// Interprets the `isRecurring` / `recurringFrequency` pair.
pub fn parse_recurrence(is_recurring: bool, frequency: Option<&str>) -> Result<Option<Cadence>> {
    let frequency = frequency
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("none"));
    match (is_recurring, frequency) {
        (true, Some(value)) => value.parse().map(Some),
        (true, None) => Err(BudgetError::InvalidCadence(
            "recurring transaction has no frequency".into(),
        )),
        (false, None) => Ok(None),
        (false, Some(value)) => Err(BudgetError::InvalidInput(format!(
            "frequency `{value}` given for a non-recurring transaction"
        ))),
    }
}

impl TryFrom<BudgetRecord> for Budget {
    type Error = BudgetError;

    fn try_from(record: BudgetRecord) -> Result<Self> {
        let period: BudgetPeriod = record.period.parse()?;
        let budget = Budget {
            id: record.id,
            user: record.user,
            name: record.name,
            amount: record.amount,
            period,
            start_date: parse_instant(&record.start_date)?,
            end_date: record.end_date.as_deref().map(parse_instant).transpose()?,
            category: record.category,
            is_active: record.is_active,
            notification_threshold: record.notification_threshold,
        };
        budget.validate()?;
        Ok(budget)
    }
}

impl From<&Budget> for BudgetRecord {
    fn from(budget: &Budget) -> Self {
        Self {
            id: budget.id,
            user: budget.user,
            name: budget.name.clone(),
            amount: budget.amount,
            period: budget.period.as_str().to_string(),
            start_date: format_instant(budget.start_date),
            end_date: budget.end_date.map(format_instant),
            category: budget.category,
            is_active: budget.is_active,
            notification_threshold: budget.notification_threshold,
        }
    }
}

impl TryFrom<ExpenseRecord> for Expense {
    type Error = BudgetError;

    fn try_from(record: ExpenseRecord) -> Result<Self> {
        let expense = Expense {
            id: record.id,
            user: record.user,
            amount: record.amount,
            date: parse_instant(&record.date)?,
            recurrence: parse_recurrence(
                record.is_recurring,
                record.recurring_frequency.as_deref(),
            )?,
            budget: record.budget,
            category: record.category,
            description: record.description,
        };
        expense.validate()?;
        Ok(expense)
    }
}

impl From<&Expense> for ExpenseRecord {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            user: expense.user,
            amount: expense.amount,
            date: format_instant(expense.date),
            is_recurring: expense.is_recurring(),
            recurring_frequency: expense.recurrence.map(|c| c.as_str().to_string()),
            budget: expense.budget,
            category: expense.category,
            description: expense.description.clone(),
        }
    }
}

impl TryFrom<IncomeRecord> for Income {
    type Error = BudgetError;

    fn try_from(record: IncomeRecord) -> Result<Self> {
        let income = Income {
            id: record.id,
            user: record.user,
            amount: record.amount,
            date: parse_instant(&record.date)?,
            recurrence: parse_recurrence(
                record.is_recurring,
                record.recurring_frequency.as_deref(),
            )?,
            source: record.source,
            description: record.description,
        };
        income.validate()?;
        Ok(income)
    }
}

impl From<&Income> for IncomeRecord {
    fn from(income: &Income) -> Self {
        Self {
            id: income.id,
            user: income.user,
            amount: income.amount,
            date: format_instant(income.date),
            is_recurring: income.is_recurring(),
            recurring_frequency: income.recurrence.map(|c| c.as_str().to_string()),
            source: income.source.clone(),
            description: income.description.clone(),
        }
    }
}
