use chrono::NaiveDateTime;

use super::{
    common::{Amounted, BelongsToCategory, BudgetId, CategoryId, Scheduled, TransactionId, UserId},
    time_interval::Cadence,
};
use crate::errors::{BudgetError, Result};

/// Money leaving the user, always attributed to one budget.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: TransactionId,
    pub user: UserId,
    pub amount: f64,
    /// Anchor of a recurring series, or the single occurrence.
    pub date: NaiveDateTime,
    pub recurrence: Option<Cadence>,
    pub budget: BudgetId,
    pub category: Option<CategoryId>,
    pub description: Option<String>,
}

impl Expense {
    pub fn new(user: UserId, budget: BudgetId, amount: f64, date: NaiveDateTime) -> Self {
        Self {
            id: TransactionId::new(),
            user,
            amount,
            date,
            recurrence: None,
            budget,
            category: None,
            description: None,
        }
    }

    pub fn with_recurrence(mut self, cadence: Cadence) -> Self {
        self.recurrence = Some(cadence);
        self
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
    }
}

/// Money received by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    pub id: TransactionId,
    pub user: UserId,
    pub amount: f64,
    pub date: NaiveDateTime,
    pub recurrence: Option<Cadence>,
    pub source: String,
    pub description: Option<String>,
}

impl Income {
    pub fn new(
        user: UserId,
        source: impl Into<String>,
        amount: f64,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user,
            amount,
            date,
            recurrence: None,
            source: source.into(),
            description: None,
        }
    }

    pub fn with_recurrence(mut self, cadence: Cadence) -> Self {
        self.recurrence = Some(cadence);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(BudgetError::InvalidInput(format!(
            "transaction amount must be positive, got {amount}"
        )))
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Scheduled for Expense {
    fn anchor(&self) -> NaiveDateTime {
        self.date
    }

    fn cadence(&self) -> Option<Cadence> {
        self.recurrence
    }
}

impl BelongsToCategory for Expense {
    fn category_id(&self) -> Option<CategoryId> {
        self.category
    }
}

impl Amounted for Income {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Scheduled for Income {
    fn anchor(&self) -> NaiveDateTime {
        self.date
    }

    fn cadence(&self) -> Option<Cadence> {
        self.recurrence
    }
}
