use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{
    common::{BudgetId, CategoryId, UserId},
    period::{resolve_period, DateWindow},
};
use crate::errors::{BudgetError, Result};

pub const DEFAULT_NOTIFICATION_THRESHOLD: u8 = 80;

/// Enumeration of budgeting periods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
    /// Explicit `[start, end]`; without an end date it behaves like `Monthly`.
    Custom,
}

impl BudgetPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            BudgetPeriod::Daily => "daily",
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
            BudgetPeriod::Custom => "custom",
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(BudgetPeriod::Daily),
            "weekly" => Ok(BudgetPeriod::Weekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            "yearly" => Ok(BudgetPeriod::Yearly),
            "custom" => Ok(BudgetPeriod::Custom),
            _ => Err(BudgetError::InvalidPeriod(s.to_string())),
        }
    }
}

/// A spending limit over a recurring or explicit period.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: BudgetId,
    pub user: UserId,
    pub name: String,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    /// `None` covers every category.
    pub category: Option<CategoryId>,
    pub is_active: bool,
    /// Percentage (0-100) of the amount at which the budget is flagged.
    pub notification_threshold: u8,
}

impl Budget {
    pub fn new(
        user: UserId,
        name: impl Into<String>,
        amount: f64,
        period: BudgetPeriod,
        start_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: BudgetId::new(),
            user,
            name: name.into(),
            amount,
            period,
            start_date,
            end_date: None,
            category: None,
            is_active: true,
            notification_threshold: DEFAULT_NOTIFICATION_THRESHOLD,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDateTime) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.notification_threshold = threshold;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(BudgetError::InvalidInput(format!(
                "budget amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        if let Some(end) = self.end_date {
            if end <= self.start_date {
                return Err(BudgetError::InvalidInput(
                    "budget end date must be after its start date".into(),
                ));
            }
        }
        if self.notification_threshold > 100 {
            return Err(BudgetError::InvalidInput(format!(
                "notification threshold must be within 0-100, got {}",
                self.notification_threshold
            )));
        }
        Ok(())
    }

    /// The window in effect at `reference`.
    pub fn resolve_period(&self, reference: NaiveDateTime) -> DateWindow {
        resolve_period(self, reference)
    }

    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("budget {}", self.id)
        } else {
            self.name.clone()
        }
    }
}
