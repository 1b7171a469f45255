use std::fmt;

use serde::Serialize;

use super::{common::BudgetId, period::DateWindow};

/// Spend against a budget amount over one resolved period.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub total_spent: f64,
    /// Negative once the budget is exceeded.
    pub remaining: f64,
    /// Zero when the budget amount is zero.
    pub percentage_spent: f64,
    pub is_over_budget: bool,
}

impl ProgressRecord {
    pub fn from_parts(amount: f64, total_spent: f64) -> Self {
        let percentage_spent = if amount > 0.0 {
            total_spent * 100.0 / amount
        } else {
            0.0
        };
        Self {
            total_spent,
            remaining: amount - total_spent,
            percentage_spent,
            is_over_budget: total_spent > amount,
        }
    }
}

impl fmt::Display for ProgressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "spent {:.2} ({:.1}%), remaining {:.2}{}",
            self.total_spent,
            self.percentage_spent,
            self.remaining,
            if self.is_over_budget { ", over budget" } else { "" }
        )
    }
}

/// Progress record enriched with the budget it belongs to.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub budget_id: BudgetId,
    pub name: String,
    pub amount: f64,
    pub period: DateWindow,
    #[serde(flatten)]
    pub record: ProgressRecord,
    pub matched_expenses: usize,
    pub threshold_reached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_keeps_remaining_consistent() {
        let record = ProgressRecord::from_parts(500.0, 550.0);
        assert_eq!(record.remaining, -50.0);
        assert!(record.is_over_budget);
        assert_eq!(record.percentage_spent, 110.0);
    }

    #[test]
    fn zero_amount_reports_zero_percent() {
        let record = ProgressRecord::from_parts(0.0, 25.0);
        assert_eq!(record.percentage_spent, 0.0);
        assert!(record.is_over_budget);
        assert_eq!(record.remaining, -25.0);
    }

    #[test]
    fn spending_exactly_the_amount_is_not_over() {
        let record = ProgressRecord::from_parts(200.0, 200.0);
        assert!(!record.is_over_budget);
        assert_eq!(record.remaining, 0.0);
        assert_eq!(record.percentage_spent, 100.0);
    }
}
