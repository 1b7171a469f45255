//! Resolution of a budget's active date window.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{
    budget::{Budget, BudgetPeriod},
    time_interval::{
        end_of_day, first_day_of_month, first_day_of_year, last_day_of_month, last_day_of_year,
        start_of_day, start_of_week,
    },
};
use crate::{
    core::dates::format_instant,
    errors::{BudgetError, Result},
};

/// Inclusive `[start, end]` interval of local instants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if end < start {
            return Err(BudgetError::InvalidInput(
                "window end must not precede its start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: start_of_day(date),
            end: end_of_day(date),
        }
    }

    pub fn week(date: NaiveDate) -> Self {
        let monday = start_of_week(date);
        Self {
            start: start_of_day(monday),
            end: end_of_day(monday + chrono::Duration::days(6)),
        }
    }

    pub fn month(date: NaiveDate) -> Self {
        Self {
            start: start_of_day(first_day_of_month(date)),
            end: end_of_day(last_day_of_month(date)),
        }
    }

    pub fn year(date: NaiveDate) -> Self {
        Self {
            start: start_of_day(first_day_of_year(date)),
            end: end_of_day(last_day_of_year(date)),
        }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// True when clamping pushed the start past the end.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            format_instant(self.start),
            format_instant(self.end)
        )
    }
}

/// Computes the window a budget covers at `reference`.
///
/// An explicit end date wins outright. Otherwise the calendar day, ISO week, month or
/// year containing `reference` is used (custom budgets without an end fall back to the
/// month), and its start is clamped so it never precedes the budget's own start.
pub fn resolve_period(budget: &Budget, reference: NaiveDateTime) -> DateWindow {
    if let Some(end) = budget.end_date {
        return DateWindow {
            start: budget.start_date,
            end,
        };
    }

    let day = reference.date();
    let mut window = match budget.period {
        BudgetPeriod::Daily => DateWindow::day(day),
        BudgetPeriod::Weekly => DateWindow::week(day),
        BudgetPeriod::Monthly | BudgetPeriod::Custom => DateWindow::month(day),
        BudgetPeriod::Yearly => DateWindow::year(day),
    };
    if budget.start_date > window.start {
        window.start = budget.start_date;
    }
    trace!(budget = %budget.id, period = %budget.period, %window, "resolved budget period");
    window
}
