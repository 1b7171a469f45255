//! Budget domain models, period resolution, and recurrence projection.

pub mod budget;
pub mod common;
pub mod period;
pub mod progress;
pub mod records;
pub mod recurring;
pub mod time_interval;
pub mod transaction;

pub use budget::{Budget, BudgetPeriod, DEFAULT_NOTIFICATION_THRESHOLD};
pub use common::{
    Amounted, BelongsToCategory, BudgetId, CategoryId, Scheduled, TransactionId, UserId,
};
pub use period::{resolve_period, DateWindow};
pub use progress::{BudgetProgress, ProgressRecord};
pub use records::{BudgetRecord, ExpenseRecord, IncomeRecord, Snapshot};
pub use recurring::{
    count_occurrences, next_occurrence, occurrences_between, project_recurring_total,
    project_totals, Occurrences,
};
pub use time_interval::Cadence;
pub use transaction::{Expense, Income};
