//! Identifiers and shared traits for budgeting primitives.

use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_interval::Cadence;
use crate::errors::BudgetError;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = BudgetError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|_| {
                    BudgetError::InvalidInput(format!("`{}` is not a valid {}", s, $label))
                })
            }
        }
    };
}

opaque_id!(
    /// Owner of budgets and transactions.
    UserId,
    "user id"
);
opaque_id!(
    /// Reference to a budget.
    BudgetId,
    "budget id"
);
opaque_id!(
    /// Reference to a spending category.
    CategoryId,
    "category id"
);
opaque_id!(
    /// Reference to a single expense or income record.
    TransactionId,
    "transaction id"
);

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// A dated record that may repeat on a fixed cadence from its anchor.
pub trait Scheduled {
    /// First (or only) occurrence.
    fn anchor(&self) -> NaiveDateTime;

    fn cadence(&self) -> Option<Cadence>;

    fn is_recurring(&self) -> bool {
        self.cadence().is_some()
    }
}

/// Associates entities with optional category ownership.
pub trait BelongsToCategory {
    fn category_id(&self) -> Option<CategoryId>;
}
