#![doc(test(attr(deny(warnings))))]

//! Budget progress tracking and recurring transaction projection.
//!
//! The crate resolves the date window a budget currently covers, measures spending against
//! it, and projects recurring incomes and expenses into arbitrary reporting windows.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use errors::{BudgetError, Result};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing once; `directive` applies when `RUST_LOG` is unset.
pub fn init_with_filter(directive: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(directive);
        tracing::debug!("budget_progress tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init_with_filter(Some("budget_progress=trace"));
    }
}
