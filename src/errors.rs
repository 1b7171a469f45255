use std::result::Result as StdResult;

use thiserror::Error;

/// Error type shared by the period resolver, progress calculator, projector and stores.
#[derive(Debug, Error, PartialEq)]
pub enum BudgetError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid recurring frequency: {0}")]
    InvalidCadence(String),
    #[error("Invalid budget period: {0}")]
    InvalidPeriod(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::Storage(err.to_string())
    }
}
