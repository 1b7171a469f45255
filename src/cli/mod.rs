pub mod commands;
pub mod output;
pub mod registry;
mod shell;
pub mod shell_context;

use std::io;

use thiserror::Error;

use crate::errors::BudgetError;

pub use shell::run_cli;

pub type CommandResult = Result<(), CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Command(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
