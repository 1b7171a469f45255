use chrono::NaiveDateTime;

use crate::{
    core::{dates::parse_instant, Clock},
    ledger::UserId,
    storage::TransactionStore,
};

use super::{commands, registry::CommandRegistry, CliError, CommandResult};

/// State shared by every command of one CLI run.
pub struct ShellContext {
    pub store: Box<dyn TransactionStore>,
    pub user: Option<UserId>,
    pub clock: Box<dyn Clock>,
    pub registry: CommandRegistry,
}

impl ShellContext {
    pub fn new(
        store: Box<dyn TransactionStore>,
        user: Option<UserId>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut registry = CommandRegistry::new();
        for entry in commands::definitions() {
            registry.register(entry);
        }
        Self {
            store,
            user,
            clock,
            registry,
        }
    }

    pub fn store(&self) -> &dyn TransactionStore {
        self.store.as_ref()
    }

    pub fn require_user(&self) -> Result<UserId, CliError> {
        self.user.ok_or_else(|| {
            CliError::Usage(
                "no user selected; pass --user or set `default_user` in the config".into(),
            )
        })
    }

    /// `--at` when given, otherwise the clock's current instant.
    pub fn reference(&self, at: Option<&str>) -> Result<NaiveDateTime, CliError> {
        match at {
            Some(value) => Ok(parse_instant(value)?),
            None => Ok(self.clock.now()),
        }
    }

    pub fn dispatch(&mut self, name: &str, args: &[&str]) -> CommandResult {
        let handler = self
            .registry
            .handler(name)
            .ok_or_else(|| CliError::Usage(format!("unknown command `{name}`; try `help`")))?;
        handler(self, args)
    }
}
