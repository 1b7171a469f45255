use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use shell_words::split;
use tracing::warn;

use crate::{
    config::ConfigManager,
    core::SystemClock,
    ledger::UserId,
    storage::JsonStore,
};

use super::{output, shell_context::ShellContext, CliError};

/// Options accepted before the command name.
#[derive(Debug, Default, PartialEq)]
struct GlobalOptions {
    data: Option<PathBuf>,
    user: Option<String>,
}

/// Runs one command from `args`, or every command read from stdin when `args` is empty.
pub fn run_cli(args: Vec<String>) -> Result<(), CliError> {
    let (options, rest) = split_global_options(&args)?;

    let manager = ConfigManager::new();
    let config = manager.load()?;
    crate::init_with_filter(config.log_filter.as_deref());
    output::configure_colors();

    let data_file = options
        .data
        .unwrap_or_else(|| manager.resolve_data_file(&config));
    let user = match options.user {
        Some(raw) => Some(raw.parse::<UserId>()?),
        None => config.default_user,
    };
    let store = JsonStore::open(data_file)?;
    let mut context = ShellContext::new(Box::new(store), user, Box::new(SystemClock));

    if rest.is_empty() {
        let stdin = io::stdin();
        return run_script(&mut context, stdin.lock());
    }
    let (command, tail) = rest.split_at(1);
    let tail: Vec<&str> = tail.iter().map(String::as_str).collect();
    context.dispatch(&command[0], &tail)
}

fn split_global_options(args: &[String]) -> Result<(GlobalOptions, &[String]), CliError> {
    let mut options = GlobalOptions::default();
    let mut index = 0;
    while let Some(token) = args.get(index) {
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (token.as_str(), None),
        };
        if name != "--data" && name != "--user" {
            break;
        }
        let value = match inline {
            Some(value) => value,
            None => {
                index += 1;
                args.get(index)
                    .cloned()
                    .ok_or_else(|| CliError::Usage(format!("{name} needs a value")))?
            }
        };
        if name == "--data" {
            options.data = Some(PathBuf::from(value));
        } else {
            options.user = Some(value);
        }
        index += 1;
    }
    Ok((options, &args[index..]))
}

/// Executes commands line by line. Blank lines and `#` comments are skipped, `exit` or
/// `quit` stops early. A failing command is reported and the script carries on.
fn run_script<R: BufRead>(context: &mut ShellContext, input: R) -> Result<(), CliError> {
    let mut failures = 0usize;
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let tokens = match split(trimmed) {
            Ok(tokens) => tokens,
            Err(err) => {
                report(&CliError::Usage(format!("could not parse `{trimmed}`: {err}")));
                failures += 1;
                continue;
            }
        };
        let Some((command, rest)) = tokens.split_first() else {
            continue;
        };
        if command.eq_ignore_ascii_case("exit") || command.eq_ignore_ascii_case("quit") {
            break;
        }
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        if let Err(err) = context.dispatch(command, &args) {
            report(&err);
            failures += 1;
        }
    }
    if failures > 0 {
        return Err(CliError::Command(format!("{failures} command(s) failed")));
    }
    Ok(())
}

fn report(err: &CliError) {
    warn!(error = %err, "command failed");
    output::error(err);
}
