//! Command handlers for the reference CLI.

use crate::{
    core::{
        dates::{format_instant, parse_window_end, parse_window_start},
        services::{BudgetService, FlowKind, SummaryService},
    },
    ledger::{BudgetId, BudgetProgress, DateWindow},
};

use super::{
    output::{self, money, MessageKind},
    registry::CommandEntry,
    shell_context::ShellContext,
    CliError, CommandResult,
};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "period",
            "Show the window a budget covers",
            "period <budget-id> [--at DATE]",
            cmd_period,
        ),
        CommandEntry::new(
            "progress",
            "Show spending against a budget",
            "progress <budget-id> [--at DATE]",
            cmd_progress,
        ),
        CommandEntry::new(
            "overview",
            "Progress of every active budget",
            "overview [--at DATE]",
            cmd_overview,
        ),
        CommandEntry::new(
            "alerts",
            "Budgets past their notification threshold",
            "alerts [--at DATE]",
            cmd_alerts,
        ),
        CommandEntry::new(
            "dashboard",
            "Predicted income, expenses and net for a window",
            "dashboard --from DATE --to DATE",
            cmd_dashboard,
        ),
        CommandEntry::new(
            "upcoming",
            "List scheduled occurrences in a window",
            "upcoming --from DATE --to DATE",
            cmd_upcoming,
        ),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
    ]
}

/// Positional arguments plus `--name value` / `--name=value` options.
struct CommandArgs<'a> {
    positional: Vec<&'a str>,
    options: Vec<(&'a str, &'a str)>,
}

impl<'a> CommandArgs<'a> {
    fn parse(args: &[&'a str], allowed: &[&str]) -> Result<Self, CliError> {
        let mut positional = Vec::new();
        let mut options = Vec::new();
        let mut iter = args.iter().copied();
        while let Some(token) = iter.next() {
            let Some(flag) = token.strip_prefix("--") else {
                positional.push(token);
                continue;
            };
            let (name, value) = match flag.split_once('=') {
                Some((name, value)) => (name, value),
                None => {
                    let value = iter
                        .next()
                        .ok_or_else(|| CliError::Usage(format!("--{flag} needs a value")))?;
                    (flag, value)
                }
            };
            if !allowed.contains(&name) {
                return Err(CliError::Usage(format!("unknown option --{name}")));
            }
            options.push((name, value));
        }
        Ok(Self {
            positional,
            options,
        })
    }

    fn option(&self, name: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    fn require(&self, name: &str, usage: &str) -> Result<&'a str, CliError> {
        self.option(name)
            .ok_or_else(|| CliError::Usage(format!("missing --{name}; usage: {usage}")))
    }

    fn budget_id(&self, usage: &str) -> Result<BudgetId, CliError> {
        match self.positional.as_slice() {
            [id] => Ok(id.parse()?),
            _ => Err(CliError::Usage(format!("usage: {usage}"))),
        }
    }

    fn no_positional(&self, usage: &str) -> Result<(), CliError> {
        if self.positional.is_empty() {
            Ok(())
        } else {
            Err(CliError::Usage(format!("usage: {usage}")))
        }
    }

    fn window(&self, usage: &str) -> Result<DateWindow, CliError> {
        let start = parse_window_start(self.require("from", usage)?)?;
        let end = parse_window_end(self.require("to", usage)?)?;
        Ok(DateWindow::new(start, end)?)
    }
}

fn cmd_period(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "period <budget-id> [--at DATE]";
    let args = CommandArgs::parse(args, &["at"])?;
    let budget_id = args.budget_id(USAGE)?;
    let user = context.require_user()?;
    let reference = context.reference(args.option("at"))?;
    let budget = context.store().get_budget(user, budget_id)?;
    let window = BudgetService::resolve_period(&budget, reference);

    output::section(format!("Period: {}", budget.display_name()));
    output::info(format!("Kind: {}", budget.period));
    output::info(format!("From: {}", format_instant(window.start)));
    output::info(format!("To: {}", format_instant(window.end)));
    if window.is_empty() {
        output::warning("Budget starts after the reference date; the window is empty.");
    }
    Ok(())
}

fn cmd_progress(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "progress <budget-id> [--at DATE]";
    let args = CommandArgs::parse(args, &["at"])?;
    let budget_id = args.budget_id(USAGE)?;
    let user = context.require_user()?;
    let reference = context.reference(args.option("at"))?;
    let progress = BudgetService::progress_for(context.store(), user, budget_id, reference)?;
    print_progress(&progress);
    Ok(())
}

fn print_progress(progress: &BudgetProgress) {
    let record = &progress.record;
    output::section(format!("Progress: {}", progress.name));
    output::info(format!("Window: {}", progress.period));
    output::info(format!(
        "Spent: {} of {} ({:.1}%)",
        money(record.total_spent),
        money(progress.amount),
        record.percentage_spent
    ));
    output::info(format!("Remaining: {}", money(record.remaining)));
    output::info(format!("Expenses counted: {}", progress.matched_expenses));
    if record.is_over_budget {
        output::warning(format!("Over budget by {}", money(-record.remaining)));
    } else if progress.threshold_reached {
        output::warning("Notification threshold reached");
    }
}

fn cmd_overview(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = CommandArgs::parse(args, &["at"])?;
    args.no_positional("overview [--at DATE]")?;
    let user = context.require_user()?;
    let reference = context.reference(args.option("at"))?;
    let overview = BudgetService::overview(context.store(), user, reference)?;

    if overview.is_empty() {
        output::info("No active budgets.");
        return Ok(());
    }
    output::section(format!("Budget overview at {}", format_instant(reference)));
    for progress in &overview {
        let line = format!(
            "{:<20} {:>10} / {:>10} {:>6.1}%",
            progress.name,
            money(progress.record.total_spent),
            money(progress.amount),
            progress.record.percentage_spent
        );
        let kind = if progress.record.is_over_budget {
            MessageKind::Warning
        } else {
            MessageKind::Info
        };
        output::print(kind, line);
    }
    Ok(())
}

fn cmd_alerts(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = CommandArgs::parse(args, &["at"])?;
    args.no_positional("alerts [--at DATE]")?;
    let user = context.require_user()?;
    let reference = context.reference(args.option("at"))?;
    let alerts = BudgetService::threshold_alerts(context.store(), user, reference)?;

    if alerts.is_empty() {
        output::success("No budgets past their notification threshold.");
        return Ok(());
    }
    for progress in &alerts {
        output::warning(format!(
            "{}: {:.1}% of {} spent",
            progress.name,
            progress.record.percentage_spent,
            money(progress.amount)
        ));
    }
    Ok(())
}

fn cmd_dashboard(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "dashboard --from DATE --to DATE";
    let args = CommandArgs::parse(args, &["from", "to"])?;
    args.no_positional(USAGE)?;
    let window = args.window(USAGE)?;
    let user = context.require_user()?;
    let summary = SummaryService::dashboard(context.store(), user, window)?;

    output::section("Dashboard");
    output::info(format!("Window: {}", summary.window));
    output::info(format!("Predicted income: {}", money(summary.predicted_income)));
    output::info(format!("Predicted expenses: {}", money(summary.predicted_expenses)));
    let net = format!("Net: {}", money(summary.net));
    if summary.net < 0.0 {
        output::warning(net);
    } else {
        output::success(net);
    }
    if !summary.expenses_by_category.is_empty() {
        output::info("By category:");
        for entry in &summary.expenses_by_category {
            let label = entry
                .category
                .map_or_else(|| "uncategorized".to_string(), |id| id.to_string());
            output::info(format!("  {label:<36} {:>10}", money(entry.total)));
        }
    }
    Ok(())
}

fn cmd_upcoming(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "upcoming --from DATE --to DATE";
    let args = CommandArgs::parse(args, &["from", "to"])?;
    args.no_positional(USAGE)?;
    let window = args.window(USAGE)?;
    let user = context.require_user()?;
    let items = SummaryService::upcoming(context.store(), user, window)?;

    if items.is_empty() {
        output::info("Nothing scheduled.");
        return Ok(());
    }
    output::section(format!("Upcoming in {window}"));
    for item in &items {
        let kind = match item.kind {
            FlowKind::Income => "income",
            FlowKind::Expense => "expense",
        };
        output::info(format!(
            "{}  {:<7} {:>10}  {}",
            format_instant(item.date),
            kind,
            money(item.amount),
            item.label
        ));
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context
            .registry
            .get(name)
            .ok_or_else(|| CliError::Usage(format!("unknown command `{name}`")))?;
        output::section(format!("Help: {}", entry.name));
        output::info(format!("  Description: {}", entry.description));
        output::info(format!("  Usage: {}", entry.usage));
        return Ok(());
    }
    output::section("Available commands");
    for entry in context.registry.list() {
        output::info(format!("  {:<12} {}", entry.name, entry.description));
    }
    output::info("Global options: --data FILE, --user ID. Use `help <command>` for details.");
    Ok(())
}
