//! Command handlers. Every handler validates its arguments, calls into the
//! ledger store or the projection service, and prints the outcome.

use crate::cli::context::{
    parse_amount, parse_date, parse_position, CommandError, CommandResult, LoopControl,
    ShellContext,
};
use crate::cli::output;
use crate::core::services::{CategoryService, ProjectionService};
use crate::domain::{
    period::{Granularity, PeriodFilter},
    transaction::{ExpenseEntry, IncomeEntry},
};
use crate::errors::LedgerError;

pub(crate) const COMMAND_NAMES: &[&str] = &[
    "income", "expense", "category", "summary", "pie", "totals", "config", "help", "exit", "quit",
];

const HELP: &[(&str, &str)] = &[
    ("income add <amount> <date> [description]", "Record income"),
    ("income update <#> <amount> <date> [description]", "Replace an income entry"),
    ("income delete <#>", "Delete an income entry"),
    ("income list [filter]", "List income, e.g. `income list month 2024-03`"),
    ("expense add <amount> <category> <date> [description]", "Record an expense"),
    ("expense update <#> <amount> <category> <date> [description]", "Replace an expense"),
    ("expense delete <#>", "Delete an expense"),
    ("expense list [filter]", "List expenses"),
    ("category add <name> [description]", "Create a category"),
    (
        "category update <name> <new name> [description]",
        "Rename a category and relabel its expenses",
    ),
    ("category delete <name>", "Delete a category and every expense filed under it"),
    ("category list", "List categories"),
    ("summary <day|month|year> [filter]", "Expense and income totals per period"),
    ("pie <day|month|year> <period>", "Expenses per category inside one period"),
    ("totals [filter]", "Income, expenses and balance"),
    ("config show", "Show the saved settings"),
    (
        "config set <currency|retention|log-filter|ledger-file> <value>",
        "Change and save a setting",
    ),
    ("help", "Show this help"),
    ("exit", "Leave the shell"),
];

pub(crate) fn dispatch(context: &mut ShellContext, command: &str, args: &[&str]) -> CommandResult {
    match command {
        "income" => income(context, args),
        "expense" => expense(context, args),
        "category" => category(context, args),
        "summary" => summary(context, args),
        "pie" => pie(context, args),
        "totals" => totals(context, args),
        "config" => config(context, args),
        "help" => {
            print_help();
            Ok(LoopControl::Continue)
        }
        "exit" | "quit" => Ok(LoopControl::Exit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn print_help() {
    output::section("Commands");
    let rows: Vec<Vec<String>> = HELP
        .iter()
        .map(|(usage, about)| vec![usage.to_string(), about.to_string()])
        .collect();
    output::info(output::render_table(&["Usage", "Description"], &rows));
    output::info("Filters: all | day YYYY-MM-DD | month YYYY-MM | year YYYY | range <from> <to>");
}

fn income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, "income")?;
    match action {
        "add" => {
            expect_at_least(rest, 2, "income add <amount> <date> [description]")?;
            let entry = IncomeEntry::new(
                parse_amount(rest[0])?,
                rest[2..].join(" "),
                parse_date(rest[1])?,
            )?;
            context.store.add_income(entry)?;
            output::success(format!(
                "Income added at position {}.",
                context.store.income().len()
            ));
        }
        "update" => {
            expect_at_least(rest, 3, "income update <#> <amount> <date> [description]")?;
            let index = parse_position(rest[0])?;
            let entry = IncomeEntry::new(
                parse_amount(rest[1])?,
                rest[3..].join(" "),
                parse_date(rest[2])?,
            )?;
            context.store.update_income(index, entry).map_err(position_error)?;
            output::success(format!("Income {} updated.", index + 1));
        }
        "delete" => {
            expect_at_least(rest, 1, "income delete <#>")?;
            let index = parse_position(rest[0])?;
            let removed = context.store.delete_income(index).map_err(position_error)?;
            output::success(format!(
                "Income {} deleted ({} on {}).",
                index + 1,
                context.amount(removed.amount),
                removed.date
            ));
        }
        "list" => {
            let filter = parse_filter(rest)?;
            let rows = ProjectionService::income_rows(context.store.ledger(), &filter);
            if rows.is_empty() {
                output::info(format!("No income for {filter}."));
            } else {
                let table: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| {
                        vec![
                            (row.position + 1).to_string(),
                            row.date.to_string(),
                            context.amount(row.amount),
                            row.description.clone(),
                        ]
                    })
                    .collect();
                output::info(output::render_table(
                    &["#", "Date", "Amount", "Description"],
                    &table,
                ));
            }
        }
        other => return Err(unknown_action("income", other)),
    }
    Ok(LoopControl::Continue)
}

fn expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, "expense")?;
    match action {
        "add" => {
            expect_at_least(rest, 3, "expense add <amount> <category> <date> [description]")?;
            let entry = ExpenseEntry::new(
                parse_amount(rest[0])?,
                rest[3..].join(" "),
                rest[1],
                parse_date(rest[2])?,
            )?;
            context.store.add_expense(entry)?;
            output::success(format!(
                "Expense added at position {}.",
                context.store.expenses().len()
            ));
        }
        "update" => {
            expect_at_least(
                rest,
                4,
                "expense update <#> <amount> <category> <date> [description]",
            )?;
            let index = parse_position(rest[0])?;
            let entry = ExpenseEntry::new(
                parse_amount(rest[1])?,
                rest[4..].join(" "),
                rest[2],
                parse_date(rest[3])?,
            )?;
            context.store.update_expense(index, entry).map_err(position_error)?;
            output::success(format!("Expense {} updated.", index + 1));
        }
        "delete" => {
            expect_at_least(rest, 1, "expense delete <#>")?;
            let index = parse_position(rest[0])?;
            let removed = context.store.delete_expense(index).map_err(position_error)?;
            output::success(format!(
                "Expense {} deleted ({} for {}).",
                index + 1,
                context.amount(removed.amount),
                removed.category
            ));
        }
        "list" => {
            let filter = parse_filter(rest)?;
            let rows = ProjectionService::expense_rows(context.store.ledger(), &filter);
            if rows.is_empty() {
                output::info(format!("No expenses for {filter}."));
            } else {
                let table: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| {
                        vec![
                            (row.position + 1).to_string(),
                            row.date.to_string(),
                            context.amount(row.amount),
                            row.category.clone(),
                            row.description.clone(),
                        ]
                    })
                    .collect();
                output::info(output::render_table(
                    &["#", "Date", "Amount", "Category", "Description"],
                    &table,
                ));
            }
        }
        other => return Err(unknown_action("expense", other)),
    }
    Ok(LoopControl::Continue)
}

fn category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, "category")?;
    match action {
        "add" => {
            expect_at_least(rest, 1, "category add <name> [description]")?;
            if context.store.add_category(rest[0], rest[1..].join(" "))? {
                output::success(format!("Category `{}` added.", rest[0]));
            } else {
                output::warning(format!("Category `{}` already exists.", rest[0]));
            }
        }
        "update" => {
            expect_at_least(rest, 2, "category update <name> <new name> [description]")?;
            let relabelled = context
                .store
                .update_category(rest[0], rest[1], &rest[2..].join(" "))?;
            output::success(format!(
                "Category `{}` is now `{}` ({} expense(s) relabelled).",
                rest[0], rest[1], relabelled
            ));
        }
        "delete" => {
            expect_at_least(rest, 1, "category delete <name>")?;
            let removed = context.store.delete_category(rest[0])?;
            output::success(format!(
                "Category `{}` deleted with {} expense(s).",
                rest[0], removed
            ));
        }
        "list" => {
            let categories = CategoryService::list(context.store.ledger());
            if categories.is_empty() {
                output::info("No categories yet.");
            } else {
                let table: Vec<Vec<String>> = categories
                    .iter()
                    .map(|category| vec![category.name.clone(), category.description.clone()])
                    .collect();
                output::info(output::render_table(&["Name", "Description"], &table));
            }
        }
        other => return Err(unknown_action("category", other)),
    }
    Ok(LoopControl::Continue)
}

fn summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_at_least(args, 1, "summary <day|month|year> [filter]")?;
    let granularity: Granularity = args[0].parse()?;
    let filter = parse_filter(&args[1..])?;
    let series = ProjectionService::line_summary(context.store.ledger(), granularity, &filter);
    if series.is_empty() {
        output::info(format!("No transactions for {filter}."));
        return Ok(LoopControl::Continue);
    }
    let table: Vec<Vec<String>> = series
        .points()
        .map(|(key, expenses, income)| {
            vec![key.to_string(), context.amount(expenses), context.amount(income)]
        })
        .collect();
    output::section(format!("Summary by {granularity}"));
    output::info(output::render_table(&["Period", "Expenses", "Income"], &table));
    Ok(LoopControl::Continue)
}

fn pie(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_at_least(args, 2, "pie <day|month|year> <period>")?;
    match ProjectionService::category_pie(context.store.ledger(), args[0], args[1])? {
        None => output::info(format!("No expenses recorded for {} {}.", args[0], args[1])),
        Some(distribution) => {
            let table: Vec<Vec<String>> = distribution
                .shares()
                .into_iter()
                .map(|(name, share)| {
                    let amount = distribution.totals.get(name).copied().unwrap_or_default();
                    vec![name.to_string(), context.amount(amount), format!("{share:.1}%")]
                })
                .collect();
            output::section(format!("Expenses by category for {}", distribution.period));
            output::info(output::render_table(&["Category", "Amount", "Share"], &table));
        }
    }
    Ok(LoopControl::Continue)
}

fn totals(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = parse_filter(args)?;
    let totals = ProjectionService::totals(context.store.ledger(), &filter);
    let table = vec![
        vec!["Income".to_string(), context.amount(totals.income)],
        vec!["Expenses".to_string(), context.amount(totals.expenses)],
        vec!["Balance".to_string(), context.amount(totals.balance)],
    ];
    output::section(format!("Totals for {filter}"));
    output::info(output::render_table(&["", "Amount"], &table));
    Ok(LoopControl::Continue)
}

fn config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "config <show|set <key> <value>>";
    match args {
        ["show"] => {
            let config = &context.config;
            let optional = |value: Option<String>| value.unwrap_or_else(|| "(default)".into());
            let mut rows = vec![
                vec!["currency".to_string(), config.currency.clone()],
                vec!["retention".to_string(), config.backup_retention.to_string()],
                vec!["log-filter".to_string(), optional(config.log_filter.clone())],
                vec![
                    "ledger-file".to_string(),
                    config.resolve_ledger_file().display().to_string(),
                ],
            ];
            if let Some(manager) = &context.config_manager {
                rows.push(vec![
                    "config file".to_string(),
                    manager.config_path().display().to_string(),
                ]);
            }
            output::section("Settings");
            output::info(output::render_table(&["Key", "Value"], &rows));
        }
        ["set", key, value] => {
            let Some(manager) = context.config_manager.as_ref() else {
                return Err(CommandError::InvalidArguments(
                    "settings cannot be saved in this session".into(),
                ));
            };
            let mut updated = context.config.clone();
            match *key {
                "currency" => updated.currency = value.to_string(),
                "retention" => {
                    updated.backup_retention = value.parse().map_err(|_| {
                        CommandError::InvalidArguments(format!("invalid retention `{value}`"))
                    })?
                }
                "log-filter" => updated.log_filter = Some(value.to_string()),
                "ledger-file" => updated.ledger_file = Some((*value).into()),
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown setting `{other}` (expected currency, retention, log-filter or ledger-file)"
                    )))
                }
            }
            manager.save(&updated)?;
            context.config = updated;
            if *key == "currency" {
                output::success(format!("Currency set to {value}."));
            } else {
                output::success(format!("Saved `{key}`; it applies from the next start."));
            }
        }
        _ => return Err(CommandError::InvalidArguments(format!("usage: {USAGE}"))),
    }
    Ok(LoopControl::Continue)
}

fn parse_filter(args: &[&str]) -> Result<PeriodFilter, CommandError> {
    match args.split_first() {
        None => Ok(PeriodFilter::All),
        Some((mode, values)) => Ok(PeriodFilter::parse(mode, values)?),
    }
}

fn split_action<'a>(
    args: &'a [&'a str],
    command: &str,
) -> Result<(&'a str, &'a [&'a str]), CommandError> {
    match args.split_first() {
        Some((action, rest)) => Ok((*action, rest)),
        None => Err(CommandError::InvalidArguments(format!(
            "usage: {command} <add|update|delete|list> ..."
        ))),
    }
}

fn expect_at_least(args: &[&str], count: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() < count {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    }
    Ok(())
}

/// Re-expresses an out-of-range index in the 1-based positions users type.
fn position_error(err: LedgerError) -> CommandError {
    match err {
        LedgerError::InvalidIndex { kind, index, len } => CommandError::InvalidArguments(format!(
            "no {kind} at position {} (there are {len})",
            index + 1
        )),
        other => other.into(),
    }
}

fn unknown_action(command: &str, action: &str) -> CommandError {
    CommandError::InvalidArguments(format!(
        "unknown action `{action}` for `{command}` (expected add, update, delete or list)"
    ))
}
