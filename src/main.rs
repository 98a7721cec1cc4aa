mod budget;
mod cli;
mod config;
mod domain;
mod report;
mod search;
mod store;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::Parser;
use rust_decimal::Decimal;
use std::io::{self, Write};
use uuid::Uuid;

use crate::cli::{
    BudgetCmd, Cli, Command, ExportArgs, GoalCmd, KindArg, LoginArgs, RegisterArgs, SearchCmd,
    SortKeyArg, TxCmd,
};
use crate::config::{AppConfig, AppPaths, load_or_init_config, now_utc, write_config};
use crate::domain::{SavingsGoal, Transaction, TxKind, User, goal_progress};
use crate::search::{DATE_FMT, SortDir, SortKey};
use crate::store::JsonStore;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = config::app_paths(cli.home.clone())?;
    let (mut cfg, cfg_path) = load_or_init_config(&paths)?;
    let store = JsonStore::open(&paths)?;
    let mut users = store.load()?;

    match cli.command {
        Command::Register(args) => handle_register(args, &store, &mut users),
        Command::Login(args) => handle_login(args, &users, &mut cfg, &cfg_path),
        Command::Logout => {
            cfg.current_user = None;
            write_config(&cfg_path, &cfg)?;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => {
            match current_user(&cfg, &users) {
                Some(user) => println!("Current user: {}", user.username),
                None => println!("No user logged in."),
            }
            Ok(())
        }
        Command::Tx(args) => handle_tx(args.cmd, &store, &cfg, &mut users),
        Command::Dashboard => {
            let Some(user) = require_user(&cfg, &users) else {
                return Ok(());
            };
            print_dashboard(user);
            Ok(())
        }
        Command::Monthly(args) => {
            let Some(user) = require_user(&cfg, &users) else {
                return Ok(());
            };
            print_monthly(user, &args.month)
        }
        Command::Categories => {
            let Some(user) = require_user(&cfg, &users) else {
                return Ok(());
            };
            print_categories(user);
            Ok(())
        }
        Command::Trends => {
            let Some(user) = require_user(&cfg, &users) else {
                return Ok(());
            };
            print_trends(user);
            Ok(())
        }
        Command::Chart => {
            let Some(user) = require_user(&cfg, &users) else {
                return Ok(());
            };
            print_chart(user);
            Ok(())
        }
        Command::Search(args) => {
            let Some(user) = require_user(&cfg, &users) else {
                return Ok(());
            };
            handle_search(args.cmd, user)
        }
        Command::Budget(args) => handle_budget(args.cmd, &store, &cfg, &mut users),
        Command::Goal(args) => handle_goal(args.cmd, &store, &cfg, &mut users),
        Command::Notifications => {
            let Some(user) = require_user(&cfg, &users) else {
                return Ok(());
            };
            let notes = budget::notifications(user);
            if notes.is_empty() {
                println!("No notifications right now.");
            } else {
                println!("=== NOTIFICATIONS ===");
                for n in notes {
                    println!("- {n}");
                }
            }
            Ok(())
        }
        Command::Export(args) => handle_export(args, &paths, &users),
    }
}

fn current_user<'a>(cfg: &AppConfig, users: &'a [User]) -> Option<&'a User> {
    let name = cfg.current_user.as_deref()?;
    users.iter().find(|u| u.username == name)
}

fn current_user_mut<'a>(cfg: &AppConfig, users: &'a mut [User]) -> Option<&'a mut User> {
    let name = cfg.current_user.as_deref()?;
    users.iter_mut().find(|u| u.username == name)
}

/// The session accessor fails closed: with no authenticated user every
/// report/search/budget/goal operation prints a message and does nothing.
fn require_user<'a>(cfg: &AppConfig, users: &'a [User]) -> Option<&'a User> {
    let user = current_user(cfg, users);
    if user.is_none() {
        println!("Please login first.");
    }
    user
}

fn require_user_mut<'a>(cfg: &AppConfig, users: &'a mut [User]) -> Option<&'a mut User> {
    if current_user(cfg, users).is_none() {
        println!("Please login first.");
        return None;
    }
    current_user_mut(cfg, users)
}

fn handle_register(args: RegisterArgs, store: &JsonStore, users: &mut Vec<User>) -> Result<()> {
    if users.iter().any(|u| u.username == args.username) {
        println!("Username already exists.");
        return Ok(());
    }
    if args.pin.len() != 4 || !args.pin.chars().all(|c| c.is_ascii_digit()) {
        println!("PIN must be 4 digits.");
        return Ok(());
    }

    users.push(User {
        username: args.username,
        pin: args.pin,
        transactions: Vec::new(),
        savings_goals: Vec::new(),
        monthly_budgets: Vec::new(),
    });
    store.save(users)?;
    println!("User registered successfully!");
    Ok(())
}

fn handle_login(
    args: LoginArgs,
    users: &[User],
    cfg: &mut AppConfig,
    cfg_path: &std::path::Path,
) -> Result<()> {
    // PINs are stored and compared in plaintext; hardening is out of scope.
    let found = users
        .iter()
        .any(|u| u.username == args.username && u.pin == args.pin);
    if !found {
        println!("Invalid credentials.");
        return Ok(());
    }

    cfg.current_user = Some(args.username.clone());
    write_config(cfg_path, cfg)?;
    println!("Welcome back, {}!", args.username);
    Ok(())
}

fn handle_tx(cmd: TxCmd, store: &JsonStore, cfg: &AppConfig, users: &mut Vec<User>) -> Result<()> {
    match cmd {
        TxCmd::Add {
            kind,
            amount,
            category,
            note,
            date,
        } => {
            let Some(user) = require_user_mut(cfg, users) else {
                return Ok(());
            };

            let amount = parse_decimal(&amount, "amount")?;
            let date = match date {
                Some(raw) => {
                    parse_date(&raw, "date")?;
                    raw
                }
                None => today(),
            };
            let kind = tx_kind(kind);

            user.transactions.push(Transaction {
                id: Uuid::new_v4(),
                kind,
                amount,
                category,
                note: note.unwrap_or_default(),
                date,
            });
            store.save(users)?;

            let label = match kind {
                TxKind::Income => "Income",
                TxKind::Expense => "Expense",
            };
            println!("{label} added successfully!");
            Ok(())
        }
        TxCmd::List => {
            let Some(user) = require_user(cfg, users) else {
                return Ok(());
            };
            if user.transactions.is_empty() {
                println!("No transactions found.");
                return Ok(());
            }
            println!("Transactions for {}:", user.username);
            let all: Vec<&Transaction> = user.transactions.iter().collect();
            println!("{}", search::render_results(&all));
            Ok(())
        }
        TxCmd::Edit {
            number,
            kind,
            amount,
            category,
            note,
            date,
        } => {
            let Some(user) = require_user_mut(cfg, users) else {
                return Ok(());
            };
            let index = checked_index(number, user.transactions.len(), "transaction")?;

            // Parse everything before touching the record: a malformed flag
            // must not leave a half-edited transaction behind.
            let amount = match amount {
                Some(raw) => Some(parse_decimal(&raw, "amount")?),
                None => None,
            };
            if let Some(raw) = date.as_deref() {
                parse_date(raw, "date")?;
            }

            let t = &mut user.transactions[index];
            if let Some(kind) = kind {
                t.kind = tx_kind(kind);
            }
            if let Some(amount) = amount {
                t.amount = amount;
            }
            if let Some(category) = category {
                t.category = category;
            }
            if let Some(note) = note {
                t.note = note;
            }
            if let Some(date) = date {
                t.date = date;
            }

            store.save(users)?;
            println!("Transaction updated successfully!");
            Ok(())
        }
        TxCmd::Delete { number, yes } => {
            let Some(user) = require_user_mut(cfg, users) else {
                return Ok(());
            };
            let index = checked_index(number, user.transactions.len(), "transaction")?;

            let t = &user.transactions[index];
            let confirmed =
                yes || prompt_yes_no(&format!("Delete '{}' ({})? [y/N] ", t.category, t.amount))?;
            if !confirmed {
                println!("Deletion cancelled.");
                return Ok(());
            }

            user.transactions.remove(index);
            store.save(users)?;
            println!("Transaction deleted successfully.");
            Ok(())
        }
    }
}

fn print_dashboard(user: &User) {
    let Some(summary) = report::dashboard_summary(&user.transactions) else {
        println!("No transactions found.");
        return;
    };

    println!("=== DASHBOARD SUMMARY ===");
    println!("Total Income:  {:.2}", summary.income);
    println!("Total Expense: {:.2}", summary.expense);
    println!("Net Balance:   {:.2}", summary.balance());
    println!("=========================");
}

fn print_monthly(user: &User, month: &str) -> Result<()> {
    parse_month(month)?;

    let Some(summary) = report::monthly_summary(&user.transactions, month) else {
        println!("No transactions for this month.");
        return Ok(());
    };

    println!("=== MONTHLY REPORT ({month}) ===");
    println!("Total Income:  {:.2}", summary.income);
    println!("Total Expense: {:.2}", summary.expense);
    println!("Net Balance:   {:.2}", summary.balance());
    println!("================================");
    Ok(())
}

fn print_categories(user: &User) {
    if user.transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!("=== CATEGORY BREAKDOWN ===");
    for (category, totals) in report::category_breakdown(&user.transactions) {
        println!(
            "{category}: Income = {:.2}, Expense = {:.2}",
            totals.income, totals.expense
        );
    }
    println!("==========================");
}

fn print_trends(user: &User) {
    if user.transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!("=== SPENDING TRENDS (by month) ===");
    for (month, total) in report::spending_trends(&user.transactions) {
        println!("{month}: {total:.2}");
    }
    println!("==================================");
}

fn print_chart(user: &User) {
    let Some(summary) = report::dashboard_summary(&user.transactions) else {
        println!("No transactions found.");
        return;
    };

    let scale = report::bar_scale(&[summary.income, summary.expense]);
    println!("=== INCOME VS EXPENSE ===");
    println!(
        "Income : {} ({:.2})",
        report::padded_bar(summary.income, scale, 40, '#'),
        summary.income
    );
    println!(
        "Expense: {} ({:.2})",
        report::padded_bar(summary.expense, scale, 40, '#'),
        summary.expense
    );

    let trend = report::spending_trends(&user.transactions);
    if trend.is_empty() {
        println!("No expense transactions to show monthly trend.");
        return;
    }

    let values: Vec<Decimal> = trend.iter().map(|(_, v)| *v).collect();
    let scale = report::bar_scale(&values);
    println!();
    println!("=== MONTHLY EXPENSE TREND ===");
    for (month, total) in trend {
        println!(
            "{month}: {} ({total:.2})",
            report::plain_bar(total, scale, 30, '*')
        );
    }
}

fn handle_search(cmd: SearchCmd, user: &User) -> Result<()> {
    match cmd {
        SearchCmd::Date { start, end } => {
            let start = parse_date(&start, "start date")?;
            let end = parse_date(&end, "end date")?;

            let found = search::filter_by_date_range(&user.transactions, start, end);
            if found.skipped > 0 {
                eprintln!(
                    "Skipped {} transaction(s) with unparsable dates.",
                    found.skipped
                );
            }
            println!("{}", search::render_results(&found.matches));
            Ok(())
        }
        SearchCmd::Category { category } => {
            let found = search::filter_by_category(&user.transactions, &category);
            println!("{}", search::render_results(&found));
            Ok(())
        }
        SearchCmd::Amount { min, max } => {
            let min = parse_decimal(&min, "minimum amount")?;
            let max = parse_decimal(&max, "maximum amount")?;
            let found = search::filter_by_amount(&user.transactions, min, max);
            println!("{}", search::render_results(&found));
            Ok(())
        }
        SearchCmd::Sort { key, desc } => {
            let key = match key {
                SortKeyArg::Date => SortKey::Date,
                SortKeyArg::Amount => SortKey::Amount,
            };
            let dir = if desc { SortDir::Desc } else { SortDir::Asc };
            let sorted = search::sort_transactions(&user.transactions, key, dir);
            println!("{}", search::render_results(&sorted));
            Ok(())
        }
    }
}

fn handle_budget(
    cmd: BudgetCmd,
    store: &JsonStore,
    cfg: &AppConfig,
    users: &mut Vec<User>,
) -> Result<()> {
    match cmd {
        BudgetCmd::Set { month, amount } => {
            let Some(user) = require_user_mut(cfg, users) else {
                return Ok(());
            };

            parse_month(&month)?;
            let amount = parse_decimal(&amount, "amount")?;
            if amount <= Decimal::ZERO {
                return Err(anyhow!("Budget amount must be > 0"));
            }

            // Upsert: one budget per month, setting again overwrites.
            let existing = user.monthly_budgets.iter_mut().find(|b| b.month == month);
            let updated = existing.is_some();
            match existing {
                Some(b) => b.amount = amount,
                None => user
                    .monthly_budgets
                    .push(domain::MonthlyBudget { month: month.clone(), amount }),
            }
            store.save(users)?;

            if updated {
                println!("Budget for {month} updated to {amount:.2}.");
            } else {
                println!("Budget for {month} set to {amount:.2} successfully!");
            }
            Ok(())
        }
        BudgetCmd::Status { month } => {
            let Some(user) = require_user(cfg, users) else {
                return Ok(());
            };

            parse_month(&month)?;
            let Some(entry) = user.monthly_budgets.iter().find(|b| b.month == month) else {
                println!("No budget set for this month.");
                return Ok(());
            };

            let status = budget::budget_status(entry.amount, &user.transactions, &month);
            println!("=== MONTHLY BUDGET ({month}) ===");
            println!("Budget: {:.2}", status.budget);
            println!("Spent: {:.2}", status.spent);
            println!("Remaining: {:.2}", status.remaining);
            println!("Percent used: {:.2}%", status.pct_used);
            Ok(())
        }
    }
}

fn handle_goal(
    cmd: GoalCmd,
    store: &JsonStore,
    cfg: &AppConfig,
    users: &mut Vec<User>,
) -> Result<()> {
    match cmd {
        GoalCmd::Add {
            name,
            target,
            deadline,
        } => {
            let Some(user) = require_user_mut(cfg, users) else {
                return Ok(());
            };

            if name.trim().is_empty() {
                return Err(anyhow!("Goal name cannot be empty"));
            }
            let target = parse_decimal(&target, "target")?;
            if target <= Decimal::ZERO {
                return Err(anyhow!("Goal target must be > 0"));
            }
            if let Some(d) = deadline.as_deref() {
                parse_date(d, "deadline")?;
            }

            user.savings_goals.push(SavingsGoal {
                id: Uuid::new_v4(),
                name: name.clone(),
                target_amount: target,
                saved_amount: Decimal::ZERO,
                deadline: deadline.unwrap_or_default(),
                created_at: now_utc().to_rfc3339(),
            });
            store.save(users)?;
            println!("Goal '{name}' added (target {target:.2}).");
            Ok(())
        }
        GoalCmd::List => {
            let Some(user) = require_user(cfg, users) else {
                return Ok(());
            };
            if user.savings_goals.is_empty() {
                println!("No savings goals found.");
                return Ok(());
            }

            println!("=== SAVINGS GOALS ===");
            for (i, g) in user.savings_goals.iter().enumerate() {
                let progress = goal_progress(g);
                let status = if progress.reached {
                    "Reached"
                } else {
                    "In progress"
                };
                let deadline = if g.deadline.is_empty() {
                    String::new()
                } else {
                    format!(" | deadline: {}", g.deadline)
                };
                println!(
                    "{}. {} -- saved: {:.2} / {:.2} ({:.1}%) {status}{deadline}",
                    i + 1,
                    g.name,
                    g.saved_amount,
                    g.target_amount,
                    progress.pct
                );
            }
            println!("=====================");
            Ok(())
        }
        GoalCmd::Allocate { number, amount } => {
            let Some(user) = require_user_mut(cfg, users) else {
                return Ok(());
            };
            let index = checked_index(number, user.savings_goals.len(), "goal")?;

            let amount = parse_decimal(&amount, "amount")?;
            if amount <= Decimal::ZERO {
                return Err(anyhow!("Allocation amount must be > 0"));
            }

            let goal_id = user.savings_goals[index].id;
            let goal_name = user.savings_goals[index].name.clone();

            // Dual write, one save: the Savings expense and the bumped
            // saved_amount land together or not at all.
            user.transactions.push(Transaction {
                id: Uuid::new_v4(),
                kind: TxKind::Expense,
                amount,
                category: "Savings".to_string(),
                note: format!("Allocated to goal {goal_id} - {goal_name}"),
                date: today(),
            });
            user.savings_goals[index].saved_amount += amount;
            store.save(users)?;

            println!("Allocated {amount:.2} to goal '{goal_name}'. Transaction recorded.");
            Ok(())
        }
        GoalCmd::Edit {
            number,
            name,
            target,
            deadline,
        } => {
            let Some(user) = require_user_mut(cfg, users) else {
                return Ok(());
            };
            let index = checked_index(number, user.savings_goals.len(), "goal")?;

            let target = match target {
                Some(raw) => {
                    let t = parse_decimal(&raw, "target")?;
                    if t <= Decimal::ZERO {
                        return Err(anyhow!("Goal target must be > 0"));
                    }
                    Some(t)
                }
                None => None,
            };
            if let Some(d) = deadline.as_deref() {
                parse_date(d, "deadline")?;
            }

            let g = &mut user.savings_goals[index];
            if let Some(name) = name {
                g.name = name;
            }
            if let Some(target) = target {
                g.target_amount = target;
            }
            if let Some(deadline) = deadline {
                g.deadline = deadline;
            }

            store.save(users)?;
            println!("Goal updated.");
            Ok(())
        }
        GoalCmd::Delete { number, yes } => {
            let Some(user) = require_user_mut(cfg, users) else {
                return Ok(());
            };
            let index = checked_index(number, user.savings_goals.len(), "goal")?;

            let name = user.savings_goals[index].name.clone();
            let confirmed = yes || prompt_yes_no(&format!("Delete goal '{name}'? [y/N] "))?;
            if !confirmed {
                println!("Deletion cancelled.");
                return Ok(());
            }

            user.savings_goals.remove(index);
            store.save(users)?;
            println!("Deleted goal '{name}'.");
            Ok(())
        }
    }
}

fn handle_export(args: ExportArgs, paths: &AppPaths, users: &[User]) -> Result<()> {
    let path = args
        .out
        .unwrap_or_else(|| paths.data_dir.join("export").join("transactions_export.csv"));
    let rows = store::export_csv(users, &path)?;
    println!("Exported {rows} transaction(s) to {}", path.display());
    Ok(())
}

fn tx_kind(arg: KindArg) -> TxKind {
    match arg {
        KindArg::Income => TxKind::Income,
        KindArg::Expense => TxKind::Expense,
    }
}

fn parse_decimal(raw: &str, field: &'static str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal for {field}: {raw}"))
}

fn parse_date(raw: &str, field: &'static str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FMT)
        .with_context(|| format!("Invalid {field}. Expected YYYY-MM-DD, got: {raw}"))
}

fn parse_month(raw: &str) -> Result<()> {
    let Some((y, m)) = raw.split_once('-') else {
        return Err(anyhow!("Invalid month format. Expected YYYY-MM, got: {raw}"));
    };
    if y.len() != 4 || m.len() != 2 || y.parse::<u32>().is_err() {
        return Err(anyhow!("Invalid month format. Expected YYYY-MM, got: {raw}"));
    }
    let month: u32 = m
        .parse()
        .with_context(|| format!("Invalid month format. Expected YYYY-MM, got: {raw}"))?;
    if !(1..=12).contains(&month) {
        return Err(anyhow!("Invalid month value: {raw}"));
    }
    Ok(())
}

fn today() -> String {
    now_utc().date_naive().to_string()
}

/// 1-based list position, as shown by the numbered listings.
fn checked_index(number: usize, len: usize, what: &'static str) -> Result<usize> {
    if number == 0 || number > len {
        return Err(anyhow!("No such {what}: {number}"));
    }
    Ok(number - 1)
}

fn prompt_yes_no(prompt: &str) -> Result<bool> {
    eprint!("{prompt}");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
