//! Expense CLI commands
//!
//! Add/list/edit/delete plus the CSV import entry point. All commands act on
//! behalf of the user resolved from the global `--user` flag.

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::Settings;
use crate::error::{SpendlogError, SpendlogResult};
use crate::models::money::format_amount;
use crate::models::{ExpenseId, UserIdentity};
use crate::services::{CsvImportService, DiskUpload, ExpenseService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount (e.g., "12.30")
        amount: f64,
        /// Description
        description: String,
        /// Category name
        #[arg(short, long)]
        category: String,
        /// Expense date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List expenses for a month
    List {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Edit an existing expense
    Edit {
        /// Expense ID
        id: i64,
        /// New amount
        #[arg(short, long)]
        amount: Option<f64>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },

    /// Import expenses from a CSV file (date,amount,description,category)
    Import {
        /// Path to CSV file
        file: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    user: &UserIdentity,
    cmd: ExpenseCommands,
) -> SpendlogResult<()> {
    let service = ExpenseService::new(&storage.expenses, &settings.category_budgets);
    let today = Local::now().date_naive();

    match cmd {
        ExpenseCommands::Add {
            amount,
            description,
            category,
            date,
        } => {
            let date = parse_date_arg(date.as_deref(), today)?;
            let expense = service.create(user, date, &category, amount, &description, today)?;

            println!(
                "Recorded expense #{}: {} on {} ({})",
                expense.id.map(|id| id.0).unwrap_or_default(),
                format_amount(expense.amount, &settings.currency_symbol),
                expense.date,
                expense.category
            );
        }

        ExpenseCommands::List { year, month, page } => {
            let year = year.unwrap_or_else(|| chrono::Datelike::year(&today));
            let month = month.unwrap_or_else(|| chrono::Datelike::month(&today));
            check_month(month)?;

            let total = service.count(user, year, month)?;
            let expenses = service.list(user, year, month, page, settings.page_size)?;

            if expenses.is_empty() {
                println!("No expenses for {}-{:02}.", year, month);
                return Ok(());
            }

            println!("Expenses for {}-{:02} (page {})", year, month, page);
            println!("{}", "-".repeat(64));
            println!(
                "{:>5}  {:10}  {:>12}  {:12}  {}",
                "ID", "Date", "Amount", "Category", "Description"
            );
            println!("{}", "-".repeat(64));
            for expense in &expenses {
                println!(
                    "{:>5}  {:10}  {:>12}  {:12}  {}",
                    expense.id.map(|id| id.0).unwrap_or_default(),
                    expense.date.to_string(),
                    format_amount(expense.amount, &settings.currency_symbol),
                    expense.category,
                    expense.description
                );
            }
            println!("{}", "-".repeat(64));
            println!("{} of {} expenses shown.", expenses.len(), total);
        }

        ExpenseCommands::Edit {
            id,
            amount,
            description,
            category,
            date,
        } => {
            let existing = service.find_owned(user, ExpenseId(id))?;

            let date = match date {
                Some(raw) => parse_date(&raw)?,
                None => existing.date,
            };
            let category = category.unwrap_or_else(|| existing.category.clone());
            let amount = amount.unwrap_or(existing.amount);
            let description = description.unwrap_or_else(|| existing.description.clone());

            let updated = service.update(&existing, date, &category, amount, &description, today)?;
            println!(
                "Updated expense #{}: {} on {} ({})",
                id,
                format_amount(updated.amount, &settings.currency_symbol),
                updated.date,
                updated.category
            );
        }

        ExpenseCommands::Delete { id } => {
            service.delete(user, ExpenseId(id))?;
            println!("Deleted expense #{}.", id);
        }

        ExpenseCommands::Import { file } => {
            let import_service =
                CsvImportService::new(&storage.expenses, &settings.category_budgets);
            let imported = import_service.import(user, &DiskUpload::new(&file))?;
            println!("Imported {} expense(s) from '{}'.", imported, file);
        }
    }

    Ok(())
}

fn parse_date(raw: &str) -> SpendlogResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        SpendlogError::Config(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
    })
}

fn parse_date_arg(raw: Option<&str>, today: NaiveDate) -> SpendlogResult<NaiveDate> {
    match raw {
        Some(raw) => parse_date(raw),
        None => Ok(today),
    }
}

pub(crate) fn check_month(month: u32) -> SpendlogResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(SpendlogError::Config(format!(
            "Invalid month {}, expected 1-12",
            month
        )))
    }
}
