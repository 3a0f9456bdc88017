//! Dashboard CLI command
//!
//! Prints the monthly overview: budget alerts, total expenditure, and the
//! per-category totals and averages with their relative shares.

use chrono::{Datelike, Local};

use crate::config::Settings;
use crate::error::SpendlogResult;
use crate::models::money::format_amount;
use crate::models::UserIdentity;
use crate::services::{AlertGenerator, AlertLevel, ExpenseService, MonthlySummaryService};
use crate::storage::Storage;

use super::expense::check_month;

/// Handle the dashboard command
pub fn handle_dashboard_command(
    storage: &Storage,
    settings: &Settings,
    user: &UserIdentity,
    year: Option<i32>,
    month: Option<u32>,
) -> SpendlogResult<()> {
    let today = Local::now().date_naive();
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());
    check_month(month)?;

    let summary = MonthlySummaryService::new(&storage.expenses);
    let alerts = AlertGenerator::new(&storage.expenses, &settings.category_budgets);
    let expenses = ExpenseService::new(&storage.expenses, &settings.category_budgets);

    println!("Dashboard for {} — {}-{:02}", user.username, year, month);
    println!("{}", "=".repeat(56));

    for alert in alerts.generate(user, year, month)? {
        let marker = match alert.level {
            AlertLevel::Warning => "⚠",
            AlertLevel::Success => "✓",
        };
        println!("{} {}", marker, alert.message);
    }
    println!();

    let total = summary.total_expenditure(user, year, month)?;
    println!(
        "Total expenditure: {}",
        format_amount(total, &settings.currency_symbol)
    );

    let totals = summary.per_category_totals(user, year, month)?;
    if !totals.is_empty() {
        println!();
        println!("Totals per category");
        println!("{}", "-".repeat(56));
        for (category, figure) in &totals {
            println!(
                "  {:16} {:>12}  {:>4}%",
                category,
                format_amount(figure.value, &settings.currency_symbol),
                figure.percentage
            );
        }
    }

    let averages = summary.per_category_averages(user, year, month)?;
    if !averages.is_empty() {
        println!();
        println!("Averages per category (relative to the highest)");
        println!("{}", "-".repeat(56));
        for (category, figure) in &averages {
            println!(
                "  {:16} {:>12}  {:>4}%",
                category,
                format_amount(figure.value, &settings.currency_symbol),
                figure.percentage
            );
        }
    }

    let years = expenses.expenditure_years(user)?;
    if !years.is_empty() {
        println!();
        let formatted: Vec<String> = years.iter().map(|y| y.to_string()).collect();
        println!("Years with expenses: {}", formatted.join(", "));
    }

    Ok(())
}
