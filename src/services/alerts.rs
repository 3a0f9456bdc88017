//! Budget alert generation
//!
//! Compares the month's per-category spending against the configured budget
//! ceilings and produces warning alerts for every exceeded category, or a
//! single success alert when everything is within budget.

use crate::config::CategoryBudgets;
use crate::error::SpendlogResult;
use crate::models::{Criteria, UserIdentity};
use crate::storage::ExpenseRepository;

/// Severity of a budget alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Warning,
    Success,
}

/// A single budget alert for display on the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

/// Service producing budget alerts for one user and month
pub struct AlertGenerator<'a> {
    repo: &'a dyn ExpenseRepository,
    budgets: &'a CategoryBudgets,
}

impl<'a> AlertGenerator<'a> {
    /// Create a new alert generator
    pub fn new(repo: &'a dyn ExpenseRepository, budgets: &'a CategoryBudgets) -> Self {
        Self { repo, budgets }
    }

    /// Generate the month's alerts
    ///
    /// Warnings follow the order categories appear in the budget
    /// configuration. Categories with spending but no configured budget, or
    /// a budget but no spending, produce no alert. Zero warnings yields
    /// exactly one success alert.
    pub fn generate(
        &self,
        user: &UserIdentity,
        year: i32,
        month: u32,
    ) -> SpendlogResult<Vec<Alert>> {
        let criteria = Criteria::month(user.id, year, month);
        let category_totals = self.repo.sum_amounts_by_category(&criteria)?;

        let mut alerts = Vec::new();
        for (category, budget) in self.budgets.iter() {
            let Some(&total) = category_totals.get(&category) else {
                continue;
            };

            if total > budget {
                alerts.push(Alert {
                    level: AlertLevel::Warning,
                    message: format!(
                        "{} budget exceeded by {:.2} €",
                        capitalize_first(&category),
                        total - budget
                    ),
                });
            }
        }

        if alerts.is_empty() {
            alerts.push(Alert {
                level: AlertLevel::Success,
                message: "Looking good! You're within budget for this month.".to_string(),
            });
        }

        Ok(alerts)
    }
}

/// Uppercase the first letter only, leaving the rest untouched
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
