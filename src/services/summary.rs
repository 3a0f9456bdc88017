//! Monthly summary service
//!
//! Computes the dashboard aggregates for one user and month: total
//! expenditure, per-category totals with percentage-of-total, and
//! per-category averages with percentage-of-max.
//!
//! Percentages round to the nearest integer, halves away from zero
//! (`f64::round`), matching common spreadsheet semantics. No caching: every
//! call re-queries the repository so the dashboard always reflects
//! just-saved expenses.

use std::collections::BTreeMap;

use crate::error::SpendlogResult;
use crate::models::{Criteria, UserIdentity};
use crate::storage::ExpenseRepository;

/// A per-category aggregate annotated with its relative share
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryFigure {
    /// The raw sum or average for the category
    pub value: f64,
    /// Rounded percentage (of the grand total, or of the largest average)
    pub percentage: u32,
}

/// Service computing monthly dashboard aggregates
pub struct MonthlySummaryService<'a> {
    repo: &'a dyn ExpenseRepository,
}

impl<'a> MonthlySummaryService<'a> {
    /// Create a new monthly summary service
    pub fn new(repo: &'a dyn ExpenseRepository) -> Self {
        Self { repo }
    }

    /// Total spent by the user in the given month; 0 when nothing matches
    pub fn total_expenditure(
        &self,
        user: &UserIdentity,
        year: i32,
        month: u32,
    ) -> SpendlogResult<f64> {
        let criteria = Criteria::month(user.id, year, month);
        self.repo.sum_amounts(&criteria)
    }

    /// Per-category sums, each annotated with its percentage of the grand total
    ///
    /// When the grand total is 0 every percentage is 0.
    pub fn per_category_totals(
        &self,
        user: &UserIdentity,
        year: i32,
        month: u32,
    ) -> SpendlogResult<BTreeMap<String, CategoryFigure>> {
        let criteria = Criteria::month(user.id, year, month);
        let totals = self.repo.sum_amounts_by_category(&criteria)?;
        let grand_total: f64 = totals.values().sum();

        Ok(totals
            .into_iter()
            .map(|(category, value)| {
                let percentage = share_percentage(value, grand_total);
                (category, CategoryFigure { value, percentage })
            })
            .collect())
    }

    /// Per-category averages, each annotated with its percentage of the
    /// largest average
    ///
    /// An empty averages map yields an empty result; a zero maximum yields
    /// percentage 0 everywhere.
    pub fn per_category_averages(
        &self,
        user: &UserIdentity,
        year: i32,
        month: u32,
    ) -> SpendlogResult<BTreeMap<String, CategoryFigure>> {
        let criteria = Criteria::month(user.id, year, month);
        let averages = self.repo.average_amounts_by_category(&criteria)?;

        if averages.is_empty() {
            return Ok(BTreeMap::new());
        }

        let max_average = averages.values().cloned().fold(f64::MIN, f64::max);

        Ok(averages
            .into_iter()
            .map(|(category, value)| {
                let percentage = share_percentage(value, max_average);
                (category, CategoryFigure { value, percentage })
            })
            .collect())
    }
}

/// Rounded percentage of `value` relative to `reference`; 0 when the
/// reference is not positive
fn share_percentage(value: f64, reference: f64) -> u32 {
    if reference > 0.0 {
        (value / reference * 100.0).round() as u32
    } else {
        0
    }
}
