//! Expense service
//!
//! Provides the create/update/delete/listing logic on top of the expense
//! repository, including the field-level validation rules for expense data
//! and the ownership check applied before edits and deletes.

use chrono::NaiveDate;

use crate::config::CategoryBudgets;
use crate::error::{SpendlogError, SpendlogResult, ValidationErrors};
use crate::models::{Criteria, Expense, ExpenseId, UserIdentity};
use crate::storage::ExpenseRepository;

/// Service for expense management
pub struct ExpenseService<'a> {
    repo: &'a dyn ExpenseRepository,
    budgets: &'a CategoryBudgets,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(repo: &'a dyn ExpenseRepository, budgets: &'a CategoryBudgets) -> Self {
        Self { repo, budgets }
    }

    /// One page of the user's expenses for a month, newest first
    ///
    /// Pages are 1-based; the offset is `(page - 1) * page_size`.
    pub fn list(
        &self,
        user: &UserIdentity,
        year: i32,
        month: u32,
        page: usize,
        page_size: usize,
    ) -> SpendlogResult<Vec<Expense>> {
        let offset = page.saturating_sub(1) * page_size;
        let criteria = Criteria::month(user.id, year, month);
        self.repo.find_by(&criteria, offset, page_size)
    }

    /// Number of the user's expenses in a month
    pub fn count(&self, user: &UserIdentity, year: i32, month: u32) -> SpendlogResult<usize> {
        let criteria = Criteria::month(user.id, year, month);
        self.repo.count_by(&criteria)
    }

    /// Validate and persist a new expense
    ///
    /// `today` bounds the date check; field failures are collected and
    /// returned together as a `Validation` error.
    pub fn create(
        &self,
        user: &UserIdentity,
        date: NaiveDate,
        category: &str,
        amount: f64,
        description: &str,
        today: NaiveDate,
    ) -> SpendlogResult<Expense> {
        self.validate(date, category, amount, description, today)?;

        let mut expense = Expense::new(user.id, date, category, amount, description);
        self.repo.save(&mut expense)?;
        Ok(expense)
    }

    /// Validate and persist a full replacement of an existing expense
    ///
    /// Replaces date/category/amount/description; the identifier, owner and
    /// soft-delete marker are preserved.
    pub fn update(
        &self,
        existing: &Expense,
        date: NaiveDate,
        category: &str,
        amount: f64,
        description: &str,
        today: NaiveDate,
    ) -> SpendlogResult<Expense> {
        self.validate(date, category, amount, description, today)?;

        let mut updated = Expense::new(existing.user_id, date, category, amount, description);
        updated.id = existing.id;
        updated.deleted_at = existing.deleted_at;

        self.repo.save(&mut updated)?;
        Ok(updated)
    }

    /// Look up an expense by identifier
    pub fn find(&self, id: ExpenseId) -> SpendlogResult<Option<Expense>> {
        self.repo.find(id)
    }

    /// Look up an expense and verify it belongs to the given user
    ///
    /// Missing records yield `NotFound`; records owned by another user yield
    /// `Forbidden`.
    pub fn find_owned(&self, user: &UserIdentity, id: ExpenseId) -> SpendlogResult<Expense> {
        let expense = self
            .repo
            .find(id)?
            .ok_or_else(|| SpendlogError::expense_not_found(id.to_string()))?;

        if expense.user_id != user.id {
            return Err(SpendlogError::expense_forbidden(id.to_string()));
        }

        Ok(expense)
    }

    /// Delete one of the user's expenses
    pub fn delete(&self, user: &UserIdentity, id: ExpenseId) -> SpendlogResult<()> {
        self.find_owned(user, id)?;
        self.repo.delete(id)
    }

    /// Distinct years the user has recorded expenses in, newest first
    pub fn expenditure_years(&self, user: &UserIdentity) -> SpendlogResult<Vec<i32>> {
        self.repo.list_expenditure_years(user.id)
    }

    /// Field validation shared by create and update
    fn validate(
        &self,
        date: NaiveDate,
        category: &str,
        amount: f64,
        description: &str,
        today: NaiveDate,
    ) -> SpendlogResult<()> {
        let mut errors = ValidationErrors::new();

        if date > today {
            errors.add("date", "Date cannot be in the future");
        }

        let normalized = category.trim().to_lowercase();
        if !self.budgets.is_valid_category(&normalized) {
            errors.add("category", "Invalid category selected");
        }

        if amount <= 0.0 {
            errors.add("amount", "Amount must be greater than 0");
        }

        if description.trim().is_empty() {
            errors.add("description", "Description cannot be empty");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SpendlogError::Validation(errors))
        }
    }
}
