//! Storage layer for spendlog
//!
//! Defines the `ExpenseRepository` capability contract consumed by the
//! service layer, plus JSON-file implementations with atomic writes. The
//! trait is the only seam services depend on, so the backing store can be
//! swapped or mocked in tests.

pub mod expenses;
pub mod file_io;
pub mod users;

pub use expenses::ExpenseStore;
pub use users::UserStore;

use std::collections::BTreeMap;

use crate::config::paths::SpendlogPaths;
use crate::error::{SpendlogError, SpendlogResult};
use crate::models::{Criteria, Expense, ExpenseId, UserId};

/// Durable store of expense records
///
/// Aggregation keys returned by the grouping operations are lowercase
/// category names. All criteria-driven operations exclude soft-deleted rows.
pub trait ExpenseRepository {
    /// Persist an expense, assigning an identifier on first save
    fn save(&self, expense: &mut Expense) -> SpendlogResult<()>;

    /// Remove an expense from all future queries
    fn delete(&self, id: ExpenseId) -> SpendlogResult<()>;

    /// Look up a single expense by identifier
    fn find(&self, id: ExpenseId) -> SpendlogResult<Option<Expense>>;

    /// Matching expenses, newest first, with offset/limit pagination
    fn find_by(
        &self,
        criteria: &Criteria,
        offset: usize,
        limit: usize,
    ) -> SpendlogResult<Vec<Expense>>;

    /// Number of expenses matching the criteria
    fn count_by(&self, criteria: &Criteria) -> SpendlogResult<usize>;

    /// Distinct years the user has recorded expenses in, descending
    fn list_expenditure_years(&self, user_id: UserId) -> SpendlogResult<Vec<i32>>;

    /// Sum of amounts per lowercase category
    fn sum_amounts_by_category(&self, criteria: &Criteria)
        -> SpendlogResult<BTreeMap<String, f64>>;

    /// Arithmetic mean of amounts per lowercase category
    fn average_amounts_by_category(
        &self,
        criteria: &Criteria,
    ) -> SpendlogResult<BTreeMap<String, f64>>;

    /// Sum of all matching amounts; 0 when nothing matches
    fn sum_amounts(&self, criteria: &Criteria) -> SpendlogResult<f64>;

    /// Persist a batch of expenses all-or-nothing, returning the count saved
    fn import_many(&self, expenses: Vec<Expense>) -> SpendlogResult<usize>;
}

/// Main storage coordinator that provides access to all stores
pub struct Storage {
    paths: SpendlogPaths,
    pub expenses: ExpenseStore,
    pub users: UserStore,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: SpendlogPaths) -> Result<Self, SpendlogError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseStore::new(paths.expenses_file()),
            users: UserStore::new(paths.users_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &SpendlogPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), SpendlogError> {
        self.expenses.load()?;
        self.users.load()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendlogPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        storage.load_all().unwrap();
    }
}
