//! Expense store backed by a JSON file
//!
//! Implements the `ExpenseRepository` contract over an in-memory map that is
//! persisted atomically on every mutation. Identifiers are sequential and
//! assigned on first save.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{SpendlogError, SpendlogResult};
use crate::models::{Criteria, Expense, ExpenseId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::ExpenseRepository;

/// Serializable expense data structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ExpenseData {
    next_id: i64,
    expenses: Vec<Expense>,
}

/// Repository for expense persistence
pub struct ExpenseStore {
    path: PathBuf,
    data: RwLock<HashMap<i64, Expense>>,
    next_id: RwLock<i64>,
}

impl ExpenseStore {
    /// Create a new expense store
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            next_id: RwLock::new(1),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> SpendlogResult<()> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self.write_data()?;
        let mut next_id = self.write_next_id()?;

        data.clear();
        let mut max_id = 0;
        for expense in file_data.expenses {
            if let Some(id) = expense.id {
                max_id = max_id.max(id.0);
                data.insert(id.0, expense);
            }
        }

        *next_id = file_data.next_id.max(max_id + 1).max(1);
        Ok(())
    }

    /// Persist the current state; callers hold the data lock
    fn persist(&self, data: &HashMap<i64, Expense>, next_id: i64) -> SpendlogResult<()> {
        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by_key(|e| e.id.map(|id| id.0).unwrap_or_default());

        write_json_atomic(&self.path, &ExpenseData { next_id, expenses })
    }

    fn write_data(&self) -> SpendlogResult<std::sync::RwLockWriteGuard<'_, HashMap<i64, Expense>>> {
        self.data
            .write()
            .map_err(|e| SpendlogError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn read_data(&self) -> SpendlogResult<std::sync::RwLockReadGuard<'_, HashMap<i64, Expense>>> {
        self.data
            .read()
            .map_err(|e| SpendlogError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_next_id(&self) -> SpendlogResult<std::sync::RwLockWriteGuard<'_, i64>> {
        self.next_id
            .write()
            .map_err(|e| SpendlogError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Matching expenses under the criteria, newest first
    fn matching(&self, criteria: &Criteria) -> SpendlogResult<Vec<Expense>> {
        let data = self.read_data()?;

        let mut matches: Vec<_> = data
            .values()
            .filter(|e| !e.is_deleted() && criteria.matches(e.user_id, e.date))
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then(b.id.map(|id| id.0).cmp(&a.id.map(|id| id.0)))
        });

        Ok(matches)
    }
}

impl ExpenseRepository for ExpenseStore {
    fn save(&self, expense: &mut Expense) -> SpendlogResult<()> {
        let mut data = self.write_data()?;
        let mut next_id = self.write_next_id()?;

        let (id, assigned) = match expense.id {
            Some(id) => (id, false),
            None => {
                let id = ExpenseId(*next_id);
                expense.id = Some(id);
                *next_id += 1;
                (id, true)
            }
        };

        let previous = data.insert(id.0, expense.clone());

        if let Err(e) = self.persist(&data, *next_id) {
            // Roll the in-memory state back so it matches the file
            match previous {
                Some(old) => {
                    data.insert(id.0, old);
                }
                None => {
                    data.remove(&id.0);
                }
            }
            if assigned {
                expense.id = None;
                *next_id -= 1;
            }
            return Err(e);
        }

        Ok(())
    }

    fn delete(&self, id: ExpenseId) -> SpendlogResult<()> {
        let mut data = self.write_data()?;
        let next_id = *self.write_next_id()?;

        let removed = data
            .remove(&id.0)
            .ok_or_else(|| SpendlogError::expense_not_found(id.to_string()))?;

        if let Err(e) = self.persist(&data, next_id) {
            data.insert(id.0, removed);
            return Err(e);
        }

        Ok(())
    }

    fn find(&self, id: ExpenseId) -> SpendlogResult<Option<Expense>> {
        let data = self.read_data()?;
        Ok(data.get(&id.0).cloned())
    }

    fn find_by(
        &self,
        criteria: &Criteria,
        offset: usize,
        limit: usize,
    ) -> SpendlogResult<Vec<Expense>> {
        let matches = self.matching(criteria)?;
        Ok(matches.into_iter().skip(offset).take(limit).collect())
    }

    fn count_by(&self, criteria: &Criteria) -> SpendlogResult<usize> {
        Ok(self.matching(criteria)?.len())
    }

    fn list_expenditure_years(&self, user_id: UserId) -> SpendlogResult<Vec<i32>> {
        let data = self.read_data()?;

        let mut years: Vec<i32> = data
            .values()
            .filter(|e| !e.is_deleted() && e.user_id == user_id)
            .map(|e| e.year())
            .collect();

        years.sort_unstable();
        years.dedup();
        years.reverse();
        Ok(years)
    }

    fn sum_amounts_by_category(
        &self,
        criteria: &Criteria,
    ) -> SpendlogResult<BTreeMap<String, f64>> {
        let mut sums = BTreeMap::new();
        for expense in self.matching(criteria)? {
            *sums.entry(expense.category.to_lowercase()).or_insert(0.0) += expense.amount;
        }
        Ok(sums)
    }

    fn average_amounts_by_category(
        &self,
        criteria: &Criteria,
    ) -> SpendlogResult<BTreeMap<String, f64>> {
        let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for expense in self.matching(criteria)? {
            let entry = sums.entry(expense.category.to_lowercase()).or_insert((0.0, 0));
            entry.0 += expense.amount;
            entry.1 += 1;
        }

        Ok(sums
            .into_iter()
            .map(|(category, (sum, count))| (category, sum / count as f64))
            .collect())
    }

    fn sum_amounts(&self, criteria: &Criteria) -> SpendlogResult<f64> {
        Ok(self.matching(criteria)?.iter().map(|e| e.amount).sum())
    }

    fn import_many(&self, expenses: Vec<Expense>) -> SpendlogResult<usize> {
        if expenses.is_empty() {
            return Ok(0);
        }

        let mut data = self.write_data()?;
        let mut next_id = self.write_next_id()?;
        let first_id = *next_id;

        let mut staged = Vec::with_capacity(expenses.len());
        for mut expense in expenses {
            let id = ExpenseId(*next_id);
            expense.id = Some(id);
            *next_id += 1;
            staged.push(id);
            data.insert(id.0, expense);
        }

        // All-or-nothing: one atomic write covers the whole batch
        if let Err(e) = self.persist(&data, *next_id) {
            for id in staged {
                data.remove(&id.0);
            }
            *next_id = first_id;
            return Err(e);
        }

        Ok(staged.len())
    }
}
