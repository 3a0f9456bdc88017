//! CSV import pipeline
//!
//! Single-pass import of expenses from a delimited text file: each row is
//! validated, duplicate rows are suppressed by a fingerprint of their raw
//! field content, and the surviving rows are persisted in one atomic batch.
//! A mix of valid and invalid rows is a success with a partial count; zero
//! valid rows aborts the import with a summary of the distinct skip reasons.
//! Skipped rows are reported through the log, not returned to the caller.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::config::CategoryBudgets;
use crate::error::{SpendlogError, SpendlogResult};
use crate::models::{Expense, UserIdentity};
use crate::storage::ExpenseRepository;

/// An uploaded file as handed over by the transport boundary
///
/// Only uploads with no error status are accepted; `persist_to` materializes
/// the content at a caller-chosen filesystem path.
pub trait UploadedFile {
    /// Transport-level error, if the upload failed
    fn error(&self) -> Option<String>;

    /// Copy the uploaded content to the given path
    fn persist_to(&self, dest: &Path) -> SpendlogResult<()>;
}

/// An upload that is already a file on the local filesystem
#[derive(Debug, Clone)]
pub struct DiskUpload {
    path: PathBuf,
}

impl DiskUpload {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UploadedFile for DiskUpload {
    fn error(&self) -> Option<String> {
        if self.path.is_file() {
            None
        } else {
            Some(format!("No such file: {}", self.path.display()))
        }
    }

    fn persist_to(&self, dest: &Path) -> SpendlogResult<()> {
        fs::copy(&self.path, dest)
            .map(|_| ())
            .map_err(|e| SpendlogError::Io(format!("Failed to copy upload: {}", e)))
    }
}

/// Why an import row was not persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InvalidColumnCount,
    EmptyDescription,
    UnknownCategory,
    InvalidDateFormat,
    InvalidAmountFormat,
    NonPositiveAmount,
    DuplicateEntry,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InvalidColumnCount => "Invalid column count",
            Self::EmptyDescription => "Empty description",
            Self::UnknownCategory => "Unknown category",
            Self::InvalidDateFormat => "Invalid date format",
            Self::InvalidAmountFormat => "Invalid amount format",
            Self::NonPositiveAmount => "Amount must be greater than 0",
            Self::DuplicateEntry => "Duplicate entry",
        };
        write!(f, "{}", text)
    }
}

/// A rejected row together with its reason, kept for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub fields: Vec<String>,
    pub reason: SkipReason,
}

/// The validated content of one row before conversion to an expense
struct ParsedRow {
    date: NaiveDate,
    amount: f64,
    description: String,
    category: String,
}

/// Service for importing expenses from CSV uploads
pub struct CsvImportService<'a> {
    repo: &'a dyn ExpenseRepository,
    budgets: &'a CategoryBudgets,
}

impl<'a> CsvImportService<'a> {
    /// Create a new import service
    pub fn new(repo: &'a dyn ExpenseRepository, budgets: &'a CategoryBudgets) -> Self {
        Self { repo, budgets }
    }

    /// Import an uploaded CSV file for the given user
    ///
    /// The upload is materialized into a temporary file which is removed on
    /// every exit path. Returns the number of rows imported.
    pub fn import(&self, user: &UserIdentity, upload: &dyn UploadedFile) -> SpendlogResult<usize> {
        if let Some(error) = upload.error() {
            return Err(SpendlogError::Upload(error));
        }

        // Dropped on every return path, deleting the temp file
        let temp_file = NamedTempFile::new()
            .map_err(|e| SpendlogError::Io(format!("Failed to create temp file: {}", e)))?;
        upload.persist_to(temp_file.path())?;

        self.import_from_path(user, temp_file.path())
    }

    /// Run the import pipeline over a CSV file on disk
    pub fn import_from_path(&self, user: &UserIdentity, path: &Path) -> SpendlogResult<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| SpendlogError::Import(format!("Failed to open CSV file: {}", e)))?;

        let mut accepted: Vec<Expense> = Vec::new();
        let mut skipped: Vec<SkippedRow> = Vec::new();
        let mut seen: HashSet<u64> = HashSet::new();

        for record in reader.records() {
            let record = record
                .map_err(|e| SpendlogError::Import(format!("Failed to read CSV row: {}", e)))?;
            let fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();

            let parsed = match self.validate_row(&fields) {
                Ok(parsed) => parsed,
                Err(reason) => {
                    skipped.push(SkippedRow { fields, reason });
                    continue;
                }
            };

            // Fingerprint is keyed on the raw pre-normalization fields
            if !seen.insert(fingerprint(&fields)) {
                skipped.push(SkippedRow {
                    fields,
                    reason: SkipReason::DuplicateEntry,
                });
                continue;
            }

            accepted.push(Expense::new(
                user.id,
                parsed.date,
                &parsed.category,
                parsed.amount,
                &parsed.description,
            ));
        }

        for row in &skipped {
            log::warn!(
                "Skipped CSV row during import: \"{}\" (reason: {})",
                row.fields.join(","),
                row.reason
            );
        }

        if accepted.is_empty() {
            return Err(SpendlogError::Import(format!(
                "No rows were imported. Reasons: {}",
                distinct_reasons(&skipped).join(", ")
            )));
        }

        let imported = self.repo.import_many(accepted)?;
        log::info!(
            "CSV import completed: imported {}, skipped {}",
            imported,
            skipped.len()
        );

        Ok(imported)
    }

    /// Structural and field validation for one row
    ///
    /// Rows carry exactly four fields: date, amount, description, category.
    fn validate_row(&self, fields: &[String]) -> Result<ParsedRow, SkipReason> {
        if fields.len() != 4 {
            return Err(SkipReason::InvalidColumnCount);
        }

        let (date_str, amount_str, description, category) =
            (&fields[0], &fields[1], &fields[2], &fields[3]);

        let description = description.trim();
        if description.is_empty() {
            return Err(SkipReason::EmptyDescription);
        }

        let category = category.trim().to_lowercase();
        if !self.budgets.is_valid_category(&category) {
            return Err(SkipReason::UnknownCategory);
        }

        let date = parse_date(date_str.trim()).ok_or(SkipReason::InvalidDateFormat)?;

        let amount = parse_amount(amount_str).ok_or(SkipReason::InvalidAmountFormat)?;
        if amount <= 0.0 {
            return Err(SkipReason::NonPositiveAmount);
        }

        Ok(ParsedRow {
            date,
            amount,
            description: description.to_string(),
            category,
        })
    }
}

/// Parse a date trying the common formats
fn parse_date(s: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 7] = [
        "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%m/%d/%y", "%d/%m/%y",
    ];

    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

/// Parse an amount string after stripping quotes and thousand separators
///
/// The cleaned string must be numeric and contain a decimal point; an
/// integer-looking amount is rejected so that "1234" is not mistaken for
/// "12.34".
fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != '"' && *c != ',').collect();
    let cleaned = cleaned.trim();

    if !cleaned.contains('.') {
        return None;
    }

    cleaned.parse::<f64>().ok()
}

/// Content fingerprint of the raw row fields
fn fingerprint(fields: &[String]) -> u64 {
    use std::hash::{Hash, Hasher};

    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    fields.concat().hash(&mut hasher);
    hasher.finish()
}

/// Distinct skip reasons in first-seen order
fn distinct_reasons(skipped: &[SkippedRow]) -> Vec<String> {
    let mut reasons: Vec<String> = Vec::new();
    for row in skipped {
        let reason = row.reason.to_string();
        if !reasons.contains(&reason) {
            reasons.push(reason);
        }
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Criteria, UserId};
    use crate::storage::ExpenseStore;
    use tempfile::TempDir;

    fn setup(temp_dir: &TempDir) -> (ExpenseStore, CategoryBudgets) {
        let store = ExpenseStore::new(temp_dir.path().join("data").join("expenses.json"));
        store.load().unwrap();
        let budgets = CategoryBudgets::from_pairs([("Groceries", 300.0), ("Leisure", 50.0)]);
        (store, budgets)
    }

    fn user() -> UserIdentity {
        UserIdentity::new(UserId(1), "alice")
    }

    fn write_csv(temp_dir: &TempDir, content: &str) -> PathBuf {
        let path = temp_dir.path().join("upload.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_import_valid_row() {
        let temp_dir = TempDir::new().unwrap();
        let (store, budgets) = setup(&temp_dir);
        let service = CsvImportService::new(&store, &budgets);

        let path = write_csv(&temp_dir, "2025-01-02,12.30,Milk,groceries\n");
        let count = service.import(&user(), &DiskUpload::new(path)).unwrap();
        assert_eq!(count, 1);

        let criteria = Criteria::month(UserId(1), 2025, 1);
        let imported = store.find_by(&criteria, 0, 10).unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].amount, 12.3);
        assert_eq!(imported[0].amount_cents, 1230);
        assert_eq!(imported[0].category, "groceries");
        assert_eq!(imported[0].description, "Milk");
    }

    #[test]
    fn test_integer_amount_rejected_as_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let (store, budgets) = setup(&temp_dir);
        let service = CsvImportService::new(&store, &budgets);

        let path = write_csv(&temp_dir, "2025-01-02,1230,Milk,groceries\n");
        let err = service
            .import(&user(), &DiskUpload::new(path))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Import error: No rows were imported. Reasons: Invalid amount format"
        );
    }

    #[test]
    fn test_quoted_amount_with_thousand_separator() {
        let temp_dir = TempDir::new().unwrap();
        let (store, budgets) = setup(&temp_dir);
        let service = CsvImportService::new(&store, &budgets);

        let path = write_csv(&temp_dir, "2025-01-02,\"1,234.56\",Bulk order,groceries\n");
        let count = service.import(&user(), &DiskUpload::new(path)).unwrap();
        assert_eq!(count, 1);

        let criteria = Criteria::month(UserId(1), 2025, 1);
        let imported = store.find_by(&criteria, 0, 10).unwrap();
        assert_eq!(imported[0].amount, 1234.56);
        assert_eq!(imported[0].amount_cents, 123456);
    }

    #[test]
    fn test_duplicate_rows_import_once() {
        let temp_dir = TempDir::new().unwrap();
        let (store, budgets) = setup(&temp_dir);
        let service = CsvImportService::new(&store, &budgets);

        let path = write_csv(
            &temp_dir,
            "2025-01-02,12.30,Milk,groceries\n2025-01-02,12.30,Milk,groceries\n",
        );
        let count = service.import(&user(), &DiskUpload::new(path)).unwrap();
        assert_eq!(count, 1);

        let criteria = Criteria::month(UserId(1), 2025, 1);
        assert_eq!(store.count_by(&criteria).unwrap(), 1);
    }

    #[test]
    fn test_partial_success_commits_only_valid_rows() {
        let temp_dir = TempDir::new().unwrap();
        let (store, budgets) = setup(&temp_dir);
        let service = CsvImportService::new(&store, &budgets);

        let path = write_csv(
            &temp_dir,
            concat!(
                "2025-01-02,12.30,Milk,groceries\n",
                "2025-01-03,5.00,Cinema,leisure\n",
                "2025-01-04,7.50,Bread,groceries\n",
                "2025-01-05,3.00,,groceries\n",       // empty description
                "2025-01-06,4.00,Socks,clothing\n",   // unknown category
            ),
        );
        let count = service.import(&user(), &DiskUpload::new(path)).unwrap();
        assert_eq!(count, 3);

        let criteria = Criteria::month(UserId(1), 2025, 1);
        assert_eq!(store.count_by(&criteria).unwrap(), 3);
    }

    #[test]
    fn test_zero_valid_rows_lists_distinct_reasons() {
        let temp_dir = TempDir::new().unwrap();
        let (store, budgets) = setup(&temp_dir);
        let service = CsvImportService::new(&store, &budgets);

        let path = write_csv(
            &temp_dir,
            concat!(
                "2025-01-02,12.30,Milk\n",                 // 3 columns
                "not-a-date,5.00,Cinema,leisure\n",        // bad date
                "2025-01-06,4.00,Socks,clothing\n",        // unknown category
                "2025-01-07,banana,Apples,groceries\n",    // bad amount
                "2025-01-08,9.99,Apples,clothing\n",       // unknown category again
            ),
        );
        let err = service
            .import(&user(), &DiskUpload::new(path))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Import error: No rows were imported. Reasons: Invalid column count, \
             Invalid date format, Unknown category, Invalid amount format"
        );

        let criteria = Criteria::month(UserId(1), 2025, 1);
        assert_eq!(store.count_by(&criteria).unwrap(), 0);
    }

    #[test]
    fn test_negative_amount_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let (store, budgets) = setup(&temp_dir);
        let service = CsvImportService::new(&store, &budgets);

        let path = write_csv(&temp_dir, "2025-01-02,-12.30,Refund,groceries\n");
        let err = service
            .import(&user(), &DiskUpload::new(path))
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("Amount must be greater than 0"));
    }

    #[test]
    fn test_upload_with_error_status_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let (store, budgets) = setup(&temp_dir);
        let service = CsvImportService::new(&store, &budgets);

        let missing = DiskUpload::new(temp_dir.path().join("missing.csv"));
        let err = service.import(&user(), &missing).unwrap_err();
        assert!(matches!(err, SpendlogError::Upload(_)));
    }

    #[test]
    fn test_alternate_date_formats_accepted() {
        let temp_dir = TempDir::new().unwrap();
        let (store, budgets) = setup(&temp_dir);
        let service = CsvImportService::new(&store, &budgets);

        let path = write_csv(&temp_dir, "01/15/2025,8.40,Snacks,groceries\n");
        let count = service.import(&user(), &DiskUpload::new(path)).unwrap();
        assert_eq!(count, 1);

        let criteria = Criteria::month(UserId(1), 2025, 1);
        let imported = store.find_by(&criteria, 0, 10).unwrap();
        assert_eq!(
            imported[0].date,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
    }
}
