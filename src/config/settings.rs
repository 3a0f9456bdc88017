//! User settings for spendlog
//!
//! Manages display preferences and the per-category budget configuration
//! that drives category validation and monthly budget alerts.

use serde::{Deserialize, Serialize};

use super::paths::SpendlogPaths;
use crate::error::{SpendlogError, SpendlogResult};
use crate::storage::file_io::{read_json, write_json_atomic};

/// A configured spending ceiling for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    /// Category name as written in the configuration (display casing)
    pub category: String,
    /// Monthly spending ceiling for the category
    pub monthly_limit: f64,
}

/// Ordered category→budget mapping
///
/// Category lookups are case-insensitive; iteration follows the order the
/// entries appear in the configuration file, which is also the order budget
/// alerts are emitted in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryBudgets {
    budgets: Vec<CategoryBudget>,
}

impl CategoryBudgets {
    pub fn new(budgets: Vec<CategoryBudget>) -> Self {
        Self { budgets }
    }

    /// Build from (category, limit) pairs, keeping the given order
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            budgets: pairs
                .into_iter()
                .map(|(category, monthly_limit)| CategoryBudget {
                    category: category.into(),
                    monthly_limit,
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty()
    }

    /// Iterate over (lowercase category, limit) in configuration order
    pub fn iter(&self) -> impl Iterator<Item = (String, f64)> + '_ {
        self.budgets
            .iter()
            .map(|b| (b.category.trim().to_lowercase(), b.monthly_limit))
    }

    /// Category names as configured (display casing), in order
    pub fn category_names(&self) -> Vec<&str> {
        self.budgets.iter().map(|b| b.category.as_str()).collect()
    }

    /// Lowercase category allow-list, in configuration order
    pub fn valid_categories(&self) -> Vec<String> {
        self.iter().map(|(category, _)| category).collect()
    }

    /// Check whether an (already lowercased/trimmed) category is configured
    pub fn is_valid_category(&self, category: &str) -> bool {
        self.iter().any(|(name, _)| name == category)
    }

    /// Look up the budget ceiling for a category, case-insensitively
    pub fn limit_for(&self, category: &str) -> Option<f64> {
        let wanted = category.trim().to_lowercase();
        self.iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, limit)| limit)
    }
}

/// User settings for spendlog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used in formatted amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Page size for expense listings
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Per-category monthly budget ceilings, in alert order
    #[serde(default)]
    pub category_budgets: CategoryBudgets,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_page_size() -> usize {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            page_size: default_page_size(),
            category_budgets: CategoryBudgets::default(),
        }
    }
}

impl Settings {
    /// Load settings from the config file, creating it with defaults if missing
    pub fn load_or_create(paths: &SpendlogPaths) -> SpendlogResult<Self> {
        let path = paths.settings_file();
        if path.exists() {
            read_json(&path)
        } else {
            let settings = Self::default();
            settings.save(paths)?;
            Ok(settings)
        }
    }

    /// Save settings to the config file
    pub fn save(&self, paths: &SpendlogPaths) -> SpendlogResult<()> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
            .map_err(|e| SpendlogError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_budgets() -> CategoryBudgets {
        CategoryBudgets::from_pairs([("Groceries", 300.0), ("Leisure", 50.0)])
    }

    #[test]
    fn test_valid_categories_lowercased_in_order() {
        let budgets = sample_budgets();
        assert_eq!(budgets.valid_categories(), vec!["groceries", "leisure"]);
        assert!(budgets.is_valid_category("groceries"));
        assert!(!budgets.is_valid_category("transport"));
    }

    #[test]
    fn test_limit_lookup_case_insensitive() {
        let budgets = sample_budgets();
        assert_eq!(budgets.limit_for("GROCERIES"), Some(300.0));
        assert_eq!(budgets.limit_for(" groceries "), Some(300.0));
        assert_eq!(budgets.limit_for("transport"), None);
    }

    #[test]
    fn test_empty_configuration() {
        let budgets = CategoryBudgets::default();
        assert!(budgets.is_empty());
        assert!(budgets.valid_categories().is_empty());
        assert!(!budgets.is_valid_category("groceries"));
    }

    #[test]
    fn test_load_or_create_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendlogPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::load_or_create(&paths).unwrap();
        assert!(paths.is_initialized());
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.page_size, 20);

        settings.category_budgets = sample_budgets();
        settings.save(&paths).unwrap();

        let reloaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(reloaded.category_budgets, sample_budgets());
    }

    #[test]
    fn test_budget_order_preserved_through_json() {
        let budgets = CategoryBudgets::from_pairs([
            ("Transport", 80.0),
            ("Groceries", 300.0),
            ("Leisure", 50.0),
        ]);

        let json = serde_json::to_string(&budgets).unwrap();
        let reloaded: CategoryBudgets = serde_json::from_str(&json).unwrap();
        assert_eq!(
            reloaded.valid_categories(),
            vec!["transport", "groceries", "leisure"]
        );
    }
}
