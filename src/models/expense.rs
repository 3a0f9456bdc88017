//! Expense record model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::ids::{ExpenseId, UserId};
use super::money::cents_from_amount;

/// A single recorded expense
///
/// The amount is stored both as a decimal value and as integer cents
/// (`amount_cents = round(amount * 100)`). The category is stored
/// lowercase-normalized; the service layer validates it against the
/// configured category set before a record is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Storage-assigned identifier; None until persisted
    pub id: Option<ExpenseId>,
    /// Owning user
    pub user_id: UserId,
    /// Calendar date of the expense (day precision)
    pub date: NaiveDate,
    /// Lowercase category label
    pub category: String,
    /// Decimal amount, always > 0
    pub amount: f64,
    /// Amount in cents, always round(amount * 100)
    pub amount_cents: i64,
    /// Free-text description, never empty
    pub description: String,
    /// Soft-delete marker, preserved across updates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<NaiveDateTime>,
}

impl Expense {
    /// Create a new unpersisted expense
    ///
    /// The category is lowercased and trimmed; cents are derived from the
    /// amount. Field validity (amount > 0, non-empty description, category
    /// membership) is the service layer's responsibility.
    pub fn new(
        user_id: UserId,
        date: NaiveDate,
        category: &str,
        amount: f64,
        description: &str,
    ) -> Self {
        Self {
            id: None,
            user_id,
            date,
            category: category.trim().to_lowercase(),
            amount,
            amount_cents: cents_from_amount(amount),
            description: description.trim().to_string(),
            deleted_at: None,
        }
    }

    /// Whether this record has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// The year this expense falls in
    pub fn year(&self) -> i32 {
        use chrono::Datelike;
        self.date.year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_and_derives_cents() {
        let expense = Expense::new(
            UserId(1),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            " Groceries ",
            12.30,
            "  Milk  ",
        );

        assert_eq!(expense.id, None);
        assert_eq!(expense.category, "groceries");
        assert_eq!(expense.amount, 12.30);
        assert_eq!(expense.amount_cents, 1230);
        assert_eq!(expense.description, "Milk");
        assert!(!expense.is_deleted());
    }

    #[test]
    fn test_serde_roundtrip() {
        let expense = Expense::new(
            UserId(3),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            "leisure",
            9.99,
            "Cinema",
        );

        let json = serde_json::to_string(&expense).unwrap();
        let back: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(expense, back);
    }
}
