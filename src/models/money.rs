//! Monetary conversion and formatting helpers
//!
//! Expenses carry both a decimal amount and an integer minor-unit (cents)
//! representation. The cents value is always `round(amount * 100)`, rounding
//! halves away from zero.

/// Convert a decimal amount to cents
///
/// # Examples
/// ```
/// use spendlog::models::money::cents_from_amount;
/// assert_eq!(cents_from_amount(12.30), 1230);
/// ```
pub fn cents_from_amount(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Format an amount with two decimal places and a trailing symbol
///
/// Produces the European-style `"12.30 €"` used throughout the UI and in
/// budget alert messages.
pub fn format_amount(amount: f64, symbol: &str) -> String {
    format!("{:.2} {}", amount, symbol)
}
