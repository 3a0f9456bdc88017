//! Core data models for spendlog

pub mod criteria;
pub mod expense;
pub mod ids;
pub mod money;
pub mod user;

pub use criteria::Criteria;
pub use expense::Expense;
pub use ids::{ExpenseId, UserId};
pub use user::{User, UserIdentity};
