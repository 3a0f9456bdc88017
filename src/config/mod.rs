//! Configuration and path management

pub mod paths;
pub mod settings;

pub use paths::SpendlogPaths;
pub use settings::{CategoryBudget, CategoryBudgets, Settings};
