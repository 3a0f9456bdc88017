//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod dashboard;
pub mod expense;

pub use account::{handle_account_command, AccountCommands};
pub use dashboard::handle_dashboard_command;
pub use expense::{handle_expense_command, ExpenseCommands};
