//! spendlog - Personal expense tracking for the command line
//!
//! This library provides the core functionality for the spendlog expense
//! tracker: per-user expense records with monthly category summaries,
//! configurable budget alerts, and bulk CSV import.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration, paths and the category budget table
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, users, query criteria)
//! - `storage`: JSON file storage layer behind the `ExpenseRepository` trait
//! - `services`: Business logic layer (summaries, alerts, import, auth)
//! - `cli`: Command handlers bridging clap to the services
//!
//! # Example
//!
//! ```rust,ignore
//! use spendlog::config::{paths::SpendlogPaths, settings::Settings};
//!
//! let paths = SpendlogPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::SpendlogError;
