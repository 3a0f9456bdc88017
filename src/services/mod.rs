//! Business logic services
//!
//! Each service borrows the stores it needs and the loaded settings; nothing
//! here touches the filesystem directly.

pub mod alerts;
pub mod auth;
pub mod expense;
pub mod import;
pub mod summary;

pub use alerts::{Alert, AlertGenerator, AlertLevel};
pub use auth::AuthService;
pub use expense::ExpenseService;
pub use import::{CsvImportService, DiskUpload, SkipReason, SkippedRow, UploadedFile};
pub use summary::{CategoryFigure, MonthlySummaryService};
