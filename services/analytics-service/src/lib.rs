// Analytics Service Library
// Ingests ledger events and serves per-account operation history

pub mod config;
pub mod consumer;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod service;

// Re-exports
pub use config::Config;
pub use database::Database;
pub use errors::{AnalyticsError, Result};
pub use models::{Operation, OperationType};
pub use service::AnalyticsService;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = "analytics-service";
