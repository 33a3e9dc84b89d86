// Ledger Service Library
// Owns accounts and transfers; publishes domain events after commit

pub mod config;
pub mod database;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod models;
pub mod services;
pub mod validation;

// Re-exports
pub use config::Config;
pub use database::Database;
pub use errors::{LedgerError, Result};
pub use events::EventPublisher;
pub use models::{Account, Transfer, TransferStatus};
pub use services::TransferService;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = "ledger-service";
