//! Shared wire contracts for the wallet services
//!
//! Every schema that crosses a service boundary lives here:
//! - RPC request/response types for the ledger and analytics services
//! - the domain event payload published after a ledger commit
//! - the RPC error envelope and its code taxonomy
//! - messaging subject and stream names

pub mod amount;
pub mod analytics;
pub mod bank;
pub mod error;
pub mod events;
pub mod subjects;

pub use amount::Amount;
pub use error::{RpcCode, RpcError};
pub use events::OperationCompletedEvent;
