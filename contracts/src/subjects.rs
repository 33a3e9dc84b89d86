//! Messaging topology shared by publisher and consumer
//!
//! Events flow through a single durable stream capturing every subject
//! under the `bank.operations` prefix; consumers bind with the wildcard
//! filter and dispatch on the concrete subject.

/// Subject prefix for all operation events.
pub const EXCHANGE: &str = "bank.operations";

/// Durable stream capturing the exchange.
pub const STREAM_NAME: &str = "BANK_OPERATIONS";

/// Wildcard filter matching every operation event.
pub const BINDING: &str = "bank.operations.>";

/// Subject for completed transfers.
pub const TRANSFER_COMPLETED_SUBJECT: &str = "bank.operations.transfer.completed";

/// Subject for completed top-ups.
pub const TOPUP_COMPLETED_SUBJECT: &str = "bank.operations.topup.completed";

/// Build the subject for an event type, e.g. `transfer.completed`.
pub fn subject_for(event_type: &str) -> String {
    format!("{}.{}", EXCHANGE, event_type)
}
