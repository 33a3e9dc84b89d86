//! Ledger service RPC schema

use crate::amount::Amount;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire status of a transfer.
///
/// Pending and Failed both collapse to `UNSPECIFIED` on the wire; callers
/// disambiguate through the response message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Unspecified,
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferMoneyRequest {
    pub sender_id: String,
    pub recipient_id: String,
    pub amount: Amount,
    pub idempotency_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferMoneyResponse {
    pub operation_id: Uuid,
    pub status: TransferStatus,
    pub message: String,
    /// ISO-8601 UTC, second precision.
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAccountResponse {
    pub account_id: Uuid,
    pub balance: Amount,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUpRequest {
    pub account_id: String,
    pub amount: Amount,
    pub idempotency_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUpResponse {
    pub operation_id: Uuid,
    pub status: TransferStatus,
    pub message: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TransferStatus::Success).unwrap(),
            "\"SUCCESS\""
        );
        assert_eq!(
            serde_json::to_string(&TransferStatus::Unspecified).unwrap(),
            "\"UNSPECIFIED\""
        );
    }
}
