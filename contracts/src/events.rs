//! Domain event payloads published by the ledger after commit
//!
//! The JSON layout is part of the public contract and is consumed by the
//! analytics ingester; field names are camelCase and timestamps travel as
//! ISO-8601 strings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `eventType` value for a completed transfer.
pub const TRANSFER_COMPLETED: &str = "transfer.completed";

/// `eventType` value for a completed top-up.
pub const TOPUP_COMPLETED: &str = "topup.completed";

/// Wire status carried by operation events; only SUCCESS is ever published.
pub const STATUS_SUCCESS: &str = "SUCCESS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAmount {
    pub value: String,
    pub currency_code: String,
}

/// Event emitted after a transfer or top-up reaches the Success state and
/// its transaction has committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationCompletedEvent {
    pub event_id: Uuid,
    pub event_type: String,
    pub event_timestamp: String,
    pub operation_id: Uuid,
    /// Absent for top-ups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<Uuid>,
    /// The credited account.
    pub recipient_id: Uuid,
    pub amount: EventAmount,
    pub idempotency_key: String,
    pub status: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> OperationCompletedEvent {
        OperationCompletedEvent {
            event_id: Uuid::new_v4(),
            event_type: TRANSFER_COMPLETED.to_string(),
            event_timestamp: "2025-03-01T12:00:00Z".to_string(),
            operation_id: Uuid::new_v4(),
            sender_id: Some(Uuid::new_v4()),
            recipient_id: Uuid::new_v4(),
            amount: EventAmount {
                value: "100.50".to_string(),
                currency_code: "RUB".to_string(),
            },
            idempotency_key: "K1".to_string(),
            status: STATUS_SUCCESS.to_string(),
            timestamp: "2025-03-01T12:00:00Z".to_string(),
            message: Some("Transfer completed successfully".to_string()),
        }
    }

    #[test]
    fn test_event_field_names_are_camel_case() {
        let json = serde_json::to_value(sample_event()).unwrap();

        for key in [
            "eventId",
            "eventType",
            "eventTimestamp",
            "operationId",
            "senderId",
            "recipientId",
            "amount",
            "idempotencyKey",
            "status",
            "timestamp",
            "message",
        ] {
            assert!(json.get(key).is_some(), "missing field {key}");
        }
        assert!(json["amount"].get("currencyCode").is_some());
    }

    #[test]
    fn test_topup_event_omits_sender() {
        let mut event = sample_event();
        event.event_type = TOPUP_COMPLETED.to_string();
        event.sender_id = None;
        event.message = None;

        let json = serde_json::to_value(event).unwrap();
        assert!(json.get("senderId").is_none());
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_event_round_trip() {
        let event = sample_event();
        let bytes = serde_json::to_vec(&event).unwrap();
        let back: OperationCompletedEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back.operation_id, event.operation_id);
        assert_eq!(back.status, STATUS_SUCCESS);
        assert_eq!(back.amount, event.amount);
    }
}
