//! Analytics service RPC schema

use crate::amount::Amount;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Topup,
    Transfer,
}

/// One side of a transfer or top-up as served from the operation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRecord {
    pub id: Uuid,
    pub operation_type: OperationType,
    /// ISO-8601 UTC, millisecond precision.
    pub timestamp: String,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAccountOperationsQuery {
    pub limit: Option<i32>,
    pub after_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAccountOperationsResponse {
    pub content: Vec<OperationRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&OperationType::Topup).unwrap(),
            "\"TOPUP\""
        );
        assert_eq!(
            serde_json::to_string(&OperationType::Transfer).unwrap(),
            "\"TRANSFER\""
        );
    }

    #[test]
    fn test_topup_record_omits_counterparties() {
        let record = OperationRecord {
            id: Uuid::new_v4(),
            operation_type: OperationType::Topup,
            timestamp: "2025-01-01T00:00:00.000Z".to_string(),
            amount: Amount {
                value: "10.00".to_string(),
                currency_code: "RUB".to_string(),
            },
            sender_id: None,
            recipient_id: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("sender_id").is_none());
        assert!(json.get("recipient_id").is_none());
    }
}
