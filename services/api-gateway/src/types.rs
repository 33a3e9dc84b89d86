// REST surface types
// Field names here are part of the public API and must not drift.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestAmount {
    pub value: String,
    pub currency_code: String,
}

/// Body of `POST /accounts/{accountId}/transfers`.
///
/// Fields are optional at the parse level so a missing field produces the
/// gateway's 400 envelope instead of a framework rejection.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub recipient_id: Option<String>,
    pub amount: Option<TransferAmountBody>,
}

#[derive(Debug, Deserialize)]
pub struct TransferAmountBody {
    pub value: Option<String>,
    pub currency_code: Option<String>,
}

/// 200 response for a transfer.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub operation_id: Uuid,
}

/// One row of `GET /accounts/{accountId}/operations`.
#[derive(Debug, Serialize)]
pub struct RestOperation {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub operation_type: String,
    pub timestamp: String,
    pub amount: RestAmount,
    #[serde(rename = "senderId", skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<Uuid>,
    #[serde(rename = "recipientId", skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct GetOperationsResponse {
    pub content: Vec<RestOperation>,
    #[serde(rename = "afterId", skip_serializing_if = "Option::is_none")]
    pub after_id: Option<Uuid>,
}

/// Error envelope returned for every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct BaseError {
    pub code: String,
    pub description: String,
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_json_field_names() {
        let op = RestOperation {
            id: Uuid::new_v4(),
            operation_type: "TRANSFER".to_string(),
            timestamp: "2025-03-01T12:00:00.000Z".to_string(),
            amount: RestAmount {
                value: "10.00".to_string(),
                currency_code: "RUB".to_string(),
            },
            sender_id: Some(Uuid::new_v4()),
            recipient_id: Some(Uuid::new_v4()),
        };

        let json = serde_json::to_value(&op).unwrap();
        assert!(json.get("type").is_some());
        assert!(json.get("senderId").is_some());
        assert!(json.get("recipientId").is_some());
        assert!(json["amount"].get("currency_code").is_some());
    }

    #[test]
    fn test_topup_row_omits_counterparties() {
        let op = RestOperation {
            id: Uuid::new_v4(),
            operation_type: "TOPUP".to_string(),
            timestamp: "2025-03-01T12:00:00.000Z".to_string(),
            amount: RestAmount {
                value: "10.00".to_string(),
                currency_code: "RUB".to_string(),
            },
            sender_id: None,
            recipient_id: None,
        };

        let json = serde_json::to_value(&op).unwrap();
        assert!(json.get("senderId").is_none());
        assert!(json.get("recipientId").is_none());
    }

    #[test]
    fn test_operations_response_cursor_field() {
        let with_cursor = GetOperationsResponse {
            content: vec![],
            after_id: Some(Uuid::new_v4()),
        };
        let json = serde_json::to_value(&with_cursor).unwrap();
        assert!(json.get("afterId").is_some());

        let without_cursor = GetOperationsResponse {
            content: vec![],
            after_id: None,
        };
        let json = serde_json::to_value(&without_cursor).unwrap();
        assert!(json.get("afterId").is_none());
    }
}
