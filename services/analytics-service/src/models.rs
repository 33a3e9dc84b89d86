use crate::errors::{AnalyticsError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;
use wallet_contracts::events::{STATUS_SUCCESS, TOPUP_COMPLETED, TRANSFER_COMPLETED};
use wallet_contracts::OperationCompletedEvent;

/// Operation type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Topup,
    Transfer,
}

/// One append-only history row: a single side of a transfer or a top-up.
///
/// A transfer event fans out into two rows sharing the operation id, one
/// per party; a top-up produces one row with empty counterparty fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Operation {
    pub id: Uuid,
    pub account_id: Uuid,
    pub operation_type: OperationType,
    pub timestamp: DateTime<Utc>,
    pub amount_value: Decimal,
    pub amount_currency: String,
    pub sender_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
}

/// Check an incoming event before ingestion. Violations classify the
/// message as poison: acknowledged without requeue.
pub fn validate_event(event: &OperationCompletedEvent) -> Result<()> {
    if event.status != STATUS_SUCCESS {
        return Err(AnalyticsError::InvalidEvent(format!(
            "only SUCCESS status events are processed, got: {}",
            event.status
        )));
    }

    match event.event_type.as_str() {
        TRANSFER_COMPLETED => {
            if event.sender_id.is_none() {
                return Err(AnalyticsError::InvalidEvent(
                    "transfer event without sender".to_string(),
                ));
            }
        }
        TOPUP_COMPLETED => {}
        other => {
            return Err(AnalyticsError::InvalidEvent(format!(
                "unknown event type: {other}"
            )));
        }
    }

    if event.amount.value.is_empty() {
        return Err(AnalyticsError::InvalidEvent(
            "amount value is required".to_string(),
        ));
    }

    if event.amount.currency_code.is_empty() {
        return Err(AnalyticsError::InvalidEvent(
            "currency code is required".to_string(),
        ));
    }

    if DateTime::parse_from_rfc3339(&event.timestamp).is_err() {
        return Err(AnalyticsError::InvalidEvent(format!(
            "timestamp is not valid ISO-8601: {}",
            event.timestamp
        )));
    }

    Ok(())
}

/// Fan an event out into its history rows.
pub fn rows_from_event(event: &OperationCompletedEvent) -> Result<Vec<Operation>> {
    validate_event(event)?;

    let timestamp = DateTime::parse_from_rfc3339(&event.timestamp)
        .map_err(|e| AnalyticsError::InvalidEvent(format!("failed to parse timestamp: {e}")))?
        .with_timezone(&Utc);

    let amount_value = Decimal::from_str(&event.amount.value)
        .map_err(|e| AnalyticsError::InvalidEvent(format!("failed to parse amount: {e}")))?;

    let rows = match event.event_type.as_str() {
        TRANSFER_COMPLETED => {
            let sender_id = event
                .sender_id
                .ok_or_else(|| AnalyticsError::InvalidEvent("transfer event without sender".into()))?;

            let base = Operation {
                id: event.operation_id,
                account_id: sender_id,
                operation_type: OperationType::Transfer,
                timestamp,
                amount_value,
                amount_currency: event.amount.currency_code.clone(),
                sender_id: Some(sender_id),
                recipient_id: Some(event.recipient_id),
            };

            let mut recipient_row = base.clone();
            recipient_row.account_id = event.recipient_id;

            vec![base, recipient_row]
        }
        // validate_event rejects everything else
        _ => vec![Operation {
            id: event.operation_id,
            account_id: event.recipient_id,
            operation_type: OperationType::Topup,
            timestamp,
            amount_value,
            amount_currency: event.amount.currency_code.clone(),
            sender_id: None,
            recipient_id: None,
        }],
    };

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wallet_contracts::events::EventAmount;

    fn transfer_event() -> OperationCompletedEvent {
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
            message: None,
        }
    }

    #[test]
    fn test_transfer_fans_out_into_two_rows() {
        let event = transfer_event();
        let rows = rows_from_event(&event).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, event.operation_id);
        assert_eq!(rows[1].id, event.operation_id);
        assert_eq!(rows[0].account_id, event.sender_id.unwrap());
        assert_eq!(rows[1].account_id, event.recipient_id);
        for row in &rows {
            assert_eq!(row.operation_type, OperationType::Transfer);
            assert_eq!(row.amount_value, dec!(100.50));
            assert_eq!(row.sender_id, event.sender_id);
            assert_eq!(row.recipient_id, Some(event.recipient_id));
        }
    }

    #[test]
    fn test_topup_produces_one_row_without_counterparties() {
        let mut event = transfer_event();
        event.event_type = TOPUP_COMPLETED.to_string();
        event.sender_id = None;

        let rows = rows_from_event(&event).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].account_id, event.recipient_id);
        assert_eq!(rows[0].operation_type, OperationType::Topup);
        assert!(rows[0].sender_id.is_none());
        assert!(rows[0].recipient_id.is_none());
    }

    #[test]
    fn test_non_success_status_rejected() {
        let mut event = transfer_event();
        event.status = "FAILED".to_string();
        assert!(matches!(
            rows_from_event(&event),
            Err(AnalyticsError::InvalidEvent(_))
        ));
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let mut event = transfer_event();
        event.timestamp = "not-a-timestamp".to_string();
        assert!(matches!(
            rows_from_event(&event),
            Err(AnalyticsError::InvalidEvent(_))
        ));
    }

    #[test]
    fn test_unknown_event_type_rejected() {
        let mut event = transfer_event();
        event.event_type = "refund.completed".to_string();
        assert!(matches!(
            rows_from_event(&event),
            Err(AnalyticsError::InvalidEvent(_))
        ));
    }

    #[test]
    fn test_transfer_without_sender_rejected() {
        let mut event = transfer_event();
        event.sender_id = None;
        assert!(matches!(
            rows_from_event(&event),
            Err(AnalyticsError::InvalidEvent(_))
        ));
    }

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
}
