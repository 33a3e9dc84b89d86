use crate::database::Database;
use crate::errors::{AnalyticsError, Result};
use crate::models::{Operation, OperationType};
use chrono::SecondsFormat;
use std::sync::Arc;
use uuid::Uuid;
use wallet_contracts::analytics::{
    ListAccountOperationsResponse, OperationRecord, OperationType as WireOperationType,
};
use wallet_contracts::Amount;

/// Query-side logic: validation and result shaping over the operation
/// history store.
pub struct AnalyticsService {
    db: Arc<Database>,
}

impl AnalyticsService {
    pub fn new(db: Arc<Database>) -> Self {
        AnalyticsService { db }
    }

    /// Paginated operation history for an account, newest first. The
    /// returned `after_id` cursor is the id of the last row; passing it
    /// back yields strictly later rows.
    pub async fn list_account_operations(
        &self,
        account_id: &str,
        limit: Option<i32>,
        after_id: Option<Uuid>,
    ) -> Result<ListAccountOperationsResponse> {
        let account_id = validate_list_request(account_id, limit)?;
        let limit = limit.unwrap_or(0);

        let operations = self
            .db
            .list_account_operations(account_id, limit, after_id)
            .await?;

        let after_id = operations.last().map(|op| op.id);
        let content = operations.iter().map(to_wire).collect();

        Ok(ListAccountOperationsResponse { content, after_id })
    }
}

fn validate_list_request(account_id: &str, limit: Option<i32>) -> Result<Uuid> {
    if account_id.is_empty() {
        return Err(AnalyticsError::Validation(
            "account_id is required".to_string(),
        ));
    }

    let account_id = Uuid::parse_str(account_id)
        .map_err(|e| AnalyticsError::Validation(format!("invalid account_id: {e}")))?;

    if let Some(limit) = limit {
        if limit < 0 {
            return Err(AnalyticsError::Validation(
                "limit cannot be negative".to_string(),
            ));
        }
    }

    Ok(account_id)
}

fn to_wire(op: &Operation) -> OperationRecord {
    let operation_type = match op.operation_type {
        OperationType::Topup => WireOperationType::Topup,
        OperationType::Transfer => WireOperationType::Transfer,
    };

    OperationRecord {
        id: op.id,
        operation_type,
        timestamp: op.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        amount: Amount::from_decimal(op.amount_value, &op.amount_currency),
        sender_id: op.sender_id,
        recipient_id: op.recipient_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_rejects_empty_account() {
        assert!(validate_list_request("", None).is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_account() {
        assert!(validate_list_request("not-a-uuid", None).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_limit() {
        let id = Uuid::new_v4().to_string();
        assert!(validate_list_request(&id, Some(-1)).is_err());
        assert!(validate_list_request(&id, Some(0)).is_ok());
        assert!(validate_list_request(&id, Some(10)).is_ok());
    }

    #[test]
    fn test_wire_shape_millisecond_timestamp() {
        let op = Operation {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            operation_type: OperationType::Transfer,
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 45).unwrap(),
            amount_value: dec!(150.5),
            amount_currency: "RUB".to_string(),
            sender_id: Some(Uuid::new_v4()),
            recipient_id: Some(Uuid::new_v4()),
        };

        let record = to_wire(&op);
        assert_eq!(record.timestamp, "2025-03-01T12:30:45.000Z");
        assert_eq!(record.amount.value, "150.50");
        assert_eq!(record.operation_type, WireOperationType::Transfer);
    }
}
