use crate::error::GatewayError;
use crate::types::{
    GetOperationsResponse, RestAmount, RestOperation, TransferRequest, TransferResponse,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use wallet_contracts::analytics::{OperationRecord, OperationType};
use wallet_contracts::bank::{GetAccountResponse, TransferMoneyRequest};
use wallet_contracts::Amount;

const IDEMPOTENCY_KEY_HEADER: &str = "x-idempotency-key";

/// Raw query parameters; parsed by hand so malformed values produce the
/// gateway's own error envelope instead of the framework default.
#[derive(Debug, Default, Deserialize)]
pub struct OperationsQuery {
    pub limit: Option<String>,
    #[serde(rename = "afterId")]
    pub after_id: Option<String>,
}

fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, GatewayError> {
    Uuid::parse_str(raw)
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid {field}: {e}")))
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, GatewayError> {
    value.ok_or_else(|| GatewayError::InvalidRequest(format!("{field} is required")))
}

/// `POST /accounts/{accountId}/transfers`
pub async fn transfer_between_accounts(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, GatewayError> {
    let sender_id = parse_uuid("accountId", &account_id)?;
    let recipient_id = parse_uuid("recipient_id", &required("recipient_id", body.recipient_id)?)?;
    let amount = required("amount", body.amount)?;
    let amount_value = required("amount.value", amount.value)?;
    let currency_code = required("amount.currency_code", amount.currency_code)?;

    // Clients retry with the same key; the ledger's unique index is the
    // sole deduplication point.
    let idempotency_key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            GatewayError::InvalidRequest("X-Idempotency-Key header is required".to_string())
        })?;
    let idempotency_key = parse_uuid("X-Idempotency-Key", idempotency_key)?;

    info!(
        sender = %sender_id,
        recipient = %recipient_id,
        "forwarding transfer to ledger"
    );

    let response = state
        .bank
        .transfer_money(&TransferMoneyRequest {
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            amount: Amount {
                value: amount_value,
                currency_code,
            },
            idempotency_key: idempotency_key.to_string(),
        })
        .await?;

    Ok(Json(TransferResponse {
        operation_id: response.operation_id,
    }))
}

/// `GET /accounts/{accountId}/operations`
pub async fn get_account_operations(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(query): Query<OperationsQuery>,
) -> Result<Json<GetOperationsResponse>, GatewayError> {
    let account_id = parse_uuid("accountId", &account_id)?;

    let limit = query
        .limit
        .as_deref()
        .map(|raw| {
            raw.parse::<i32>()
                .map_err(|e| GatewayError::InvalidRequest(format!("invalid limit: {e}")))
        })
        .transpose()?;

    let after_id = query
        .after_id
        .as_deref()
        .map(|raw| parse_uuid("afterId", raw))
        .transpose()?;

    let response = state
        .analytics
        .list_account_operations(account_id, limit, after_id)
        .await?;

    Ok(Json(GetOperationsResponse {
        content: response.content.iter().map(to_rest_operation).collect(),
        after_id: response.after_id,
    }))
}

/// `GET /accounts/{accountId}`
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<GetAccountResponse>, GatewayError> {
    let account_id = parse_uuid("accountId", &account_id)?;

    let response = state.bank.get_account(account_id).await?;

    Ok(Json(response))
}

/// `POST /accounts/{accountId}/topup` — served by the card adapter once
/// it exists; the gateway only reserves the route.
pub async fn top_up_account(Path(account_id): Path<String>) -> Result<StatusCode, GatewayError> {
    parse_uuid("accountId", &account_id)?;
    Ok(StatusCode::NOT_IMPLEMENTED)
}

fn to_rest_operation(record: &OperationRecord) -> RestOperation {
    let operation_type = match record.operation_type {
        OperationType::Topup => "TOPUP",
        OperationType::Transfer => "TRANSFER",
    };

    RestOperation {
        id: record.id,
        operation_type: operation_type.to_string(),
        timestamp: record.timestamp.clone(),
        amount: RestAmount {
            value: record.amount.value.clone(),
            currency_code: record.amount.currency_code.clone(),
        },
        sender_id: record.sender_id,
        recipient_id: record.recipient_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid_rejects_garbage() {
        assert!(parse_uuid("accountId", "123").is_err());
        assert!(parse_uuid("accountId", "11111111-1111-1111-1111-111111111111").is_ok());
    }

    #[test]
    fn test_rest_operation_type_strings() {
        let record = OperationRecord {
            id: Uuid::new_v4(),
            operation_type: OperationType::Topup,
            timestamp: "2025-03-01T12:00:00.000Z".to_string(),
            amount: Amount {
                value: "10.00".to_string(),
                currency_code: "RUB".to_string(),
            },
            sender_id: None,
            recipient_id: None,
        };

        let rest = to_rest_operation(&record);
        assert_eq!(rest.operation_type, "TOPUP");
        assert!(rest.sender_id.is_none());
    }
}
