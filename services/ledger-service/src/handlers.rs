use crate::errors::LedgerError;
use crate::models::{Transfer, TransferStatus};
use crate::services::TransferService;
use crate::validation;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use std::sync::Arc;
use wallet_contracts::bank::{
    GetAccountResponse, TopUpRequest, TopUpResponse, TransferMoneyRequest, TransferMoneyResponse,
    TransferStatus as WireStatus,
};
use wallet_contracts::Amount;

/// Health check endpoint
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": crate::SERVICE_NAME,
        "version": crate::VERSION
    }))
}

/// Execute a money transfer; idempotent under the request's key.
pub async fn transfer_money(
    service: web::Data<Arc<TransferService>>,
    request: web::Json<TransferMoneyRequest>,
) -> Result<HttpResponse, LedgerError> {
    let request = request.into_inner();

    let sender_id = validation::parse_account_id("sender_id", &request.sender_id)?;
    let recipient_id = validation::parse_account_id("recipient_id", &request.recipient_id)?;
    let amount = validation::parse_amount(&request.amount)?;

    let transfer = service
        .execute_transfer(sender_id, recipient_id, amount, &request.idempotency_key)
        .await?;

    Ok(HttpResponse::Ok().json(TransferMoneyResponse {
        operation_id: transfer.id,
        status: wire_status(transfer.status),
        message: transfer.message.clone(),
        timestamp: response_timestamp(&transfer),
    }))
}

/// Credit an account from a confirmed external payment.
pub async fn top_up(
    service: web::Data<Arc<TransferService>>,
    request: web::Json<TopUpRequest>,
) -> Result<HttpResponse, LedgerError> {
    let request = request.into_inner();

    let account_id = validation::parse_account_id("account_id", &request.account_id)?;
    let amount = validation::parse_amount(&request.amount)?;

    let transfer = service
        .execute_deposit(account_id, amount, &request.idempotency_key)
        .await?;

    Ok(HttpResponse::Ok().json(TopUpResponse {
        operation_id: transfer.id,
        status: wire_status(transfer.status),
        message: transfer.message.clone(),
        timestamp: response_timestamp(&transfer),
    }))
}

/// Current account state; no locks on the read path.
pub async fn get_account(
    service: web::Data<Arc<TransferService>>,
    account_id: web::Path<String>,
) -> Result<HttpResponse, LedgerError> {
    let account_id = validation::parse_account_id("account_id", &account_id)?;

    let account = service.get_account(account_id).await?;

    Ok(HttpResponse::Ok().json(GetAccountResponse {
        account_id: account.id,
        balance: Amount::from_decimal(account.balance_value, &account.balance_currency_code),
        timestamp: format_timestamp(Utc::now()),
    }))
}

/// Configure routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rpc/v1/bank")
            .route("/health", web::get().to(health_check))
            .route("/transfer-money", web::post().to(transfer_money))
            .route("/top-up", web::post().to(top_up))
            .route("/accounts/{account_id}", web::get().to(get_account)),
    );
}

/// Pending and Failed both collapse to UNSPECIFIED on the wire.
fn wire_status(status: TransferStatus) -> WireStatus {
    match status {
        TransferStatus::Success => WireStatus::Success,
        TransferStatus::Pending | TransferStatus::Failed => WireStatus::Unspecified,
    }
}

fn response_timestamp(transfer: &Transfer) -> String {
    format_timestamp(transfer.completed_at.unwrap_or(transfer.created_at))
}

/// ISO-8601 UTC at second precision.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wire_status_collapse() {
        assert_eq!(wire_status(TransferStatus::Success), WireStatus::Success);
        assert_eq!(wire_status(TransferStatus::Pending), WireStatus::Unspecified);
        assert_eq!(wire_status(TransferStatus::Failed), WireStatus::Unspecified);
    }

    #[test]
    fn test_timestamp_second_precision() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 45).unwrap();
        assert_eq!(format_timestamp(at), "2025-03-01T12:30:45Z");
    }
}
