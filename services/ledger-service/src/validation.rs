use crate::errors::{LedgerError, Result};
use crate::models::Money;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;
use wallet_contracts::Amount;

/// Parse a wire amount into a validated `Money`.
///
/// The value must be a strictly positive decimal with at most two
/// fractional digits; the currency must be a three-letter ISO 4217 code.
pub fn parse_amount(amount: &Amount) -> Result<Money> {
    if amount.value.is_empty() {
        return Err(LedgerError::Validation(
            "amount value is required".to_string(),
        ));
    }

    let value = Decimal::from_str(&amount.value)
        .map_err(|e| LedgerError::Validation(format!("invalid amount value: {e}")))?;

    if value <= Decimal::ZERO {
        return Err(LedgerError::Validation(
            "amount must be positive".to_string(),
        ));
    }

    if value.scale() > 2 {
        return Err(LedgerError::Validation(
            "amount must have at most two fractional digits".to_string(),
        ));
    }

    validate_currency_code(&amount.currency_code)?;

    Ok(Money {
        value,
        currency: amount.currency_code.clone(),
    })
}

/// ISO 4217: exactly three uppercase ASCII letters.
pub fn validate_currency_code(code: &str) -> Result<()> {
    if code.is_empty() {
        return Err(LedgerError::Validation(
            "currency code is required".to_string(),
        ));
    }

    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(LedgerError::Validation(
            "currency code must be three uppercase letters".to_string(),
        ));
    }

    Ok(())
}

/// Parse an account identifier from its wire representation.
pub fn parse_account_id(field: &str, raw: &str) -> Result<Uuid> {
    if raw.is_empty() {
        return Err(LedgerError::Validation(format!("{field} is required")));
    }

    Uuid::parse_str(raw).map_err(|e| LedgerError::Validation(format!("invalid {field}: {e}")))
}

pub fn validate_idempotency_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(LedgerError::Validation(
            "idempotency_key is required".to_string(),
        ));
    }
    Ok(())
}

/// Pure checks run before any I/O on the transfer path.
pub fn validate_transfer_request(
    sender_id: Uuid,
    recipient_id: Uuid,
    idempotency_key: &str,
) -> Result<()> {
    if sender_id == recipient_id {
        return Err(LedgerError::Validation(
            "sender and recipient must be different accounts".to_string(),
        ));
    }

    validate_idempotency_key(idempotency_key)
}
