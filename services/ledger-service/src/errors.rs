use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use uuid::Uuid;
use wallet_contracts::{RpcCode, RpcError};

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("account not found: {0}")]
    AccountNotFound(Uuid),

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("currency mismatch between account and transfer")]
    CurrencyMismatch,

    #[error("transfer with this idempotency key already exists")]
    DuplicateIdempotencyKey,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("event publish error: {0}")]
    Publish(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    pub fn rpc_code(&self) -> RpcCode {
        match self {
            LedgerError::Validation(_) => RpcCode::InvalidArgument,
            LedgerError::AccountNotFound(_) => RpcCode::NotFound,
            LedgerError::InsufficientFunds => RpcCode::FailedPrecondition,
            LedgerError::CurrencyMismatch => RpcCode::InvalidArgument,
            LedgerError::DuplicateIdempotencyKey => RpcCode::AlreadyExists,
            LedgerError::Database(_) => RpcCode::Internal,
            LedgerError::Publish(_) => RpcCode::Internal,
            LedgerError::Internal(_) => RpcCode::Internal,
        }
    }
}

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.rpc_code().http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(RpcError::new(self.rpc_code(), self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_code_mapping() {
        assert_eq!(
            LedgerError::Validation("bad".into()).rpc_code(),
            RpcCode::InvalidArgument
        );
        assert_eq!(
            LedgerError::AccountNotFound(Uuid::new_v4()).rpc_code(),
            RpcCode::NotFound
        );
        assert_eq!(
            LedgerError::InsufficientFunds.rpc_code(),
            RpcCode::FailedPrecondition
        );
        assert_eq!(
            LedgerError::CurrencyMismatch.rpc_code(),
            RpcCode::InvalidArgument
        );
        assert_eq!(
            LedgerError::Internal("boom".into()).rpc_code(),
            RpcCode::Internal
        );
    }

    #[test]
    fn test_http_status_follows_code() {
        assert_eq!(
            LedgerError::InsufficientFunds.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            LedgerError::AccountNotFound(Uuid::new_v4()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
