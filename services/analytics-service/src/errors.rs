use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use wallet_contracts::{RpcCode, RpcError};

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("validation error: {0}")]
    Validation(String),

    /// A message that can never be processed; acknowledged without requeue.
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("messaging error: {0}")]
    Nats(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AnalyticsError {
    pub fn rpc_code(&self) -> RpcCode {
        match self {
            AnalyticsError::Validation(_) => RpcCode::InvalidArgument,
            AnalyticsError::InvalidEvent(_) => RpcCode::InvalidArgument,
            AnalyticsError::Database(_) => RpcCode::Internal,
            AnalyticsError::Nats(_) => RpcCode::Internal,
            AnalyticsError::Internal(_) => RpcCode::Internal,
        }
    }
}

impl ResponseError for AnalyticsError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.rpc_code().http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
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
            AnalyticsError::Validation("limit".into()).rpc_code(),
            RpcCode::InvalidArgument
        );
        assert_eq!(
            AnalyticsError::Internal("boom".into()).rpc_code(),
            RpcCode::Internal
        );
    }
}
