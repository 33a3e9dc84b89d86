use crate::types::BaseError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;
use wallet_contracts::{RpcCode, RpcError};

/// Gateway-side failures. RPC errors carry the upstream code through to
/// the public mapping; everything else collapses to 400 or 500.
#[derive(Debug)]
pub enum GatewayError {
    /// Request rejected before any RPC was made.
    InvalidRequest(String),
    /// Upstream service answered with an error envelope.
    Rpc(RpcError),
    /// Upstream unreachable or answered garbage.
    Upstream(String),
}

impl GatewayError {
    /// Public HTTP mapping: NotFound→404, InvalidArgument→400,
    /// FailedPrecondition→400, AlreadyExists→409, all others→500.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            GatewayError::Rpc(err) => match err.code {
                RpcCode::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                RpcCode::InvalidArgument => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
                RpcCode::FailedPrecondition => (StatusCode::BAD_REQUEST, "FAILED_PRECONDITION"),
                RpcCode::AlreadyExists => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
                RpcCode::Unavailable | RpcCode::Internal => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
            },
            GatewayError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn description(&self) -> String {
        match self {
            GatewayError::InvalidRequest(msg) => msg.clone(),
            GatewayError::Rpc(err) => err.message.clone(),
            GatewayError::Upstream(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        (
            status,
            Json(BaseError {
                code: code.to_string(),
                description: self.description(),
                id: Uuid::new_v4(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_code_mapping() {
        let cases = [
            (RpcCode::NotFound, StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                RpcCode::InvalidArgument,
                StatusCode::BAD_REQUEST,
                "INVALID_ARGUMENT",
            ),
            (
                RpcCode::FailedPrecondition,
                StatusCode::BAD_REQUEST,
                "FAILED_PRECONDITION",
            ),
            (RpcCode::AlreadyExists, StatusCode::CONFLICT, "ALREADY_EXISTS"),
            (
                RpcCode::Internal,
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
            (
                RpcCode::Unavailable,
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (rpc_code, status, code) in cases {
            let err = GatewayError::Rpc(RpcError::new(rpc_code, "message"));
            assert_eq!(err.status_and_code(), (status, code));
        }
    }

    #[test]
    fn test_local_validation_is_bad_request() {
        let err = GatewayError::InvalidRequest("bad uuid".to_string());
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT")
        );
    }

    #[test]
    fn test_transport_failure_is_internal() {
        let err = GatewayError::Upstream("connection refused".to_string());
        assert_eq!(
            err.status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        );
    }
}
