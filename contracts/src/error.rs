//! RPC error envelope shared by all services
//!
//! The code taxonomy mirrors the transport mapping table the gateway
//! translates to HTTP statuses; services attach a human-readable message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcCode {
    InvalidArgument,
    NotFound,
    FailedPrecondition,
    AlreadyExists,
    Unavailable,
    Internal,
}

impl RpcCode {
    /// HTTP status used between services (not the gateway's public mapping).
    pub fn http_status(&self) -> u16 {
        match self {
            RpcCode::InvalidArgument => 400,
            RpcCode::NotFound => 404,
            RpcCode::FailedPrecondition => 422,
            RpcCode::AlreadyExists => 409,
            RpcCode::Unavailable => 503,
            RpcCode::Internal => 500,
        }
    }
}

/// Error body returned by the ledger and analytics RPC facades.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{code:?}: {message}")]
pub struct RpcError {
    pub code: RpcCode,
    pub message: String,
}

impl RpcError {
    pub fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(RpcCode::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RpcCode::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(RpcCode::Internal, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_wire_names() {
        assert_eq!(
            serde_json::to_string(&RpcCode::FailedPrecondition).unwrap(),
            "\"FAILED_PRECONDITION\""
        );
        assert_eq!(
            serde_json::to_string(&RpcCode::InvalidArgument).unwrap(),
            "\"INVALID_ARGUMENT\""
        );
    }

    #[test]
    fn test_envelope_round_trip() {
        let err = RpcError::not_found("account not found");
        let bytes = serde_json::to_vec(&err).unwrap();
        let back: RpcError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back.code, RpcCode::NotFound);
        assert_eq!(back.message, "account not found");
    }
}
