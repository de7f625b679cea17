// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::blockchain::LedgerError;
use crate::reconcile::ReconcileError;
use crate::storage::StoreError;

/// Error returned by every HTTP handler.
///
/// Rendered as the uniform envelope `{"success": false, "error": message}`.
/// Underlying messages are passed through verbatim.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn confirmation_pending(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => Self::bad_request(err.to_string()),
            StoreError::NotFound(_) => Self::not_found(err.to_string()),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAddress(_) | LedgerError::InvalidTransaction(_) => {
                Self::bad_request(err.to_string())
            }
            LedgerError::ConfirmationTimeout { .. } => Self::confirmation_pending(err.to_string()),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Store(e) => e.into(),
            ReconcileError::Ledger(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let forbidden = ApiError::forbidden("no");
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

        let internal = ApiError::internal("boom");
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);

        let pending = ApiError::confirmation_pending("later");
        assert_eq!(pending.status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn into_response_returns_envelope() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"success":false,"error":"bad data"}"#);
    }

    #[test]
    fn store_errors_map_to_status() {
        let dup: ApiError = StoreError::Duplicate("Student R1 already exists".into()).into();
        assert_eq!(dup.status, StatusCode::BAD_REQUEST);
        assert_eq!(dup.message, "Student R1 already exists");

        let missing: ApiError = StoreError::NotFound("Course 9".into()).into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn ledger_errors_map_to_status() {
        let rpc: ApiError = LedgerError::RpcError("connection refused".into()).into();
        assert_eq!(rpc.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(rpc.message.contains("connection refused"));

        let reverted: ApiError = LedgerError::Reverted("0xabc".into()).into();
        assert_eq!(reverted.status, StatusCode::INTERNAL_SERVER_ERROR);

        let timeout: ApiError = LedgerError::ConfirmationTimeout {
            tx_hash: "0xfeed".into(),
        }
        .into();
        assert_eq!(timeout.status, StatusCode::GATEWAY_TIMEOUT);
        assert!(timeout.message.contains("0xfeed"));

        let invalid: ApiError = LedgerError::InvalidAddress("nope".into()).into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    }
}
