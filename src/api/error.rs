//! API Error Types
//!
//! Defines error types for the API layer and implements conversion to
//! `{ok: false, error}` responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::dto::Envelope;
use crate::market::MarketError;
use crate::store::StoreError;

/// Longest upstream body snippet echoed back to clients
const BODY_SNIPPET_CHARS: usize = 300;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("{0}")]
    Validation(String),

    /// Resource already exists
    #[error("{0}")]
    Conflict(String),

    /// Upstream market data failed
    #[error("{0}")]
    Upstream(#[from] MarketError),

    /// History source answered with an error status
    #[error("HTTP {status} from history source")]
    HistorySource { status: u16, body: String },

    /// Watchlist store failed
    #[error("Storage error: {0}")]
    Store(StoreError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => ApiError::Conflict("coin already in watchlist".to_string()),
            other => ApiError::Store(other),
        }
    }
}

impl ApiError {
    /// Map a history failure, keeping the upstream status and body snippet
    pub fn from_history(err: MarketError) -> Self {
        match err {
            MarketError::Status { status, .. } => {
                let body = err.body_snippet(BODY_SNIPPET_CHARS).unwrap_or_default();
                ApiError::HistorySource { status, body }
            }
            other => ApiError::Upstream(other),
        }
    }

    fn status_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::HistorySource { .. } => (StatusCode::BAD_GATEWAY, "HISTORY_SOURCE_ERROR"),
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let mut body = Envelope::<()>::error(self.to_string());
        if let ApiError::HistorySource { body: snippet, .. } = &self {
            body.body = Some(snippet.clone());
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
