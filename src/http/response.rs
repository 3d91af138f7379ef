//! Response bodies and error mapping.
//!
//! Every failure leaves the API as `{"error": "<message>"}` with a status:
//! - 400 for malformed input
//! - 404 when a transaction has no execution results
//! - 502 when the gateway is unreachable or refuses a call
//! - 503 before `/set_config` has succeeded
//! - 504 when a transaction does not become final in time
//! - 500 for everything else

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::Operation;
use crate::ledger::LedgerError;
use crate::orchestrator::{OrchestratorError, SessionError};
use crate::query::QueryError;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("Service is not configured; call /set_config first")]
    NotConfigured,

    #[error("{0}")]
    GatewayTimeout(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(e: OrchestratorError) -> Self {
        match &e {
            OrchestratorError::InvalidSender(_) => ApiError::BadRequest(e.to_string()),
            OrchestratorError::NoResultsFound { .. } => {
                ApiError::NotFound("No smart contract results found".to_string())
            }
            OrchestratorError::FinalityTimeout { .. } => ApiError::GatewayTimeout(e.to_string()),
            OrchestratorError::FetchFailed { .. }
            | OrchestratorError::Ledger(LedgerError::RemoteUnavailable(_))
            | OrchestratorError::Ledger(LedgerError::Rejected(_))
            | OrchestratorError::Ledger(LedgerError::InvalidResponse(_)) => {
                ApiError::BadGateway(e.to_string())
            }
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub message: String,
    pub tx_hash: String,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Serialize)]
pub struct OperationsResponse {
    pub operations: Vec<Operation>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub tx_hash: String,
    pub correct_answers: String,
}

#[derive(Debug, Serialize)]
pub struct CorrectAnswersResponse {
    pub tx_hash: String,
    pub correct_answers: String,
}

#[derive(Debug, Serialize)]
pub struct TestResultsResponse {
    pub test_results: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub configured: bool,
}
