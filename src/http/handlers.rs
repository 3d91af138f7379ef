//! API route handlers.
//!
//! Each public handler extracts its input, delegates to a private function
//! returning `Result<_, ApiError>`, then logs and records the outcome in
//! `finish`.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::codec::{AnswerSet, Operation, ANSWERS_PER_TEST};
use crate::http::request::request_id;
use crate::http::response::{
    ApiError, CorrectAnswersResponse, GenerateResponse, HealthResponse, MessageResponse,
    OperationsResponse, SubmitResponse, TestResultsResponse,
};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::orchestrator::{SessionConfig, SubmissionResult};

#[derive(Debug, Deserialize)]
pub struct SetConfigRequest {
    pub contract_address: String,
    pub wallet_pem: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub sender_address: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitTestRequest {
    pub sender_address: String,
    pub answers: AnswerSet,
}

/// Fields are optional so a missing one maps to a 400 with a clear message.
#[derive(Debug, Default, Deserialize)]
pub struct TestResultsRequest {
    pub contract_address: Option<String>,
    pub user_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TxHashQuery {
    pub tx_hash: Option<String>,
}

pub async fn set_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SetConfigRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = configure(&state, payload);
    finish("set_config", &headers, start, result)
}

pub async fn generate_and_get_operations(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = generate(&state, payload).await;
    finish("generate_and_get_operations", &headers, start, result)
}

pub async fn get_operations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TxHashQuery>,
) -> Response {
    let start = Instant::now();
    let result = operations(&state, query).await;
    finish("get_operations", &headers, start, result)
}

pub async fn submit_test(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SubmitTestRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = submit(&state, payload).await;
    finish("submit_test", &headers, start, result)
}

pub async fn get_correct_answers(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TxHashQuery>,
) -> Response {
    let start = Instant::now();
    let result = correct_answers(&state, &headers, query).await;
    finish("get_correct_answers", &headers, start, result)
}

pub async fn get_test_results(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<TestResultsRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = test_results(&state, payload).await;
    finish("get_test_results", &headers, start, result)
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        configured: state.session.load().is_some(),
    })
}

fn configure(
    state: &AppState,
    payload: Result<Json<SetConfigRequest>, JsonRejection>,
) -> Result<MessageResponse, ApiError> {
    let request = json_body(payload)?;
    let session = SessionConfig::configure(
        &request.contract_address,
        &request.wallet_pem,
        &state.config.gateway.address_hrp,
    )?;
    state.session.store(Some(Arc::new(session)));

    Ok(MessageResponse {
        message: "Configuration set successfully.".to_string(),
    })
}

async fn generate(
    state: &AppState,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<GenerateResponse, ApiError> {
    let request = json_body(payload)?;
    let session = state.session()?;
    let result = state
        .orchestrator
        .generate(&session, &request.sender_address)
        .await?;

    let operations = generated_operations(&result)?;
    Ok(GenerateResponse {
        message: "Test generated and operations fetched successfully".to_string(),
        tx_hash: result.transaction_id,
        operations,
    })
}

fn generated_operations(result: &SubmissionResult) -> Result<Vec<Operation>, ApiError> {
    result.operations().map(<[Operation]>::to_vec).ok_or_else(|| {
        ApiError::Internal(format!(
            "Transaction {} decoded as a correct count, expected operations",
            result.transaction_id
        ))
    })
}

async fn operations(state: &AppState, query: TxHashQuery) -> Result<OperationsResponse, ApiError> {
    let tx_hash = required_tx_hash(query)?;
    let operations = state.orchestrator.fetch_operations(&tx_hash).await?;
    Ok(OperationsResponse { operations })
}

async fn submit(
    state: &AppState,
    payload: Result<Json<SubmitTestRequest>, JsonRejection>,
) -> Result<SubmitResponse, ApiError> {
    let request = json_body(payload)?;
    let session = state.session()?;
    let result = state
        .orchestrator
        .submit_answers(&session, &request.sender_address, request.answers)
        .await?;

    let count = result.correct_count().unwrap_or(0);
    Ok(SubmitResponse {
        message: "Test submitted successfully".to_string(),
        tx_hash: result.transaction_id,
        correct_answers: format!("{count}/{ANSWERS_PER_TEST} correct answers"),
    })
}

async fn correct_answers(
    state: &AppState,
    headers: &HeaderMap,
    query: TxHashQuery,
) -> Result<CorrectAnswersResponse, ApiError> {
    let tx_hash = required_tx_hash(query)?;

    let count = match state.orchestrator.correct_count(&tx_hash).await {
        Ok(count) => count,
        Err(e) if state.config.scoring.lenient_correct_count => {
            tracing::warn!(
                request_id = %request_id(headers),
                tx_hash = %tx_hash,
                error = %e,
                "Counting correct answers failed, reporting 0"
            );
            0
        }
        Err(e) => return Err(e.into()),
    };

    Ok(CorrectAnswersResponse {
        tx_hash,
        correct_answers: format!("{count}/{ANSWERS_PER_TEST} correct answers"),
    })
}

async fn test_results(
    state: &AppState,
    payload: Result<Json<TestResultsRequest>, JsonRejection>,
) -> Result<TestResultsResponse, ApiError> {
    let request = json_body(payload)?;
    let (contract, user) = match (request.contract_address, request.user_address) {
        (Some(contract), Some(user)) if !contract.is_empty() && !user.is_empty() => (contract, user),
        _ => {
            return Err(ApiError::BadRequest(
                "Missing contract_address or user_address".to_string(),
            ))
        }
    };

    let test_results = state.score_query.final_score(&contract, &user).await?;
    Ok(TestResultsResponse { test_results })
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn required_tx_hash(query: TxHashQuery) -> Result<String, ApiError> {
    query
        .tx_hash
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing 'tx_hash' parameter".to_string()))
}

fn finish<T: Serialize>(
    route: &'static str,
    headers: &HeaderMap,
    start: Instant,
    result: Result<T, ApiError>,
) -> Response {
    let response = match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                tracing::error!(request_id = %request_id(headers), route, status = status.as_u16(), error = %e, "Request failed");
            } else {
                tracing::warn!(request_id = %request_id(headers), route, status = status.as_u16(), error = %e, "Request rejected");
            }
            e.into_response()
        }
    };

    tracing::debug!(
        request_id = %request_id(headers),
        route,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );
    metrics::record_request(route, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::Decoded;

    #[test]
    fn test_required_tx_hash() {
        let present = TxHashQuery {
            tx_hash: Some(" abc ".to_string()),
        };
        assert_eq!(required_tx_hash(present).unwrap(), "abc");

        for missing in [None, Some(String::new()), Some("  ".to_string())] {
            let err = required_tx_hash(TxHashQuery { tx_hash: missing }).unwrap_err();
            assert_eq!(err.to_string(), "Missing 'tx_hash' parameter");
        }
    }

    #[test]
    fn test_generated_operations_rejects_correct_count() {
        let ops = crate::codec::decode_operations("07202b200300").unwrap();
        let generated = SubmissionResult {
            transaction_id: "tx1".to_string(),
            raw_payload: "07202b200300".to_string(),
            decoded: Decoded::Operations(ops.clone()),
        };
        assert_eq!(generated_operations(&generated).unwrap(), ops);

        let counted = SubmissionResult {
            transaction_id: "tx2".to_string(),
            raw_payload: "6f6b".to_string(),
            decoded: Decoded::CorrectCount(3),
        };
        let err = generated_operations(&counted).unwrap_err();
        assert!(matches!(err, ApiError::Internal(ref msg) if msg.contains("tx2")));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_submit_request_requires_five_answers() {
        let ok: SubmitTestRequest =
            serde_json::from_str(r#"{"sender_address":"a","answers":[1,2,3,4,-5]}"#).unwrap();
        assert_eq!(ok.answers.as_slice(), &[1, 2, 3, 4, -5]);

        assert!(serde_json::from_str::<SubmitTestRequest>(r#"{"sender_address":"a","answers":[1,2]}"#).is_err());
        assert!(serde_json::from_str::<SubmitTestRequest>(r#"{"sender_address":"a","answers":[1,2,3,4,200]}"#).is_err());
    }
}
