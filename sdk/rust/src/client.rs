//! Typed client for the math quiz relay API.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// One decoded arithmetic operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub hex_segment: String,
    pub operand1: u8,
    pub operator: String,
    pub operand2: u8,
    pub operation: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub message: String,
    pub tx_hash: String,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Deserialize)]
pub struct OperationsResponse {
    pub operations: Vec<Operation>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub message: String,
    pub tx_hash: String,
    /// `"N/5 correct answers"`
    pub correct_answers: String,
}

#[derive(Debug, Deserialize)]
pub struct CorrectAnswersResponse {
    pub tx_hash: String,
    pub correct_answers: String,
}

#[derive(Debug, Deserialize)]
pub struct TestResultsResponse {
    pub test_results: u64,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub configured: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Errors returned by [`QuizClient`].
#[derive(Debug)]
pub enum SdkError {
    /// The request could not be sent or the body could not be read.
    Http(reqwest::Error),
    /// The relay answered with a non-success status.
    Api { status: StatusCode, message: String },
}

impl std::fmt::Display for SdkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SdkError::Http(e) => write!(f, "HTTP error: {}", e),
            SdkError::Api { status, message } => write!(f, "Relay returned {}: {}", status, message),
        }
    }
}

impl std::error::Error for SdkError {}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        SdkError::Http(e)
    }
}

impl SdkError {
    /// HTTP status for API errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            SdkError::Http(_) => None,
        }
    }
}

pub struct QuizClient {
    client: Client,
    relay_url: String,
}

impl QuizClient {
    pub fn new(relay_url: &str) -> Self {
        Self {
            client: Client::new(),
            relay_url: relay_url.trim_end_matches('/').to_string(),
        }
    }

    /// Set the contract and the signing wallet used for every submission.
    pub async fn set_config(&self, contract_address: &str, wallet_pem: &str) -> Result<MessageResponse, SdkError> {
        let body = json!({ "contract_address": contract_address, "wallet_pem": wallet_pem });
        self.post("/set_config", &body).await
    }

    /// Generate a new test and return its operations.
    pub async fn generate(&self, sender_address: &str) -> Result<GenerateResponse, SdkError> {
        let body = json!({ "sender_address": sender_address });
        self.post("/generate_and_get_operations", &body).await
    }

    /// Operations of an earlier generate transaction.
    pub async fn operations(&self, tx_hash: &str) -> Result<OperationsResponse, SdkError> {
        self.get("/get_operations", tx_hash).await
    }

    pub async fn submit_test(&self, sender_address: &str, answers: &[i8]) -> Result<SubmitResponse, SdkError> {
        let body = json!({ "sender_address": sender_address, "answers": answers });
        self.post("/submit_test", &body).await
    }

    pub async fn correct_answers(&self, tx_hash: &str) -> Result<CorrectAnswersResponse, SdkError> {
        self.get("/get_correct_answers", tx_hash).await
    }

    /// Accumulated score of `user_address` on `contract_address`.
    pub async fn test_results(&self, contract_address: &str, user_address: &str) -> Result<TestResultsResponse, SdkError> {
        let body = json!({ "contract_address": contract_address, "user_address": user_address });
        self.post("/get_test_results", &body).await
    }

    pub async fn health(&self) -> Result<HealthResponse, SdkError> {
        let resp = self.client.get(format!("{}/health", self.relay_url)).send().await?;
        read(resp).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &serde_json::Value) -> Result<T, SdkError> {
        let resp = self
            .client
            .post(format!("{}{}", self.relay_url, path))
            .json(body)
            .send()
            .await?;
        read(resp).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, tx_hash: &str) -> Result<T, SdkError> {
        let resp = self
            .client
            .get(format!("{}{}", self.relay_url, path))
            .query(&[("tx_hash", tx_hash)])
            .send()
            .await?;
        read(resp).await
    }
}

async fn read<T: DeserializeOwned>(resp: Response) -> Result<T, SdkError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let text = resp.text().await?;
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) => text,
    };
    Err(SdkError::Api { status, message })
}
