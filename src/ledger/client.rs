//! Ledger gateway client with timeout and error handling.
//!
//! # Responsibilities
//! - Query account nonces
//! - Broadcast signed transactions
//! - Query transaction status and records with results
//! - Map every non-success response to one uniform failure

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::ledger::transaction::Transaction;
use crate::ledger::types::{
    AccountData, GatewayResponse, LedgerError, LedgerResult, SendData, StatusData,
    TransactionData, TransactionRecord, TransactionStatus,
};
use crate::observability::metrics;

/// Remote ledger boundary used by the submission pipeline.
///
/// Every call is a single request; nothing is retried.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Current nonce of `address`.
    async fn account_nonce(&self, address: &str) -> LedgerResult<u64>;

    /// Broadcast a signed transaction and return its hash.
    async fn send_transaction(&self, tx: &Transaction) -> LedgerResult<String>;

    /// Execution status of a transaction.
    async fn transaction_status(&self, tx_hash: &str) -> LedgerResult<TransactionStatus>;

    /// A transaction record including its contract results.
    async fn fetch_transaction(&self, tx_hash: &str) -> LedgerResult<TransactionRecord>;
}

/// HTTP client for a MultiversX-style gateway.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: url::Url,
    timeout_secs: u64,
}

impl GatewayClient {
    /// Create a new gateway client.
    ///
    /// # Arguments
    /// * `config` - Gateway configuration
    ///
    /// # Returns
    /// A new client or error if the URL or HTTP client is invalid
    pub fn new(config: &GatewayConfig) -> LedgerResult<Self> {
        let base_url: url::Url = config.url.parse().map_err(|e| {
            LedgerError::RemoteUnavailable(format!("Invalid gateway URL '{}': {}", config.url, e))
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LedgerError::RemoteUnavailable(format!("HTTP client error: {}", e)))?;

        tracing::info!(
            gateway_url = %base_url,
            chain_id = %config.chain_id,
            "Gateway client initialized"
        );

        Ok(Self {
            http,
            base_url,
            timeout_secs: config.request_timeout_secs,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Decode a gateway envelope, treating any non-2xx status as unavailable.
    async fn read<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        sent: Result<Response, reqwest::Error>,
    ) -> LedgerResult<T> {
        let result: LedgerResult<T> = async {
            let response = sent.map_err(|e| {
                if e.is_timeout() {
                    LedgerError::RemoteUnavailable(format!("timed out after {}s", self.timeout_secs))
                } else {
                    LedgerError::RemoteUnavailable(e.to_string())
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(LedgerError::RemoteUnavailable(format!(
                    "{} returned status {}",
                    operation, status
                )));
            }

            let envelope: GatewayResponse<T> = response
                .json()
                .await
                .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;
            envelope.into_data()
        }
        .await;

        metrics::record_gateway_call(operation, result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(operation, error = %e, "Gateway call failed");
        }
        result
    }
}

#[async_trait]
impl Gateway for GatewayClient {
    async fn account_nonce(&self, address: &str) -> LedgerResult<u64> {
        let sent = self.http.get(self.endpoint(&format!("address/{}", address))).send().await;
        let data: AccountData = self.read("account", sent).await?;
        Ok(data.account.nonce)
    }

    async fn send_transaction(&self, tx: &Transaction) -> LedgerResult<String> {
        let sent = self.http.post(self.endpoint("transaction/send")).json(tx).send().await;
        let data: SendData = self.read("send", sent).await?;
        tracing::debug!(tx_hash = %data.tx_hash, nonce = tx.nonce, "Transaction accepted");
        Ok(data.tx_hash)
    }

    async fn transaction_status(&self, tx_hash: &str) -> LedgerResult<TransactionStatus> {
        let sent = self
            .http
            .get(self.endpoint(&format!("transaction/{}/status", tx_hash)))
            .send()
            .await;
        let data: StatusData = self.read("status", sent).await?;
        Ok(TransactionStatus::from_gateway(&data.status))
    }

    async fn fetch_transaction(&self, tx_hash: &str) -> LedgerResult<TransactionRecord> {
        let sent = self
            .http
            .get(self.endpoint(&format!("transaction/{}", tx_hash)))
            .query(&[("withResults", "true")])
            .send()
            .await;
        let data: TransactionData = self.read("fetch", sent).await?;
        Ok(data.transaction)
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(url: &str) -> GatewayConfig {
        GatewayConfig {
            url: url.to_string(),
            request_timeout_secs: 2,
            ..GatewayConfig::default()
        }
    }

    #[test]
    fn test_client_creation() {
        assert!(GatewayClient::new(&test_config("http://localhost:7950")).is_ok());
        assert!(GatewayClient::new(&test_config("not a url")).is_err());
    }

    #[test]
    fn test_endpoint_join() {
        let client = GatewayClient::new(&test_config("http://localhost:7950/")).unwrap();
        assert_eq!(client.endpoint("transaction/send"), "http://localhost:7950/transaction/send");
    }

    #[tokio::test]
    async fn test_unreachable_gateway() {
        // Port 9 (discard) is not expected to serve HTTP
        let client = GatewayClient::new(&test_config("http://127.0.0.1:9")).unwrap();
        let result = client.fetch_transaction("abc").await;
        assert!(matches!(result, Err(LedgerError::RemoteUnavailable(_))));
    }
}
