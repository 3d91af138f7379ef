//! Gateway wire types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters allowed in the data part of a bech32 address.
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Length of a bech32 account address for a 32-byte public key.
const ADDRESS_LEN: usize = 62;

/// Errors that can occur while talking to the ledger gateway.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transport failure or non-success HTTP status.
    #[error("Gateway unavailable: {0}")]
    RemoteUnavailable(String),

    /// The gateway answered but refused the request.
    #[error("Gateway rejected request: {0}")]
    Rejected(String),

    /// The gateway answered with an unexpected body.
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),

    /// Address is not a well-formed bech32 account address.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    /// Key material could not be loaded or used.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Check the shape of a bech32 account address (`<hrp>1` + 58 data chars).
///
/// The checksum is not verified; the gateway rejects bad checksums.
pub fn validate_address(address: &str, hrp: &str) -> LedgerResult<()> {
    let data = address
        .strip_prefix(hrp)
        .and_then(|rest| rest.strip_prefix('1'))
        .ok_or_else(|| LedgerError::InvalidAddress(address.to_string()))?;

    if address.len() != ADDRESS_LEN || !data.chars().all(|c| BECH32_CHARSET.contains(c)) {
        return Err(LedgerError::InvalidAddress(address.to_string()));
    }
    Ok(())
}

/// Envelope wrapping every gateway response.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub code: String,
}

impl<T> GatewayResponse<T> {
    /// Unwrap the payload, turning a reported error into `Rejected`.
    pub fn into_data(self) -> LedgerResult<T> {
        if !self.error.is_empty() {
            return Err(LedgerError::Rejected(self.error));
        }
        self.data.ok_or_else(|| {
            LedgerError::InvalidResponse(format!("missing data (code '{}')", self.code))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountData {
    pub account: Account,
}

/// Account state as reported by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub address: String,
    pub nonce: u64,
    #[serde(default)]
    pub balance: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendData {
    pub tx_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusData {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionData {
    pub transaction: TransactionRecord,
}

/// A transaction with its execution results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub smart_contract_results: Vec<ContractResult>,
}

/// One execution-result entry of a contract call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractResult {
    /// `@`-delimited result data, e.g. `@6f6b@0a202b200300`.
    #[serde(default)]
    pub data: Option<String>,
}

impl ContractResult {
    pub fn data_or_empty(&self) -> &str {
        self.data.as_deref().unwrap_or("")
    }
}

/// Execution status of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Received but not yet executed everywhere.
    Pending,
    /// Executed successfully.
    Success,
    /// Executed with an error, or refused.
    Failed(String),
}

impl TransactionStatus {
    /// Interpret a gateway status string.
    pub fn from_gateway(status: &str) -> Self {
        match status {
            "success" | "executed" => TransactionStatus::Success,
            "fail" | "invalid" => TransactionStatus::Failed(status.to_string()),
            _ => TransactionStatus::Pending,
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}
