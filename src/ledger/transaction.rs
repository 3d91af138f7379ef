//! Transaction building and signing.
//!
//! # Responsibilities
//! - Build contract-call transactions with configured gas and chain ID
//! - Produce the canonical bytes the signer signs
//! - Attach the hex signature

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::codec::AnswerSet;
use crate::config::GatewayConfig;
use crate::ledger::types::{LedgerError, LedgerResult};
use crate::ledger::wallet::TransactionSigner;

/// The two contract endpoints the relay invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractCall {
    /// `generate_test()`, no arguments.
    GenerateTest,
    /// `submit_test(answers)` with the encoded answers as its only argument.
    SubmitTest(AnswerSet),
}

impl ContractCall {
    pub fn function(&self) -> &'static str {
        match self {
            ContractCall::GenerateTest => "generate_test",
            ContractCall::SubmitTest(_) => "submit_test",
        }
    }

    /// Call data: the function name followed by `@`-separated hex arguments.
    pub fn data(&self) -> String {
        match self {
            ContractCall::GenerateTest => self.function().to_string(),
            ContractCall::SubmitTest(answers) => {
                format!("{}@{}", self.function(), answers.to_hex())
            }
        }
    }
}

/// A ledger transaction in the gateway's JSON form.
///
/// Field order is significant: serializing without a signature yields the
/// canonical signing bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub nonce: u64,
    pub value: String,
    pub receiver: String,
    pub sender: String,
    pub gas_price: u64,
    pub gas_limit: u64,
    /// Base64 call data; omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<String>,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub version: u32,
    /// Hex signature; absent while signing.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signature: Option<String>,
}

impl Transaction {
    /// Bytes covered by the signature.
    pub fn signing_bytes(&self) -> LedgerResult<Vec<u8>> {
        let unsigned = Transaction {
            signature: None,
            ..self.clone()
        };
        serde_json::to_vec(&unsigned)
            .map_err(|e| LedgerError::Wallet(format!("Cannot serialize transaction: {}", e)))
    }

    /// Decoded call data, if any.
    pub fn call_data(&self) -> Option<String> {
        self.data
            .as_deref()
            .and_then(|d| STANDARD.decode(d).ok())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Transaction builder for contract calls.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    chain_id: String,
    gas_limit: u64,
    gas_price: u64,
    version: u32,
}

impl TxBuilder {
    /// Create a builder from gateway settings.
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            chain_id: config.chain_id.clone(),
            gas_limit: config.gas_limit,
            gas_price: config.gas_price,
            version: config.tx_version,
        }
    }

    /// Build an unsigned contract call.
    ///
    /// # Arguments
    /// * `sender` - Account paying for the call
    /// * `contract` - Contract address
    /// * `nonce` - Sender's current account nonce
    /// * `call` - Endpoint and arguments
    pub fn build(&self, sender: &str, contract: &str, nonce: u64, call: &ContractCall) -> Transaction {
        let data = call.data();
        Transaction {
            nonce,
            value: "0".to_string(),
            receiver: contract.to_string(),
            sender: sender.to_string(),
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            data: (!data.is_empty()).then(|| STANDARD.encode(data)),
            chain_id: self.chain_id.clone(),
            version: self.version,
            signature: None,
        }
    }

    /// Sign the canonical bytes and attach the signature.
    pub fn sign(&self, mut tx: Transaction, signer: &dyn TransactionSigner) -> LedgerResult<Transaction> {
        let bytes = tx.signing_bytes()?;
        let signature = signer.sign(&bytes)?;
        tx.signature = Some(hex::encode(signature));
        Ok(tx)
    }
}
