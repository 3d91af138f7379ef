//! Runtime session: which contract to call and who signs.

use thiserror::Error;

use crate::ledger::types::{validate_address, LedgerError};
use crate::ledger::wallet::{TransactionSigner, Wallet};

/// Invalid configure request.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid contract address: {0}")]
    InvalidContract(String),

    #[error(transparent)]
    Wallet(#[from] LedgerError),
}

/// Contract and signing identity used by every submission.
///
/// Built once per configure request and then only read. Holders share it
/// behind an `Arc`; replacing it never mutates a snapshot already in use.
#[derive(Debug)]
pub struct SessionConfig {
    contract_address: String,
    wallet: Wallet,
}

impl SessionConfig {
    /// Validate the contract address and load the wallet PEM.
    pub fn configure(contract_address: &str, wallet_pem: &str, hrp: &str) -> Result<Self, SessionError> {
        let contract_address = contract_address.trim();
        validate_address(contract_address, hrp)
            .map_err(|_| SessionError::InvalidContract(contract_address.to_string()))?;

        let wallet = Wallet::from_pem(wallet_pem)?;

        tracing::info!(
            contract = %contract_address,
            signer = %wallet.address(),
            "Session configured"
        );

        Ok(Self {
            contract_address: contract_address.to_string(),
            wallet,
        })
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    pub fn signer(&self) -> &dyn TransactionSigner {
        &self.wallet
    }
}
