//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! /set_config (contract address, wallet PEM)
//!     → wallet.rs (key loading, signing)
//!     → transaction.rs (build contract call, canonical bytes, signature)
//!     → client.rs (gateway HTTP calls with timeouts)
//! ```
//!
//! # Security Constraints
//! - Wallet keys only arrive through the configure request
//! - Never log private keys or PEM contents
//! - All gateway calls have configurable timeouts
//! - Any non-success gateway status is one uniform failure

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{Gateway, GatewayClient};
pub use transaction::{ContractCall, Transaction, TxBuilder};
pub use types::{validate_address, LedgerError, LedgerResult, TransactionRecord, TransactionStatus};
pub use wallet::{TransactionSigner, Wallet};
