//! Submission orchestration subsystem.
//!
//! # State Machine
//! ```text
//! Unconfigured ──/set_config──▶ Ready          (SessionConfig exists)
//! Ready ──generate | submit──▶ Submitting      (nonce, build, sign, send)
//! Submitting ──tx hash──▶ AwaitingFinality     (one FinalityWait call)
//! AwaitingFinality ──▶ Fetching                (record with results)
//! Fetching ──results──▶ Decoded
//! Fetching ──no results | gateway error──▶ Failed
//! ```
//!
//! # Design Decisions
//! - `Unconfigured` is the absence of a `SessionConfig`: submission methods
//!   take `&SessionConfig`, so they cannot run before configuration
//! - Each call makes one pass through the machine; nothing is retried
//! - Counting correct answers returns a `Result`; whether failures read as
//!   zero is decided by the caller

pub mod finality;
pub mod pipeline;
pub mod session;

use std::fmt;
use thiserror::Error;

use crate::codec::DecodeError;
use crate::ledger::types::LedgerError;

pub use finality::{FinalityWait, FixedDelay, StatusPoll};
pub use pipeline::{Decoded, RequestKind, SubmissionOrchestrator, SubmissionResult};
pub use session::{SessionConfig, SessionError};

/// Stages of one submission, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Submitting,
    AwaitingFinality,
    Fetching,
    Decoded,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Submitting => "submitting",
            Stage::AwaitingFinality => "awaiting_finality",
            Stage::Fetching => "fetching",
            Stage::Decoded => "decoded",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Errors that end a pass through the pipeline.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Sender is not a well-formed account address.
    #[error("Invalid sender address '{0}'")]
    InvalidSender(String),

    /// Gateway or signing failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The transaction record could not be fetched.
    #[error("Failed to fetch transaction {tx_hash}: {source}")]
    FetchFailed {
        tx_hash: String,
        #[source]
        source: LedgerError,
    },

    /// The transaction record carries no execution results.
    #[error("No smart contract results found for transaction {tx_hash}")]
    NoResultsFound { tx_hash: String },

    /// The transaction did not become final within the budget.
    #[error("Transaction {tx_hash} not final after {attempts} status checks ({budget_secs}s budget)")]
    FinalityTimeout {
        tx_hash: String,
        attempts: u32,
        budget_secs: u64,
    },

    /// The gateway reported the transaction as failed.
    #[error("Transaction {tx_hash} failed with status '{status}'")]
    TransactionFailed { tx_hash: String, status: String },

    /// The result payload is not hex.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Result type for orchestration.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
