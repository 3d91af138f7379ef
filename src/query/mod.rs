//! Final score lookup through the contract-query command-line tool.
//!
//! # Data Flow
//! ```text
//! /get_test_results (contract, user)
//!     → command.rs (spawn `<tool> contract query ...`, capture output)
//!     → parse_score_output (strip brackets/quotes, parse hex)
//!     → integer score
//! ```

pub mod command;

use thiserror::Error;

pub use command::{parse_score_output, ScoreQuery};

/// Errors from the query tool path.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The tool could not be started.
    #[error("Failed to run query tool: {0}")]
    Spawn(#[from] std::io::Error),

    /// The tool exited unsuccessfully.
    #[error("Command failed: {stderr}")]
    SubprocessFailure { code: Option<i32>, stderr: String },

    /// The tool's output is not a hexadecimal scalar.
    #[error("Failed to parse hex value: {value}, error: {reason}")]
    ParseFailure { value: String, reason: String },
}
