//! Fixed-width payload codecs shared with the quiz contract.
//!
//! # Data Flow
//! ```text
//! generate_test result data  "@6f6b@<records>"
//!     → operation.rs (6-byte records → Operation list)
//!
//! answers [i8; 5]
//!     → answer.rs (two's complement bytes + "00" terminator)
//!     → submit_test@<hex> call data
//!
//! submit_test result data    "@6f6b@<feedback>"
//!     → scanner.rs (count "Correct" markers)
//! ```
//!
//! # Design Decisions
//! - Byte layouts are dictated by the deployed contract and are bit-exact
//! - Codecs degrade instead of failing: unknown operators and short
//!   trailing records are not errors
//! - Payloads travel as hex text, the way the gateway reports them

pub mod answer;
pub mod operation;
pub mod scanner;

pub use answer::{encode_answers, AnswerCountError, AnswerSet, ANSWERS_PER_TEST};
pub use operation::{decode_operations, decode_records, DecodeError, Operation, Operator, RECORD_LEN};
pub use scanner::{count_success_markers, SUCCESS_MARKER, SUCCESS_MARKER_HEX};

/// Strip everything up to and including the last `@` separator.
///
/// The gateway renders contract results as `@`-delimited hex segments; the
/// returned value is always the final one. Data without a separator is
/// returned unchanged.
pub fn last_segment(data: &str) -> &str {
    match data.rfind('@') {
        Some(idx) => &data[idx + 1..],
        None => data,
    }
}
