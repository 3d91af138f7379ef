//! Encoding of submitted answers.

use serde::{Deserialize, Serialize};
use std::fmt::Write;
use thiserror::Error;

/// Number of answers the contract expects per test.
pub const ANSWERS_PER_TEST: usize = 5;

/// Terminator byte appended after the answer bytes.
const TERMINATOR_HEX: &str = "00";

/// Wrong number of answers supplied for a test.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Expected {expected} answers, got {actual}")]
pub struct AnswerCountError {
    pub expected: usize,
    pub actual: usize,
}

/// Exactly five signed answers, one per generated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i8>", into = "Vec<i8>")]
pub struct AnswerSet([i8; ANSWERS_PER_TEST]);

impl AnswerSet {
    pub fn new(answers: [i8; ANSWERS_PER_TEST]) -> Self {
        Self(answers)
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.0
    }

    /// Hex payload for the `submit_test` argument.
    pub fn to_hex(&self) -> String {
        encode_answers(&self.0)
    }
}

impl TryFrom<Vec<i8>> for AnswerSet {
    type Error = AnswerCountError;

    fn try_from(answers: Vec<i8>) -> Result<Self, Self::Error> {
        let actual = answers.len();
        let array: [i8; ANSWERS_PER_TEST] = answers.try_into().map_err(|_| AnswerCountError {
            expected: ANSWERS_PER_TEST,
            actual,
        })?;
        Ok(Self(array))
    }
}

impl From<AnswerSet> for Vec<i8> {
    fn from(answers: AnswerSet) -> Self {
        answers.0.to_vec()
    }
}

/// Encode answers as two's complement bytes followed by a `00` terminator.
///
/// Accepts any number of answers; callers enforce the per-test count.
pub fn encode_answers(answers: &[i8]) -> String {
    let mut out = String::with_capacity(answers.len() * 2 + TERMINATOR_HEX.len());
    for answer in answers {
        // `as u8` is the single-byte two's complement (256 + value for negatives)
        let _ = write!(out, "{:02x}", *answer as u8);
    }
    out.push_str(TERMINATOR_HEX);
    out
}
