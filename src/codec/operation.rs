//! Decoding of generated arithmetic problems.
//!
//! The contract returns five 6-byte records laid out as
//! `[operand1, ' ', operator, ' ', operand2, 0]`. Only offsets 0, 2 and 4
//! carry information; the remaining bytes are padding.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Length of one encoded operation in bytes.
pub const RECORD_LEN: usize = 6;

/// Length of one encoded operation in hex characters.
const RECORD_HEX_LEN: usize = RECORD_LEN * 2;

/// Errors raised while decoding operation payloads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// An operand or operator field is not valid hex.
    #[error("Invalid hex in operation payload: {0}")]
    InvalidHex(String),
}

/// Arithmetic operator carried in byte 2 of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Times,
    Divide,
    /// Any byte that is not one of `+ - * /`.
    Unknown,
}

impl Operator {
    /// Map an ASCII byte to an operator. Never fails.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'+' => Operator::Plus,
            b'-' => Operator::Minus,
            b'*' => Operator::Times,
            b'/' => Operator::Divide,
            _ => Operator::Unknown,
        }
    }

    /// Display symbol; `"unknown"` for unmapped bytes.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Times => "*",
            Operator::Divide => "/",
            Operator::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One decoded arithmetic problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    operand1: u8,
    operator: Operator,
    operand2: u8,
    raw: [u8; RECORD_LEN],
}

impl Operation {
    fn from_record(raw: [u8; RECORD_LEN]) -> Self {
        Self {
            operand1: raw[0],
            operator: Operator::from_byte(raw[2]),
            operand2: raw[4],
            raw,
        }
    }

    pub fn operand1(&self) -> u8 {
        self.operand1
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand2(&self) -> u8 {
        self.operand2
    }

    /// The undecoded 6-byte record.
    pub fn raw_record(&self) -> &[u8; RECORD_LEN] {
        &self.raw
    }

    /// The record as 12 lowercase hex characters.
    pub fn hex_segment(&self) -> String {
        hex::encode(self.raw)
    }

    /// Human-readable form, e.g. `"7 * 3"`.
    pub fn expression(&self) -> String {
        format!("{} {} {}", self.operand1, self.operator, self.operand2)
    }

    /// The answer the contract grades against.
    ///
    /// The contract copies a stored record only up to its first zero byte,
    /// so every byte from there on reads as 0. Operands are then
    /// reinterpreted as `i8` and combined with wrapping arithmetic.
    /// Division by zero and unknown operators yield 0.
    pub fn expected_answer(&self) -> i8 {
        let len = self.raw.iter().position(|&b| b == 0).unwrap_or(RECORD_LEN);
        let mut record = [0u8; RECORD_LEN];
        record[..len].copy_from_slice(&self.raw[..len]);

        let left = record[0] as i8;
        let right = record[4] as i8;
        match Operator::from_byte(record[2]) {
            Operator::Plus => left.wrapping_add(right),
            Operator::Minus => left.wrapping_sub(right),
            Operator::Times => left.wrapping_mul(right),
            Operator::Divide => {
                if right == 0 {
                    0
                } else {
                    left.wrapping_div(right)
                }
            }
            Operator::Unknown => 0,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.operand1, self.operator, self.operand2)
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Operation", 5)?;
        state.serialize_field("hex_segment", &self.hex_segment())?;
        state.serialize_field("operand1", &self.operand1)?;
        state.serialize_field("operator", self.operator.symbol())?;
        state.serialize_field("operand2", &self.operand2)?;
        state.serialize_field("operation", &self.expression())?;
        state.end()
    }
}

/// Decode raw bytes into operations, dropping a trailing partial record.
pub fn decode_records(bytes: &[u8]) -> Vec<Operation> {
    bytes
        .chunks_exact(RECORD_LEN)
        .map(|chunk| {
            let mut raw = [0u8; RECORD_LEN];
            raw.copy_from_slice(chunk);
            Operation::from_record(raw)
        })
        .collect()
}

/// Decode a hex payload into operations.
///
/// Characters past the last full 12-character record are treated as
/// padding and ignored, so odd-length payloads are accepted. Only the
/// operand and operator fields must be hex; a padding byte that is not
/// reads as a space.
pub fn decode_operations(hex_payload: &str) -> Result<Vec<Operation>, DecodeError> {
    hex_payload
        .as_bytes()
        .chunks_exact(RECORD_HEX_LEN)
        .map(decode_hex_record)
        .collect()
}

fn decode_hex_record(chunk: &[u8]) -> Result<Operation, DecodeError> {
    let mut raw = [b' '; RECORD_LEN];
    for (i, (byte, pair)) in raw.iter_mut().zip(chunk.chunks_exact(2)).enumerate() {
        match hex_byte(pair) {
            Some(value) => *byte = value,
            // odd offsets are padding
            None if i % 2 == 1 => {}
            None => {
                return Err(DecodeError::InvalidHex(
                    String::from_utf8_lossy(chunk).into_owned(),
                ))
            }
        }
    }
    Ok(Operation::from_record(raw))
}

fn hex_byte(pair: &[u8]) -> Option<u8> {
    let high = char::from(pair[0]).to_digit(16)?;
    let low = char::from(pair[1]).to_digit(16)?;
    u8::try_from(high * 16 + low).ok()
}
