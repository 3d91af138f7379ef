//! Counting of correct answers in `submit_test` feedback.
//!
//! Each graded answer is returned as a 12-byte slot holding either
//! `"Correct"` or `"Incorrect"`, zero padded. Counting is a plain
//! non-overlapping substring scan over the hex text, not an aligned slot
//! walk, so it matches the historical counts.

/// `"Correct"` followed by five zero bytes.
pub const SUCCESS_MARKER: [u8; 12] = *b"Correct\0\0\0\0\0";

/// Hex form of [`SUCCESS_MARKER`] as it appears in gateway result data.
pub const SUCCESS_MARKER_HEX: &str = "436f72726563740000000000";

/// Count non-overlapping success markers across all payloads.
pub fn count_success_markers<I, S>(payloads: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    payloads
        .into_iter()
        .map(|payload| payload.as_ref().matches(SUCCESS_MARKER_HEX).count())
        .sum()
}
