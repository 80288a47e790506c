//! Text encodings for persisted flag stores
//!
//! Pure parsing and formatting helpers with no I/O dependencies. A bounded
//! store persists as one unsigned integer (bit `b` is flag `b`), written as
//! decimal or `0x`-prefixed hex. Sparse and unbounded stores persist as an
//! ascending, de-duplicated list of set indices.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use num_bigint::BigUint;

use crate::error::{FlagError, Result};

/// Format an integer as lowercase hex with a `0x` prefix
pub fn format_hex(value: &BigUint) -> String {
    let mut text = String::from("0x");
    text.push_str(&value.to_str_radix(16));
    text
}

/// Format an integer as decimal text
pub fn format_decimal(value: &BigUint) -> String {
    value.to_str_radix(10)
}

/// Parse decimal text, or hex text prefixed with `0x` / `0X`
pub fn parse_integer(text: &str) -> Result<BigUint> {
    let text = text.trim();
    let (digits, radix) = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (text, 10),
    };

    // parse_bytes tolerates separators and signs we do not want in a record
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(FlagError::InvalidNumber);
    }

    BigUint::parse_bytes(digits.as_bytes(), radix).ok_or(FlagError::InvalidNumber)
}

/// Sort and de-duplicate a list of flag indices
pub fn normalize_indices(mut indices: Vec<usize>) -> Vec<usize> {
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Format flag indices as a comma-separated list, e.g. `1,5,70`
pub fn format_index_list(indices: &[usize]) -> String {
    let mut text = String::new();
    for (position, index) in indices.iter().enumerate() {
        if position > 0 {
            text.push(',');
        }
        // Writing into a String cannot fail
        let _ = write!(text, "{index}");
    }
    text
}

/// Parse a comma-separated list of flag indices
///
/// Whitespace around tokens is ignored and the result is sorted and
/// de-duplicated. An empty (or all-whitespace) string is the empty list.
pub fn parse_index_list(text: &str) -> Result<Vec<usize>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let indices = text
        .split(',')
        .map(|token| {
            let token = token.trim();
            if token.is_empty() || !token.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(FlagError::InvalidIndexList);
            }
            token.parse::<usize>().map_err(|_| FlagError::InvalidIndexList)
        })
        .collect::<Result<Vec<usize>>>()?;

    Ok(normalize_indices(indices))
}
