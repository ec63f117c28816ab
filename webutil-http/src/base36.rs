//! Base-36 conversion for non-negative integers (digits `0-9a-z`).

use thiserror::Error;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `i64::MAX` is `1y2p0ij32e8e7`, so nothing longer can fit.
pub const MAX_BASE36_DIGITS: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base36Error {
    #[error("negative base36 conversion input: {0}")]
    Negative(i64),
    #[error("empty base36 input")]
    Empty,
    #[error("invalid base36 digit {ch:?} at offset {offset}")]
    InvalidDigit { ch: char, offset: usize },
    #[error("base36 input too large")]
    TooLarge,
}

pub type Base36Result<T> = Result<T, Base36Error>;

/// Encode a non-negative integer as lowercase base 36.
pub fn int_to_base36(n: i64) -> Base36Result<String> {
    if n < 0 {
        return Err(Base36Error::Negative(n));
    }
    if n == 0 {
        return Ok("0".to_string());
    }

    let mut rest = n as u64;
    let mut buf = Vec::with_capacity(MAX_BASE36_DIGITS);
    while rest > 0 {
        buf.push(DIGITS[(rest % 36) as usize]);
        rest /= 36;
    }
    buf.reverse();
    // only ASCII digits were pushed
    Ok(buf.into_iter().map(char::from).collect())
}

/// Decode a base-36 string (case-insensitive) into an integer.
pub fn base36_to_int(s: &str) -> Base36Result<i64> {
    if s.is_empty() {
        return Err(Base36Error::Empty);
    }

    let mut value: i64 = 0;
    for (offset, ch) in s.chars().enumerate() {
        let digit = ch.to_digit(36).ok_or(Base36Error::InvalidDigit { ch, offset })?;
        if offset >= MAX_BASE36_DIGITS {
            return Err(Base36Error::TooLarge);
        }
        value = value
            .checked_mul(36)
            .and_then(|v| v.checked_add(i64::from(digit)))
            .ok_or(Base36Error::TooLarge)?;
    }
    Ok(value)
}
