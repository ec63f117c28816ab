//! HTTP-date parsing (RFC 1123, RFC 850, asctime) and formatting.
//!
//! Parsing accepts all three legacy formats without being told which one is in
//! use; formatting always produces the RFC 1123 form.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::debug;

/// 9999-12-31 23:59:59 UTC, the last instant with a four-digit year.
pub const MAX_HTTP_DATE_SECS: u64 = 253_402_300_799;

const MONTHS: [&str; 12] = ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("{0:?} is not in a valid HTTP date format")]
    Unrecognized(String),
    #[error("{value:?} has an out-of-range {field}")]
    InvalidField { value: String, field: &'static str },
    #[error("{0} seconds is past the last representable HTTP date")]
    OutOfRange(u64),
}

pub type DateResult<T> = Result<T, DateError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateParts<'a> {
    year: Year,
    month: &'a [u8],
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Year {
    Full(i64),
    TwoDigit(i64),
}

/// Parse an HTTP date into seconds since the epoch (UTC).
/// Two-digit RFC 850 years are resolved against the current UTC year.
pub fn parse_http_date(value: &str) -> DateResult<i64> {
    parse_http_date_relative_to(value, current_year())
}

/// Like [`parse_http_date`], but resolves two-digit years around `current_year`:
/// a year more than 50 years past the current one is taken from the previous century.
pub fn parse_http_date_relative_to(value: &str, current_year: i64) -> DateResult<i64> {
    let bytes = value.as_bytes();
    let parts = parse_rfc1123(bytes)
        .or_else(|| parse_rfc850(bytes))
        .or_else(|| parse_asctime(bytes))
        .ok_or_else(|| DateError::Unrecognized(value.to_string()))?;

    let invalid = |field: &'static str| DateError::InvalidField { value: value.to_string(), field };

    let year = match parts.year {
        Year::Full(y) => y,
        Year::TwoDigit(yy) => {
            let cy = current_year.rem_euclid(100);
            let century = current_year - cy;
            if yy - cy > 50 { century - 100 + yy } else { century + yy }
        }
    };
    let month = MONTHS
        .iter()
        .position(|m| m.as_bytes().eq_ignore_ascii_case(parts.month))
        .ok_or_else(|| invalid("month"))? as u32
        + 1;
    if parts.day == 0 || parts.day > days_in_month(year, month) {
        return Err(invalid("day"));
    }
    if parts.hour > 23 {
        return Err(invalid("hour"));
    }
    if parts.minute > 59 {
        return Err(invalid("minute"));
    }
    if parts.second > 59 {
        return Err(invalid("second"));
    }

    let days = days_from_civil(year, month, parts.day);
    Ok(days * 86_400 + i64::from(parts.hour * 3_600 + parts.minute * 60 + parts.second))
}

/// Same as [`parse_http_date`] but returns `None` instead of an error.
pub fn parse_http_date_safe(value: &str) -> Option<i64> {
    match parse_http_date(value) {
        Ok(ts) => Some(ts),
        Err(e) => {
            debug!(target: "webutil_http", "ignoring unparseable http date: {e}");
            None
        }
    }
}

/// Format seconds since the epoch as an RFC 1123 date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
/// Anything after [`MAX_HTTP_DATE_SECS`] is [`DateError::OutOfRange`].
pub fn http_date(epoch_secs: u64) -> DateResult<String> {
    if epoch_secs > MAX_HTTP_DATE_SECS {
        return Err(DateError::OutOfRange(epoch_secs));
    }
    let when = UNIX_EPOCH
        .checked_add(Duration::from_secs(epoch_secs))
        .ok_or(DateError::OutOfRange(epoch_secs))?;
    Ok(httpdate::fmt_http_date(when))
}

pub fn http_date_now() -> String {
    httpdate::fmt_http_date(SystemTime::now())
}

/// Format seconds since the epoch in the Netscape cookie form, e.g. `Sun, 06-Nov-1994 08:49:37 GMT`.
pub fn cookie_date(epoch_secs: u64) -> DateResult<String> {
    let rfc = http_date(epoch_secs)?;
    Ok(format!("{}-{}-{}", &rfc[..7], &rfc[8..11], &rfc[12..]))
}

// "Sun, 06 Nov 1994 08:49:37 GMT"
fn parse_rfc1123(s: &[u8]) -> Option<DateParts<'_>> {
    let mut c = Cursor::new(s);
    c.word(3, 3)?;
    c.literal(b", ")?;
    let day = c.number(2)?;
    c.literal(b" ")?;
    let month = c.word(3, 3)?;
    c.literal(b" ")?;
    let year = c.number(4)?;
    c.literal(b" ")?;
    let (hour, minute, second) = c.time()?;
    c.literal(b" GMT")?;
    c.end()?;
    Some(DateParts { year: Year::Full(i64::from(year)), month, day, hour, minute, second })
}

// "Sunday, 06-Nov-94 08:49:37 GMT"
fn parse_rfc850(s: &[u8]) -> Option<DateParts<'_>> {
    let mut c = Cursor::new(s);
    c.word(6, 9)?;
    c.literal(b", ")?;
    let day = c.number(2)?;
    c.literal(b"-")?;
    let month = c.word(3, 3)?;
    c.literal(b"-")?;
    let year = c.number(2)?;
    c.literal(b" ")?;
    let (hour, minute, second) = c.time()?;
    c.literal(b" GMT")?;
    c.end()?;
    Some(DateParts { year: Year::TwoDigit(i64::from(year)), month, day, hour, minute, second })
}

// "Sun Nov  6 08:49:37 1994"
fn parse_asctime(s: &[u8]) -> Option<DateParts<'_>> {
    let mut c = Cursor::new(s);
    c.word(3, 3)?;
    c.literal(b" ")?;
    let month = c.word(3, 3)?;
    c.literal(b" ")?;
    let day = c.padded_number()?;
    c.literal(b" ")?;
    let (hour, minute, second) = c.time()?;
    c.literal(b" ")?;
    let year = c.number(4)?;
    c.end()?;
    Some(DateParts { year: Year::Full(i64::from(year)), month, day, hour, minute, second })
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn literal(&mut self, lit: &[u8]) -> Option<()> {
        let end = self.pos + lit.len();
        if self.input.get(self.pos..end)? != lit {
            return None;
        }
        self.pos = end;
        Some(())
    }

    /// Between `min` and `max` word characters (`[A-Za-z0-9_]`), greedy.
    fn word(&mut self, min: usize, max: usize) -> Option<&'a [u8]> {
        let start = self.pos;
        let len = self.input[start..]
            .iter()
            .take(max)
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count();
        if len < min {
            return None;
        }
        self.pos += len;
        Some(&self.input[start..self.pos])
    }

    /// Exactly `digits` ASCII digits.
    fn number(&mut self, digits: usize) -> Option<u32> {
        let raw = self.input.get(self.pos..self.pos + digits)?;
        let value = raw.iter().try_fold(0u32, |acc, b| {
            b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
        })?;
        self.pos += digits;
        Some(value)
    }

    /// Two characters, the first of which may be a space (`" 6"` or `"16"`).
    fn padded_number(&mut self) -> Option<u32> {
        if self.input.get(self.pos) == Some(&b' ') {
            self.pos += 1;
            return self.number(1);
        }
        self.number(2)
    }

    fn time(&mut self) -> Option<(u32, u32, u32)> {
        let hour = self.number(2)?;
        self.literal(b":")?;
        let minute = self.number(2)?;
        self.literal(b":")?;
        let second = self.number(2)?;
        Some((hour, minute, second))
    }

    fn end(&self) -> Option<()> {
        (self.pos == self.input.len()).then_some(())
    }
}

fn is_leap(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = i64::from(month);
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Year of a day count since 1970-01-01.
fn year_from_days(days: i64) -> i64 {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let year = yoe + era * 400;
    if mp >= 10 { year + 1 } else { year }
}

fn current_year() -> i64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    year_from_days(secs.div_euclid(86_400))
}
