//! Type inference for raw CSV values written into typed cells
//!
//! A raw string is tried as a number, then a date/time, then a boolean, and
//! finally falls back to text. The order matters: `"1"` must become a number,
//! and a value is only a boolean once numeric and date parsing both failed.
//! Coercion never fails.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Destination for a coerced value (a spreadsheet cell, a test recorder, ...)
pub trait CellSink {
    /// Store a numeric value
    fn set_number(&mut self, value: f64);
    /// Store a local date/time
    fn set_date_time(&mut self, value: NaiveDateTime);
    /// Store a boolean
    fn set_bool(&mut self, value: bool);
    /// Store plain text
    fn set_text(&mut self, value: &str);
}

/// The inferred type of a raw value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoercedValue<'a> {
    /// Invariant-format floating point number
    Number(f64),
    /// Date/time, in local wall-clock time
    DateTime(NaiveDateTime),
    /// `true` / `false`
    Boolean(bool),
    /// Anything else, verbatim
    Text(&'a str),
}

impl<'a> CoercedValue<'a> {
    /// Infer the most specific type for `raw`
    pub fn infer(raw: &'a str) -> Self {
        if let Some(n) = parse_number(raw) {
            return CoercedValue::Number(n);
        }
        if let Some(dt) = parse_date_time(raw) {
            return CoercedValue::DateTime(dt);
        }
        if let Some(b) = parse_bool(raw) {
            return CoercedValue::Boolean(b);
        }
        CoercedValue::Text(raw)
    }

    /// Write this value through the matching sink setter
    pub fn write_to<S: CellSink + ?Sized>(&self, sink: &mut S) {
        match *self {
            CoercedValue::Number(n) => sink.set_number(n),
            CoercedValue::DateTime(dt) => sink.set_date_time(dt),
            CoercedValue::Boolean(b) => sink.set_bool(b),
            CoercedValue::Text(s) => sink.set_text(s),
        }
    }
}

/// Infer the type of `raw` and write it to `sink`
pub fn write_value<S: CellSink + ?Sized>(sink: &mut S, raw: &str) {
    CoercedValue::infer(raw).write_to(sink);
}

/// Parse a number in invariant format.
///
/// Accepts surrounding whitespace, a leading sign, a decimal point and an
/// exponent. Thousands separators, hex and non-finite spellings (`inf`,
/// `NaN`) are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty()
        || !s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a boolean literal, ignoring case and surrounding whitespace
pub fn parse_bool(raw: &str) -> Option<bool> {
    let s = raw.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%A, %B %d, %Y",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

/// Parse a date/time using invariant calendar rules.
///
/// Input without a zone is taken as local time; input carrying an offset
/// (RFC 3339 / RFC 2822) is converted to local wall-clock time. A bare time
/// of day resolves against today's date.
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return date.and_hms_opt(0, 0, 0);
    }

    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .map(|time| Local::now().date_naive().and_time(time))
}
