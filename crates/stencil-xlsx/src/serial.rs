//! Date/time to spreadsheet serial number conversion

use chrono::{NaiveDate, NaiveDateTime};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Convert a local date/time to a serial number.
///
/// In the 1900 system, serial 0 is 1899-12-30 so that every date from
/// 1900-03-01 on lines up with the fictional 1900-02-29. In the 1904 system,
/// serial 0 is 1904-01-01.
pub fn date_time_to_serial(value: NaiveDateTime, date1904: bool) -> f64 {
    let base = if date1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)
    };
    let base = match base.and_then(|d| d.and_hms_opt(0, 0, 0)) {
        Some(base) => base,
        None => return 0.0,
    };
    (value - base).num_milliseconds() as f64 / MILLIS_PER_DAY
}
