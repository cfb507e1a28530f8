//! Best-effort parsing of upstream timestamps into UTC instants.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Date-times carrying a numeric offset. A trailing `Z` is rewritten to
/// `+00:00` before these are tried.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp string.
///
/// Accepts RFC 3339 with any offset, ISO date-times with or without seconds
/// and with a `Z`, `+hh:mm` or `+hhmm` zone, RFC 2822, naive date-times
/// (taken as UTC) and the date-only forms `YYYY-MM-DD`, `YYYY-MM` and `YYYY`
/// (midnight UTC on the first day they name). Returns None when nothing matches.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = parse_with_offset(s) {
        return Some(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    parse_date_only(s).map(start_of_day)
}

fn parse_with_offset(s: &str) -> Option<DateTime<Utc>> {
    let zoned = match s.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => s.to_string(),
    };

    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&zoned, format).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_date_only(s: &str) -> Option<NaiveDate> {
    let is_year = |y: &str| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit());

    match s.len() {
        10 => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
        7 if s.as_bytes()[4] == b'-' => {
            NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()
        }
        4 if is_year(s) => s.parse::<i32>().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)),
        _ => None,
    }
}

/// Convert epoch milliseconds (the JS `Date.getTime()` form) into an instant.
pub fn instant_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
