//! Text cleanup shared by the normalizer and the reference loader.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

use crate::types::SubType;

/// Trim and drop trailing ".0" float artifacts until neither applies.
/// Applying it twice gives the same result as once.
pub fn normalize_key(raw: &str) -> String {
    let mut s = raw.trim();
    while let Some(stripped) = s.strip_suffix(".0") {
        s = stripped.trim();
    }
    s.to_string()
}

fn fraction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\d+$").expect("fraction regex"))
}

/// Remove a trailing fractional-seconds part ("2024-01-05 10:00:00.0" -> "2024-01-05 10:00:00").
/// Only applies when the text carries a time, so "12.5" style values are left alone.
pub fn strip_fraction(raw: &str) -> &str {
    let s = raw.trim();
    if !s.contains(':') {
        return s;
    }
    match fraction_re().find(s) {
        Some(m) => &s[..m.start()],
        None => s,
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a created-at cell. Unparsable text gives `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = strip_fraction(raw);
    if s.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn detect_sub_type(order_key: &str) -> SubType {
    let upper = order_key.to_ascii_uppercase();
    if upper.contains("-MO") {
        SubType::Mo
    } else if upper.contains("-DO") {
        SubType::Do
    } else {
        SubType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn normalize_strips_float_artifact_and_space() {
        assert_eq!(normalize_key(" 1234567.0 "), "1234567");
        assert_eq!(normalize_key("AO123"), "AO123");
        assert_eq!(normalize_key("12.05"), "12.05");
        assert_eq!(normalize_key("  "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["1.0.0", " 99.0 .0", "WO-1", "7.0", "x.00", ""] {
            let once = normalize_key(raw);
            assert_eq!(normalize_key(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn strip_fraction_only_touches_times() {
        assert_eq!(strip_fraction("2024-01-05 10:00:00.0"), "2024-01-05 10:00:00");
        assert_eq!(strip_fraction("2024-01-05 10:00:00.000"), "2024-01-05 10:00:00");
        assert_eq!(strip_fraction("12.5"), "12.5");
    }

    #[test]
    fn parse_accepts_report_formats() {
        let ts = parse_timestamp("2024-02-14 08:30:15.0").unwrap();
        assert_eq!((ts.month(), ts.day(), ts.hour()), (2, 14, 8));
        assert_eq!(parse_timestamp("14/02/2024 08:30:15").unwrap(), ts);
        assert_eq!(parse_timestamp("2024-02-14").unwrap().hour(), 0);
        assert!(parse_timestamp("nan").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn sub_type_from_key() {
        assert_eq!(detect_sub_type("1-MO123_A"), SubType::Mo);
        assert_eq!(detect_sub_type("1-do9_A"), SubType::Do);
        assert_eq!(detect_sub_type("1-SO9_A"), SubType::Unknown);
    }
}
