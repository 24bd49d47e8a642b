use chrono::{DateTime, NaiveDate};

pub const PRESENT: &str = "Present";

/// Parses the date shapes clients send: `YYYY-MM-DD`, `YYYY-MM`, or RFC 3339.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok()
}

/// "Jan 2023". Empty or unparsable input yields an empty string.
pub fn format_date(raw: &str) -> String {
    parse_date(raw)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_default()
}

/// Joins start and end with `separator`. An in-progress entry ends in "Present";
/// a missing side drops the separator instead of leaving it dangling.
pub fn date_range(start: &str, end: &str, current: bool, separator: &str) -> String {
    let start = format_date(start);
    let end = if current {
        PRESENT.to_string()
    } else {
        format_date(end)
    };
    match (start.is_empty(), end.is_empty()) {
        (true, true) => String::new(),
        (false, true) => start,
        (true, false) => end,
        (false, false) => format!("{start}{separator}{end}"),
    }
}
