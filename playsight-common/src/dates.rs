//! Date parsing and display helpers shared by the chart labels and the
//! metrics query.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a label as a date, trying RFC 3339 first and then common
/// date-only layouts.
pub fn parse_date(label: &str) -> Option<NaiveDateTime> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(label) {
        return Some(dt.naive_utc());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(label, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(label, format).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a date for axis ticks and tooltips, e.g. "Jan 5, 2024".
pub fn format_human_date(date: &NaiveDateTime) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Render a label as a human date when it parses as one, verbatim otherwise.
pub fn humanize_label(label: &str) -> String {
    match parse_date(label) {
        Some(date) => format_human_date(&date),
        None => label.to_string(),
    }
}
