//! Shared formatting utilities for the PlaySight views and chart scenes.

use playsight_common::current_timestamp_millis;
use playsight_common::dates::humanize_label;

/// Format a numeric value for display with appropriate scale suffix.
///
/// - Values >= 1M display as "X.XM"
/// - Values >= 1K display as "X.XK"
/// - Integer values display without decimal places
/// - Other values display with 2 decimal places
pub fn format_value(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Append a unit to an already formatted value. `%` is attached directly,
/// other units are separated by a space.
pub fn with_unit(text: impl Into<String>, unit: Option<&str>) -> String {
    let text = text.into();
    match unit.map(str::trim) {
        None | Some("") => text,
        Some("%") => format!("{}%", text),
        Some(unit) => format!("{} {}", text, unit),
    }
}

/// Format a value with its unit suffix.
pub fn format_value_with_unit(value: f64, unit: Option<&str>) -> String {
    with_unit(format_value(value), unit)
}

/// Format a raw x label for an axis tick or tooltip title.
pub fn format_x_label(raw: &str) -> String {
    humanize_label(raw)
}

/// Format a percentage share, e.g. "42%".
pub fn format_percent(share: f64) -> String {
    format!("{:.0}%", share * 100.0)
}

/// Format a Unix timestamp (milliseconds) as a relative time string.
///
/// Returns strings like "just now", "5s ago", "3m ago", "2h ago".
pub fn format_timestamp(timestamp_ms: i64) -> String {
    format_age(current_timestamp_millis() - timestamp_ms)
}

fn format_age(diff_ms: i64) -> String {
    if diff_ms < 1000 {
        "just now".to_string()
    } else if diff_ms < 60_000 {
        format!("{}s ago", diff_ms / 1000)
    } else if diff_ms < 3_600_000 {
        format!("{}m ago", diff_ms / 60_000)
    } else {
        format!("{}h ago", diff_ms / 3_600_000)
    }
}
