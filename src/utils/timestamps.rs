use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Naive ISO-8601 layouts seen in trajectory logs (no offset, read as UTC)
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a trajectory timestamp string.
///
/// Accepts RFC 3339 (`2025-03-04T19:57:40Z`, with offset) and the offset-less
/// form OpenHands writes (`2025-03-04T19:57:40.638806`), which is read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Parse a timestamp held in a JSON value: strings as above, integers as Unix millis
pub fn parse_timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Format a millisecond duration as `"<m>m <s>s"`, or `"<s>s"` under a minute
pub fn format_duration(duration_ms: i64) -> String {
    let seconds = (duration_ms as f64 / 1000.0).round() as i64;
    let minutes = seconds / 60;
    let remaining = seconds % 60;

    if minutes > 0 { format!("{}m {}s", minutes, remaining) } else { format!("{}s", remaining) }
}
