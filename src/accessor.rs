//! Dotted-path access into arbitrary JSON records
//!
//! Paths are `.`-separated segments: object keys, or numeric indices into
//! arrays (`history.0.source`). Two pseudo-paths are understood:
//!
//! - `duration`: milliseconds between the first and last `history` item timestamps
//! - `len(<path>)`: length of the array, string (in characters) or object at `<path>`
//!
//! A missing key, an out-of-range index, a step through `null` or a scalar all
//! resolve to `None`. Resolution never panics.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use trajectory_viewer::accessor::{get_path, get_path_or};
//!
//! let record = json!({"instance_id": "django-1", "history": [1, 2, 3]});
//! assert_eq!(get_path(&record, "len(history)").unwrap().as_ref(), &json!(3));
//! assert_eq!(get_path_or(&record, "metrics.cost", json!(0)), json!(0));
//! ```

use std::borrow::Cow;

use serde_json::Value;

use crate::utils::parse_timestamp_value;

pub const DURATION_PATH: &str = "duration";

const MAX_DISPLAY_CHARS: usize = 30;

/// Resolve `path` against `record`
pub fn get_path<'a>(record: &'a Value, path: &str) -> Option<Cow<'a, Value>> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }

    if path == DURATION_PATH {
        return history_duration_ms(record).map(|ms| Cow::Owned(Value::from(ms)));
    }

    if let Some(inner) = len_argument(path) {
        let target = get_path(record, inner)?;
        return value_len(&target).map(|len| Cow::Owned(Value::from(len)));
    }

    let mut current = record;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    if current.is_null() { None } else { Some(Cow::Borrowed(current)) }
}

/// Like [`get_path`], falling back to `default` when the path does not resolve
pub fn get_path_or(record: &Value, path: &str, default: Value) -> Value {
    get_path(record, path).map(Cow::into_owned).unwrap_or(default)
}

/// Milliseconds from the first to the last `history` item.
///
/// `None` when there is no non-empty history or either end has no parseable
/// timestamp. May be negative for out-of-order logs.
pub fn history_duration_ms(record: &Value) -> Option<i64> {
    let history = record.get("history")?.as_array()?;
    let first = parse_timestamp_value(history.first()?.get("timestamp")?)?;
    let last = parse_timestamp_value(history.last()?.get("timestamp")?)?;
    Some((last - first).num_milliseconds())
}

/// Render a resolved value for a one-line display field
pub fn format_value_for_display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::Bool(b)) => (if *b { "Yes" } else { "No" }).to_string(),
        Some(Value::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 => format!("{:.0}", f),
                    Some(f) => format!("{:.4}", f),
                    None => n.to_string(),
                }
            }
        }
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => format!("Array({})", items.len()),
        Some(object @ Value::Object(_)) => truncate_for_display(&object.to_string()),
    }
}

/// Cut `text` to the display width, marking the cut with `...`
pub fn truncate_for_display(text: &str) -> String {
    if text.chars().count() <= MAX_DISPLAY_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_DISPLAY_CHARS).collect();
    cut.push_str("...");
    cut
}

/// Label for a display field: `len(history)` reads as `history length`
pub fn display_field_label(path: &str) -> String {
    match len_argument(path) {
        Some(inner) => format!("{} length", inner),
        None => path.to_string(),
    }
}

fn len_argument(path: &str) -> Option<&str> {
    path.strip_prefix("len(")?.strip_suffix(')').map(str::trim)
}

fn value_len(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::String(s) => Some(s.chars().count()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}
