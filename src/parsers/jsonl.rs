use std::path::Path;

use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::utils::read_to_string_limited;

/// Key added to records that parsed but carry no `history` array
pub const WARNING_KEY: &str = "_warning";
/// Key carried by placeholder records for lines that failed to parse
pub const ERROR_KEY: &str = "error";

/// Split JSONL text into one record per non-blank line.
///
/// Never fails: a line that is not JSON becomes `{"history": [], "error": ...}`
/// and a record without a `history` array gets a `_warning` annotation.
/// Line numbers in messages count non-blank lines from 1.
pub fn parse_jsonl_str(content: &str) -> Vec<Value> {
    let mut records = Vec::new();
    let mut failed = 0;

    let lines = content.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));
    for (index, line) in lines.filter(|line| !line.trim().is_empty()).enumerate() {
        let line_no = index + 1;

        let record = match serde_json::from_str::<Value>(line) {
            Ok(value) if has_history_array(&value) => value,
            Ok(value) => {
                tracing::debug!(line = line_no, "Record has no history array");
                with_warning(value, format!("Line {} does not have a valid history array", line_no))
            }
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Failed to parse JSONL line");
                failed += 1;
                json!({
                    "history": [],
                    ERROR_KEY: format!("Failed to parse line {}: {}", line_no, e),
                })
            }
        };
        records.push(record);
    }

    if failed > 0 {
        tracing::info!(records = records.len(), failed, "Parsed JSONL content with placeholders");
    }

    records
}

/// Read a JSONL file (size-limited) and split it into records
pub fn parse_jsonl_file(path: &Path, max_bytes: u64) -> Result<Vec<Value>> {
    let content = read_to_string_limited(path, max_bytes)?;
    Ok(parse_jsonl_str(&content))
}

/// Whether a record is a placeholder for an unparseable line
pub fn is_placeholder(record: &Value) -> bool {
    record.get(ERROR_KEY).is_some_and(Value::is_string)
        && record.get("history").and_then(Value::as_array).is_some_and(Vec::is_empty)
}

fn has_history_array(value: &Value) -> bool {
    value.get("history").is_some_and(Value::is_array)
}

fn with_warning(value: Value, warning: String) -> Value {
    let mut object = match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    };
    object.insert(WARNING_KEY.to_string(), Value::String(warning));
    Value::Object(object)
}
