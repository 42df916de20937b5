use serde_json::Value;

use crate::accessor::{
    display_field_label, format_value_for_display, get_path, truncate_for_display,
};
use crate::models::value_to_text;

const SUMMARY_FIELDS: [&str; 3] = ["task", "query", "prompt"];

/// Whether a raw history item is worth showing in a trajectory listing.
///
/// Agent state change requests and empty (`null`) observations are hidden.
pub fn should_display_item(item: &Value) -> bool {
    let action = item.get("action").and_then(Value::as_str);
    let observation = item.get("observation").and_then(Value::as_str);
    action != Some("change_agent_state") && observation != Some("null")
}

/// Sidebar name of a JSONL record: `Instance #<instance_id>`, `Entry #<id>`,
/// else `Entry <index + 1>`
pub fn record_display_name(record: &Value, index: usize) -> String {
    if let Some(id) = truthy_field(record, "instance_id") {
        return format!("Instance #{}", id);
    }
    if let Some(id) = truthy_field(record, "id") {
        return format!("Entry #{}", id);
    }
    format!("Entry {}", index + 1)
}

/// Short summary of a JSONL record: its task, query or prompt, else the
/// first user message content of its history
pub fn record_summary(record: &Value) -> String {
    if let Some(text) = SUMMARY_FIELDS.iter().find_map(|field| truthy_field(record, field)) {
        return truncate_for_display(&text);
    }

    let history = record.get("history").and_then(Value::as_array);
    let user_content = history.and_then(|history| {
        history
            .iter()
            .filter(|item| is_user_item(item))
            .find_map(|item| truthy_field(item, "content"))
    });

    match user_content {
        Some(content) => truncate_for_display(&content),
        None => "No summary available".to_string(),
    }
}

/// `(label, value)` pairs for the configured display fields of a record
pub fn display_field_values(record: &Value, fields: &[String]) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|field| {
            let value = get_path(record, field);
            (display_field_label(field), format_value_for_display(value.as_deref()))
        })
        .collect()
}

fn is_user_item(item: &Value) -> bool {
    item.get("actorType").and_then(Value::as_str) == Some("User")
        || item.get("source").and_then(Value::as_str) == Some("user")
}

/// Field rendered as text, skipping `null`, `false`, `0` and `""`
fn truthy_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(value_to_text(other)),
    }
}
