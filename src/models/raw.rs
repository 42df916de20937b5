use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::parsers::deserializers::{
    deserialize_lenient_bool, deserialize_lenient_object, deserialize_lenient_string,
    deserialize_lenient_tool_metadata, deserialize_timestamp_string,
};

/// Tool invocation details attached to an agent action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallMetadata {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub tool_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub function_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub tool_call_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_object")]
    pub tool_args: Option<Map<String, Value>>,
}

/// One item of a source trajectory log.
///
/// Every field is optional and deserialised leniently: a field of the wrong
/// JSON type is treated as absent instead of failing the whole event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_timestamp_string")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub observation: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_object")]
    pub args: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "deserialize_lenient_object")]
    pub extras: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_tool_metadata")]
    pub tool_call_metadata: Option<ToolCallMetadata>,
    /// Id of the event that caused this one (a back-reference, not ownership)
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub cause: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub success: Option<bool>,

    // Fields of already-normalized history items
    #[serde(default, rename = "type", deserialize_with = "deserialize_lenient_string")]
    pub entry_type: Option<String>,
    #[serde(default, rename = "actorType", deserialize_with = "deserialize_lenient_string")]
    pub actor_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub command: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub thought: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_object")]
    pub metadata: Option<Map<String, Value>>,
}

impl RawEvent {
    /// Decode an event from arbitrary JSON. Non-objects decode to an empty event.
    pub fn from_value(value: &Value) -> Self {
        match RawEvent::deserialize(value) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(error = %e, "History item is not an event object, using defaults");
                RawEvent::default()
            }
        }
    }

    /// Non-empty `action` tag
    pub fn action_tag(&self) -> Option<&str> {
        non_empty(self.action.as_deref())
    }

    /// `observation` tag (an empty tag still marks an observation)
    pub fn observation_tag(&self) -> Option<&str> {
        self.observation.as_deref()
    }

    /// Non-empty `message`
    pub fn message_text(&self) -> Option<&str> {
        non_empty(self.message.as_deref())
    }

    /// Non-empty top-level `content`
    pub fn content_text(&self) -> Option<&str> {
        non_empty(self.content.as_deref())
    }

    /// Non-empty text argument from `args`
    pub fn arg(&self, key: &str) -> Option<String> {
        text_field(self.args.as_ref(), key)
    }

    /// Non-empty text field from `extras`
    pub fn extra(&self, key: &str) -> Option<String> {
        text_field(self.extras.as_ref(), key)
    }

    /// Whether `args` has `key`, whatever its value
    pub fn has_arg(&self, key: &str) -> bool {
        self.args.as_ref().is_some_and(|args| args.contains_key(key))
    }

    /// Whether `extras` has `key`, whatever its value
    pub fn has_extra(&self, key: &str) -> bool {
        self.extras.as_ref().is_some_and(|extras| extras.contains_key(key))
    }

    /// `args[key]` rendered as text even when empty or non-string
    pub fn arg_lossy(&self, key: &str) -> String {
        let value = self.args.as_ref().and_then(|args| args.get(key));
        value.map(value_to_text).unwrap_or_default()
    }

    /// `extras[key]` rendered as text even when empty or non-string
    pub fn extra_lossy(&self, key: &str) -> String {
        let value = self.extras.as_ref().and_then(|extras| extras.get(key));
        value.map(value_to_text).unwrap_or_default()
    }
}

/// Whether a history item already has the canonical `type`/`content`/`actorType` shape
pub fn is_prenormalized(item: &Value) -> bool {
    item.as_object().is_some_and(|object| {
        ["type", "content", "actorType"].iter().all(|key| object.contains_key(*key))
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn text_field(map: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    map.and_then(|m| m.get(key)).and_then(|value| match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(value_to_text(other)),
    })
}

/// Render a JSON value as plain text: strings verbatim, everything else as JSON
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
