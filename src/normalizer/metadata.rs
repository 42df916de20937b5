use serde_json::{Map, Value};

use crate::models::{RawEvent, ToolCallMetadata};

/// Key of the nested map inside `extras` that is merged last
const NESTED_KEY: &str = "metadata";

/// The three metadata sources of an event, merged in field order.
///
/// Later sources overwrite earlier ones on key collision:
/// tool call details, then `extras` (without its nested `metadata` map),
/// then the entries of `extras.metadata`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataSources<'a> {
    pub tool: Option<&'a ToolCallMetadata>,
    pub extras: Option<&'a Map<String, Value>>,
    pub extras_metadata: Option<&'a Map<String, Value>>,
}

impl<'a> MetadataSources<'a> {
    pub fn from_event(event: &'a RawEvent) -> Self {
        let extras = event.extras.as_ref();
        let extras_metadata =
            extras.and_then(|extras| extras.get(NESTED_KEY)).and_then(Value::as_object);
        Self { tool: event.tool_call_metadata.as_ref(), extras, extras_metadata }
    }

    pub fn merge(&self) -> Map<String, Value> {
        let mut merged = Map::new();

        if let Some(tool) = self.tool {
            let function_name = tool.function_name.as_ref().filter(|n| !n.is_empty());
            let name = function_name.or(tool.tool_name.as_ref());
            if let Some(name) = name {
                merged.insert("tool_name".to_string(), Value::String(name.clone()));
            }
            if let Some(id) = &tool.tool_call_id {
                merged.insert("tool_call_id".to_string(), Value::String(id.clone()));
            }
            if let Some(args) = &tool.tool_args {
                merged.extend(args.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }

        if let Some(extras) = self.extras {
            let flat = extras.iter().filter(|(key, _)| key.as_str() != NESTED_KEY);
            merged.extend(flat.map(|(k, v)| (k.clone(), v.clone())));
        }

        if let Some(nested) = self.extras_metadata {
            merged.extend(nested.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        merged
    }
}
