use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Closed set of entry kinds a timeline can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Message,
    Command,
    Edit,
    Search,
    Error,
}

impl EntryType {
    pub const ALL: [EntryType; 5] = [
        EntryType::Message,
        EntryType::Command,
        EntryType::Edit,
        EntryType::Search,
        EntryType::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Message => "message",
            EntryType::Command => "command",
            EntryType::Edit => "edit",
            EntryType::Search => "search",
            EntryType::Error => "error",
        }
    }

    /// Parse a canonical type name (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "message" => Some(EntryType::Message),
            "command" => Some(EntryType::Command),
            "edit" => Some(EntryType::Edit),
            "search" => Some(EntryType::Search),
            "error" => Some(EntryType::Error),
            _ => None,
        }
    }

    /// Map the `type` of an already-normalized history item.
    /// Anything unknown (including `thought`) becomes a message.
    pub fn from_prenormalized(value: &str) -> Self {
        Self::parse(value).unwrap_or(EntryType::Message)
    }
}

/// Originator of a timeline entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorType {
    User,
    Assistant,
    System,
}

impl ActorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorType::User => "User",
            ActorType::Assistant => "Assistant",
            ActorType::System => "System",
        }
    }

    /// Derive the actor from an event `source`
    pub fn from_source(source: Option<&str>) -> Self {
        match source {
            Some("user") => ActorType::User,
            Some("system") | Some("environment") => ActorType::System,
            _ => ActorType::Assistant,
        }
    }

    /// Parse an actor name (case-insensitive, `agent` accepted for Assistant)
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "user" => Some(ActorType::User),
            "assistant" | "agent" => Some(ActorType::Assistant),
            "system" | "environment" => Some(ActorType::System),
            _ => None,
        }
    }
}

/// Canonical timeline entry produced by the normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub timestamp: String,
    pub title: String,
    /// Serialized as `null` when absent; `type`, `content` and `actorType`
    /// together mark an item as pre-normalized
    #[serde(default)]
    pub content: Option<String>,
    pub actor_type: ActorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl TimelineEntry {
    pub fn new(
        entry_type: EntryType,
        actor_type: ActorType,
        timestamp: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            entry_type,
            timestamp: timestamp.into(),
            title: title.into(),
            content: None,
            actor_type,
            command: None,
            path: None,
            thought: None,
            metadata: Map::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}
