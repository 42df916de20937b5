//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tempfile::TempDir;

/// Builder for a temp directory holding trajectory, JSONL and patch files
pub struct TrajectoryDirBuilder {
    temp_dir: TempDir,
}

impl TrajectoryDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file with raw content
    pub fn with_file(self, name: &str, content: &str) -> Self {
        fs::write(self.temp_dir.path().join(name), content).expect("Failed to write test file");
        self
    }

    /// Write a JSON trajectory file
    pub fn with_json(self, name: &str, value: &Value) -> Self {
        let content = serde_json::to_string_pretty(value).expect("Failed to serialize trajectory");
        self.with_file(name, &content)
    }

    /// Write a JSONL file with one record per line
    pub fn with_jsonl(self, name: &str, records: &[Value]) -> Self {
        let content = records.iter().map(Value::to_string).collect::<Vec<_>>().join("\n");
        self.with_file(name, &content)
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for TrajectoryDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Path of `name` inside a built directory
pub fn file_in(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

/// Builder for raw OpenHands-style events
pub struct EventBuilder {
    fields: Map<String, Value>,
}

impl EventBuilder {
    /// Agent action with the given tag
    pub fn action(tag: &str) -> Self {
        Self::with_fields(json!({"source": "agent", "action": tag}))
    }

    /// Agent observation with the given tag
    pub fn observation(tag: &str) -> Self {
        Self::with_fields(json!({"source": "agent", "observation": tag}))
    }

    /// Message-only event
    pub fn message_only(source: &str, message: &str) -> Self {
        Self::with_fields(json!({"source": source, "message": message}))
    }

    fn with_fields(value: Value) -> Self {
        let fields = value.as_object().cloned().unwrap_or_default();
        Self { fields }
    }

    pub fn id(self, id: i64) -> Self {
        self.set("id", json!(id))
    }

    pub fn source(self, source: &str) -> Self {
        self.set("source", json!(source))
    }

    pub fn message(self, message: &str) -> Self {
        self.set("message", json!(message))
    }

    pub fn timestamp(self, timestamp: &str) -> Self {
        self.set("timestamp", json!(timestamp))
    }

    pub fn content(self, content: &str) -> Self {
        self.set("content", json!(content))
    }

    pub fn cause(self, cause: i64) -> Self {
        self.set("cause", json!(cause))
    }

    pub fn success(self, success: bool) -> Self {
        self.set("success", json!(success))
    }

    /// Set one entry of `args`
    pub fn arg(self, key: &str, value: impl Into<Value>) -> Self {
        self.nested("args", key, value.into())
    }

    /// Set one entry of `extras`
    pub fn extra(self, key: &str, value: impl Into<Value>) -> Self {
        self.nested("extras", key, value.into())
    }

    pub fn tool_call(self, function_name: &str, call_id: &str) -> Self {
        let metadata = json!({"function_name": function_name, "tool_call_id": call_id});
        self.set("tool_call_metadata", metadata)
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }

    fn set(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    fn nested(mut self, map: &str, key: &str, value: Value) -> Self {
        let entry = self.fields.entry(map.to_string()).or_insert_with(|| json!({}));
        if let Some(object) = entry.as_object_mut() {
            object.insert(key.to_string(), value);
        }
        self
    }
}

/// Builder for JSONL evaluation records (`instance_id`, `history`, ...)
pub struct RecordBuilder {
    fields: Map<String, Value>,
    history: Vec<Value>,
}

impl RecordBuilder {
    pub fn new(instance_id: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("instance_id".to_string(), json!(instance_id));
        Self { fields, history: Vec::new() }
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn event(mut self, event: Value) -> Self {
        self.history.push(event);
        self
    }

    pub fn git_patch(self, patch: &str) -> Self {
        self.field("test_result", json!({"git_patch": patch}))
    }

    pub fn build(self) -> Value {
        let mut fields = self.fields;
        fields.insert("history".to_string(), Value::Array(self.history));
        Value::Object(fields)
    }
}

/// A small but complete OpenHands session
pub fn sample_session() -> Vec<Value> {
    vec![
        EventBuilder::action("message")
            .source("user")
            .id(0)
            .timestamp("2025-03-04T19:57:40.000000")
            .message("Please fix the failing test")
            .build(),
        EventBuilder::action("think")
            .id(1)
            .timestamp("2025-03-04T19:57:45.000000")
            .arg("thought", "The assertion in test_core.py looks wrong")
            .build(),
        EventBuilder::action("run")
            .id(2)
            .timestamp("2025-03-04T19:57:50.000000")
            .message("Running tests")
            .arg("command", "pytest tests/test_core.py")
            .tool_call("execute_bash", "call_1")
            .build(),
        EventBuilder::observation("run")
            .id(3)
            .timestamp("2025-03-04T19:58:10.000000")
            .cause(2)
            .content("1 failed")
            .extra("command", "pytest tests/test_core.py")
            .extra("metadata", json!({"exit_code": 1}))
            .build(),
        EventBuilder::action("str_replace_editor")
            .id(4)
            .timestamp("2025-03-04T19:58:30.000000")
            .arg("command", "str_replace")
            .arg("path", "/workspace/tests/test_core.py")
            .arg("old_str", "assert add(1, 1) == 3")
            .arg("new_str", "assert add(1, 1) == 2")
            .build(),
        EventBuilder::action("finish").id(5).timestamp("2025-03-04T19:59:40.000000").build(),
    ]
}

/// Two-file patch: one modified file, one new file
pub const SAMPLE_PATCH: &str = "diff --git a/src/core.py b/src/core.py
index 3b18e51..a2c4f0e 100644
--- a/src/core.py
+++ b/src/core.py
@@ -1,4 +1,4 @@
 def add(a, b):
-    return a - b
+    return a + b


diff --git a/tests/test_new.py b/tests/test_new.py
new file mode 100644
index 0000000..e69de29
--- /dev/null
+++ b/tests/test_new.py
@@ -0,0 +1,2 @@
+def test_add():
+    assert add(1, 1) == 2
";
