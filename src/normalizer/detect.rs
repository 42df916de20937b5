use serde_json::Value;

use crate::error::{Error, Result};

/// The accepted top-level trajectory shapes, borrowing their payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrajectoryShape<'a> {
    /// A bare array of events
    EventList(&'a [Value]),
    /// `{"entries": [...]}`
    Entries(&'a [Value]),
    /// `{"history": [...]}`, raw or pre-normalized items
    History(&'a [Value]),
    /// `{"test_result": {"git_patch": "..."}}`
    GitPatch(&'a str),
}

impl TrajectoryShape<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            TrajectoryShape::EventList(_) => "event-list",
            TrajectoryShape::Entries(_) => "entries",
            TrajectoryShape::History(_) => "history",
            TrajectoryShape::GitPatch(_) => "git-patch",
        }
    }
}

/// Pick the conversion strategy for a trajectory by its structure.
///
/// Checked in priority order: array, `entries` array, `history` array,
/// string `test_result.git_patch`. Anything else is a format error naming
/// the four shapes.
pub fn detect_shape(trajectory: &Value) -> Result<TrajectoryShape<'_>> {
    if let Value::Array(events) = trajectory {
        return Ok(TrajectoryShape::EventList(events));
    }
    if let Some(entries) = trajectory.get("entries").and_then(Value::as_array) {
        return Ok(TrajectoryShape::Entries(entries));
    }
    if let Some(history) = trajectory.get("history").and_then(Value::as_array) {
        return Ok(TrajectoryShape::History(history));
    }
    let git_patch = trajectory.get("test_result").and_then(|result| result.get("git_patch"));
    if let Some(patch) = git_patch.and_then(Value::as_str) {
        return Ok(TrajectoryShape::GitPatch(patch));
    }

    Err(Error::unsupported_shape())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_detect_event_list() {
        let value = json!([{"action": "run"}]);
        let shape = detect_shape(&value).unwrap();
        assert!(matches!(shape, TrajectoryShape::EventList(events) if events.len() == 1));
    }

    #[test]
    fn test_detect_priority() {
        // entries wins over history, history over git_patch
        let value = json!({
            "entries": [],
            "history": [{}],
            "test_result": {"git_patch": "diff"}
        });
        assert!(matches!(detect_shape(&value).unwrap(), TrajectoryShape::Entries(_)));

        let value = json!({"history": [{}], "test_result": {"git_patch": "diff"}});
        assert!(matches!(detect_shape(&value).unwrap(), TrajectoryShape::History(_)));
    }

    #[test]
    fn test_detect_git_patch() {
        let value = json!({"instance_id": "x", "test_result": {"git_patch": "diff --git a/f b/f"}});
        assert_eq!(detect_shape(&value).unwrap(), TrajectoryShape::GitPatch("diff --git a/f b/f"));
    }

    #[test]
    fn test_non_array_fields_are_not_shapes() {
        for value in [
            json!({"entries": "nope"}),
            json!({"history": {"0": {}}}),
            json!({"test_result": {"git_patch": 42}}),
            json!({"test_result": "diff"}),
            json!({}),
            json!("text"),
            json!(null),
        ] {
            let err = detect_shape(&value).unwrap_err();
            assert!(matches!(err, Error::Format(_)), "unexpected error for {value}");
        }
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(TrajectoryShape::GitPatch("").name(), "git-patch");
        assert_eq!(TrajectoryShape::History(&[]).name(), "history");
    }
}
