//! Trajectory normalization.
//!
//! Turns any of the four accepted trajectory shapes into one ordered list of
//! [`TimelineEntry`] values:
//!
//! - **Event list / `entries`**: raw OpenHands events, mapped one by one
//! - **`history`**: raw events or pre-normalized items, mixed freely
//! - **`test_result.git_patch`**: one patch message plus one edit per file
//!
//! Source order is preserved. Every shape except the git patch opens with a
//! synthetic system start marker. Repeated system prompts (content holding a
//! `<ROLE>...</ROLE>` block with an already seen 100-character prefix) are
//! emitted once per call; the set of seen prompts lives in a
//! [`ConversionState`] created for each call.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use trajectory_viewer::normalizer::normalize;
//!
//! let trajectory = json!({"history": [
//!     {"source": "user", "action": "message", "message": "Fix the failing test"},
//!     {"source": "agent", "action": "run", "args": {"command": "pytest"}}
//! ]});
//! let entries = normalize(&trajectory)?;
//! assert_eq!(entries.len(), 3);
//! assert_eq!(entries[2].command.as_deref(), Some("pytest"));
//! # Ok::<(), trajectory_viewer::Error>(())
//! ```

pub mod detect;
mod events;
mod history;
pub mod metadata;
mod patch;

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

pub use detect::{TrajectoryShape, detect_shape};
pub use metadata::MetadataSources;
pub use patch::PATCH_TITLE;

use crate::error::Result;
use crate::models::{ActorType, EntryType, RawEvent, TimelineEntry};

pub const START_TITLE: &str = "Starting trajectory visualization";
pub const START_CONTENT: &str = "Trajectory loaded from OpenHands format";

/// Number of leading characters that identify a system prompt
const PROMPT_FINGERPRINT_CHARS: usize = 100;

/// Normalize a trajectory, stamping entries without a timestamp with the current time
pub fn normalize(trajectory: &Value) -> Result<Vec<TimelineEntry>> {
    normalize_at(trajectory, Utc::now())
}

/// Parse trajectory JSON text and normalize it
pub fn normalize_str(text: &str) -> Result<Vec<TimelineEntry>> {
    let trajectory: Value = serde_json::from_str(text)?;
    normalize(&trajectory)
}

/// Normalize a trajectory with an explicit clock for defaulted timestamps
pub fn normalize_at(trajectory: &Value, now: DateTime<Utc>) -> Result<Vec<TimelineEntry>> {
    let shape = detect_shape(trajectory)?;
    let mut state = ConversionState::new(now);

    let entries = match shape {
        TrajectoryShape::EventList(raw) | TrajectoryShape::Entries(raw) => {
            convert_event_list(raw, &mut state)
        }
        TrajectoryShape::History(items) => history::convert_history(items, &mut state),
        TrajectoryShape::GitPatch(patch) => patch::convert_git_patch(patch, &state),
    };

    tracing::debug!(shape = shape.name(), entries = entries.len(), "Normalized trajectory");
    Ok(entries)
}

fn convert_event_list(raw: &[Value], state: &mut ConversionState) -> Vec<TimelineEntry> {
    let mut entries = Vec::with_capacity(raw.len() + 1);
    entries.push(state.start_marker());
    for value in raw {
        entries.extend(events::convert_event(&RawEvent::from_value(value), state));
    }
    entries
}

/// Per-call conversion state: the clock and the system prompts seen so far
#[derive(Debug)]
pub struct ConversionState {
    now: String,
    seen_prompts: HashSet<String>,
}

impl ConversionState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: now.to_rfc3339_opts(SecondsFormat::Millis, true), seen_prompts: HashSet::new() }
    }

    /// Conversion time as an RFC 3339 string
    pub fn now(&self) -> &str {
        &self.now
    }

    pub fn timestamp_or_now(&self, timestamp: Option<&str>) -> String {
        timestamp.filter(|ts| !ts.is_empty()).unwrap_or(self.now.as_str()).to_string()
    }

    /// Records a system prompt and reports whether it was already seen.
    ///
    /// Content without both `<ROLE>` and `</ROLE>` is never a repeat.
    pub fn is_repeated_prompt(&mut self, content: &str) -> bool {
        if !(content.contains("<ROLE>") && content.contains("</ROLE>")) {
            return false;
        }
        let fingerprint: String = content.chars().take(PROMPT_FINGERPRINT_CHARS).collect();
        !self.seen_prompts.insert(fingerprint)
    }

    pub fn start_marker(&self) -> TimelineEntry {
        TimelineEntry::new(EntryType::Message, ActorType::System, self.now.as_str(), START_TITLE)
            .with_content(START_CONTENT)
    }
}
