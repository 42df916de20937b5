//! Mapping of raw OpenHands-style events to timeline entries

use super::ConversionState;
use super::metadata::MetadataSources;
use crate::models::{ActorType, EntryType, RawEvent, TimelineEntry};

/// Convert one raw event. `None` means the event is filtered out.
pub(super) fn convert_event(
    event: &RawEvent,
    state: &mut ConversionState,
) -> Option<TimelineEntry> {
    if event.source.as_deref() == Some("environment")
        && event.observation_tag() == Some("agent_state_changed")
        && event.message_text().is_none()
    {
        return None;
    }

    if let Some(action) = event.action_tag() {
        return convert_action(event, action, state);
    }
    if let Some(observation) = event.observation_tag() {
        return convert_observation(event, observation, state);
    }

    let message = event.message_text()?;
    Some(base_entry(event, state, message))
}

fn convert_action(
    event: &RawEvent,
    action: &str,
    state: &mut ConversionState,
) -> Option<TimelineEntry> {
    let mut entry = base_entry(event, state, event.message_text().unwrap_or(action));
    entry.thought = event.arg("thought");

    match action {
        "execute_bash" | "run" => {
            entry.entry_type = EntryType::Command;
            entry.command = event.arg("command");
            entry.content = event.arg("content");
        }
        "execute_ipython_cell" | "run_ipython" => {
            entry.entry_type = EntryType::Command;
            entry.command = event.arg("code");
            entry.content = event.arg("content");
        }
        "browser" => {
            entry.entry_type = EntryType::Command;
            entry.command = event.arg("code");
        }
        "str_replace_editor" => {
            entry.entry_type = EntryType::Edit;
            entry.path = event.arg("path");
            match event.arg("command").as_deref() {
                Some("view") => {
                    entry.entry_type = EntryType::Search;
                    entry.content = event.arg("content");
                }
                Some("create") => entry.content = event.arg("file_text"),
                _ if event.has_arg("old_str") && event.has_arg("new_str") => {
                    let old = event.arg_lossy("old_str");
                    let new = event.arg_lossy("new_str");
                    entry.content = Some(changed_block(&old, &new));
                }
                _ => entry.content = event.arg("content"),
            }
        }
        "edit" => {
            entry.entry_type = EntryType::Edit;
            entry.path = event.arg("path");
            entry.content = if event.has_arg("old_content") && event.has_arg("new_content") {
                let old = event.arg_lossy("old_content");
                Some(changed_block(&old, &event.arg_lossy("new_content")))
            } else {
                event.arg("content")
            };
        }
        "read" | "web_read" => {
            entry.entry_type = EntryType::Search;
            entry.path = event.arg("path").or_else(|| event.arg("url"));
            entry.content = event.arg("content");
        }
        "think" => entry.content = entry.thought.clone(),
        "message" | "finish" | "condensation" | "recall" => {
            entry.content = event.arg("content");
            if is_repeated_prompt(entry.content.as_deref(), state) {
                return None;
            }
        }
        "error" => {
            entry.entry_type = EntryType::Error;
            entry.content = event.arg("content");
        }
        other => {
            tracing::debug!(action = other, "Unknown action type, mapping to message");
            entry.path = event.arg("path");
            entry.command = event.arg("command");
            entry.content = event.arg("content");
        }
    }

    entry.metadata = MetadataSources::from_event(event).merge();
    Some(entry)
}

fn convert_observation(
    event: &RawEvent,
    observation: &str,
    state: &mut ConversionState,
) -> Option<TimelineEntry> {
    let title = event
        .message_text()
        .or(Some(observation).filter(|tag| !tag.is_empty()))
        .unwrap_or("No title");
    let mut entry = base_entry(event, state, title);
    entry.content = event.content_text().map(str::to_string);
    entry.thought = event.cause.as_ref().map(|cause| format!("Caused by event ID: {}", cause));

    let output = || event.content_text().map(str::to_string).or_else(|| event.extra("content"));

    match observation {
        "run" | "execute_bash" | "execute_ipython_cell" | "run_ipython" | "browser" => {
            entry.entry_type = EntryType::Command;
            entry.command = event.extra("command");
            entry.content = output();
        }
        "read" | "web_read" => {
            entry.entry_type = EntryType::Search;
            entry.path = event.extra("path").or_else(|| event.extra("url"));
            entry.content = output();
        }
        "edit" | "str_replace_editor" => {
            entry.entry_type = EntryType::Edit;
            entry.path = event.extra("path");
            let replaced = (event.extra("old_str"), event.extra("new_str"));
            entry.content = if event.has_extra("old_content") && event.has_extra("new_content") {
                let old = event.extra_lossy("old_content");
                Some(changed_block(&old, &event.extra_lossy("new_content")))
            } else if let (Some(old), Some(new)) = replaced {
                Some(changed_block(&old, &new))
            } else {
                output()
            };
        }
        "think" => {
            let thought = event
                .content_text()
                .map(str::to_string)
                .or_else(|| event.extra("thought"));
            if thought.is_some() {
                entry.thought = thought.clone();
            }
            entry.content = thought;
        }
        "error" => {
            entry.entry_type = EntryType::Error;
            entry.title = event.message_text().unwrap_or("Error").to_string();
        }
        "agent_state_changed" => {
            if let Some(agent_state) = event.extra("agent_state") {
                entry.title = format!("Agent state changed to: {}", agent_state);
                entry.content = event.extra("reason");
            }
        }
        "message" | "user_message" | "assistant_message" | "condensation" | "recall" => {
            if is_repeated_prompt(entry.content.as_deref(), state) {
                return None;
            }
        }
        "null" => {
            entry.title = event.message_text().unwrap_or("No observation").to_string();
        }
        other => {
            tracing::debug!(observation = other, "Unknown observation type, mapping to message");
            entry.path = event.extra("path");
            entry.command = event.extra("command");
            entry.content = output().or_else(|| event.message_text().map(str::to_string));
        }
    }

    if event.success == Some(false) {
        entry.entry_type = EntryType::Error;
    }

    entry.metadata = MetadataSources::from_event(event).merge();
    Some(entry)
}

/// Message entry with the fields every mapping shares
fn base_entry(event: &RawEvent, state: &ConversionState, title: &str) -> TimelineEntry {
    TimelineEntry::new(
        EntryType::Message,
        ActorType::from_source(event.source.as_deref()),
        state.timestamp_or_now(event.timestamp.as_deref()),
        title,
    )
}

fn changed_block(old: &str, new: &str) -> String {
    format!("Changed from:\n{}\n\nTo:\n{}", old, new)
}

fn is_repeated_prompt(content: Option<&str>, state: &mut ConversionState) -> bool {
    let repeated = content.is_some_and(|content| state.is_repeated_prompt(content));
    if repeated {
        tracing::debug!("Skipping duplicate system prompt");
    }
    repeated
}
