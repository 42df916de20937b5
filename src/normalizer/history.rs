use serde_json::Value;

use super::{ConversionState, events};
use crate::models::{ActorType, EntryType, RawEvent, TimelineEntry, is_prenormalized};

/// Convert `history` items: pre-normalized items pass through, the rest go
/// through the raw event mapping.
pub(super) fn convert_history(items: &[Value], state: &mut ConversionState) -> Vec<TimelineEntry> {
    let mut entries = Vec::with_capacity(items.len() + 1);
    entries.push(state.start_marker());

    let mut passed_through = 0;
    for item in items {
        let event = RawEvent::from_value(item);
        if is_prenormalized(item) {
            passed_through += 1;
            entries.push(pass_through(&event, state));
        } else if let Some(entry) = events::convert_event(&event, state) {
            entries.push(entry);
        }
    }

    if passed_through > 0 {
        tracing::debug!(
            passed_through,
            total = items.len(),
            "History contains pre-normalized items"
        );
    }
    entries
}

/// Light renaming of an item that already has `type`, `content` and `actorType`
fn pass_through(item: &RawEvent, state: &ConversionState) -> TimelineEntry {
    let raw_type = item.entry_type.as_deref().unwrap_or_default();
    let content = item.content.clone().filter(|c| !c.is_empty());
    let title = content.as_deref().and_then(|c| c.lines().next()).unwrap_or_default();
    let actor = item
        .actor_type
        .as_deref()
        .and_then(ActorType::parse)
        .unwrap_or_else(|| ActorType::from_source(item.source.as_deref()));

    let mut entry = TimelineEntry::new(
        EntryType::from_prenormalized(raw_type),
        actor,
        state.timestamp_or_now(item.timestamp.as_deref()),
        title,
    );
    entry.command = item.command.clone().filter(|c| !c.is_empty());
    entry.path = item.path.clone().filter(|p| !p.is_empty());
    entry.metadata = item.metadata.clone().unwrap_or_default();

    if raw_type == "thought" {
        entry.thought = content;
    } else {
        entry.content = content;
        entry.thought = item.thought.clone();
    }
    entry
}
