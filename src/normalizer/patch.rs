use super::ConversionState;
use crate::models::{ActorType, EntryType, TimelineEntry};
use crate::parsers::diff_file_paths;

pub const PATCH_TITLE: &str = "Git Patch";

/// One message carrying the whole patch, then one edit entry per changed file
pub(super) fn convert_git_patch(patch: &str, state: &ConversionState) -> Vec<TimelineEntry> {
    let files = diff_file_paths(patch);
    let mut entries = Vec::with_capacity(files.len() + 1);

    let message =
        TimelineEntry::new(EntryType::Message, ActorType::System, state.now(), PATCH_TITLE);
    entries.push(message.with_content(patch));

    for (old_path, _) in files {
        let title = format!("Changes in {}", old_path);
        entries.push(
            TimelineEntry::new(EntryType::Edit, ActorType::System, state.now(), title)
                .with_path(old_path),
        );
    }
    entries
}
