//! Data models for agent trajectories.
//!
//! - [`RawEvent`] - One loosely-typed item of a source trajectory log
//! - [`TimelineEntry`] - Canonical entry produced by the normalizer
//! - [`ParsedDiffFile`] / [`Hunk`] - Structured view of unified-diff text
//!
//! Raw events use serde with the lenient field deserializers in
//! `parsers::deserializers`, so a single badly-typed field never rejects an event.

pub mod diff;
pub mod raw;
pub mod timeline;

pub use diff::{DiffLine, DiffStats, Hunk, LineKind, ParsedDiffFile};
pub use raw::{RawEvent, ToolCallMetadata, is_prenormalized, value_to_text};
pub use timeline::{ActorType, EntryType, TimelineEntry};
