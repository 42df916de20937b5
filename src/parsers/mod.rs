//! Parsers for trajectory inputs: JSONL batches and unified diffs
//!
//! # Error Handling Strategy
//!
//! Both parsers follow a **graceful degradation** approach:
//!
//! - **Individual line failures**: A malformed JSONL line becomes a placeholder record
//!   (`{"history": [], "error": ...}`) and is logged with its line number, so one bad
//!   line never hides the rest of a batch and record positions stay stable.
//!
//! - **Structural leniency**: Diff text that does not follow the unified format is
//!   skipped line by line; files without hunks are simply left out.
//!
//! - **Error propagation**: Only I/O (missing file, size limit, invalid UTF-8) fails,
//!   via `anyhow::Result` with context.

pub mod deserializers;
pub mod diff;
pub mod jsonl;

pub use diff::{diff_file_paths, parse_unified_diff};
pub use jsonl::{is_placeholder, parse_jsonl_file, parse_jsonl_str};
