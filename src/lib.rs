//! Trajectory Viewer - Normalize and inspect AI agent execution trajectories
//!
//! This library turns the trajectory logs written by coding agents (OpenHands
//! event logs, simplified history files, JSONL result batches, git patches) into
//! one canonical timeline. It supports:
//!
//! - Splitting JSONL batches into records, keeping malformed lines as placeholders
//! - Normalizing any of four trajectory shapes into [`TimelineEntry`] values
//! - Parsing unified diffs into per-file hunks with old/new reconstruction
//! - Dotted-path access, sorting and filtering over records and entries
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use trajectory_viewer::{normalize, parse_jsonl_file};
//!
//! let records = parse_jsonl_file(Path::new("output.jsonl"), 50 * 1024 * 1024)?;
//! for record in &records {
//!     let entries = normalize(record)?;
//!     println!("{} timeline entries", entries.len());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod accessor;
pub mod cli;
pub mod config;
pub mod error;
pub mod filters;
pub mod logging;
pub mod models;
pub mod normalizer;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use accessor::{get_path, get_path_or};
pub use error::{Error, Result};
pub use models::{ParsedDiffFile, TimelineEntry};
pub use normalizer::{normalize, normalize_at, normalize_str};
pub use parsers::{parse_jsonl_file, parse_jsonl_str, parse_unified_diff};
