//! Unified diff parser.
//!
//! Works in one pass over the lines of the input. File boundaries are
//! `diff --git a/<old> b/<new>` lines, hunks start at `@@ -a,b +c,d @@` lines
//! and every other line is looked at exactly once, so the cost is linear in
//! the input size whatever its shape.
//!
//! A hunk body runs to the next hunk header or file boundary, whatever line
//! counts its header announces. The one exception is the `-- ` signature that
//! `git format-patch` appends: once the old side of the open hunk is used up,
//! a bare `-- ` line ends the hunk and the rest of the file section is skipped.

use crate::models::{DiffLine, Hunk, LineKind, ParsedDiffFile};

const FILE_HEADER_PREFIX: &str = "diff --git ";
const HUNK_HEADER_PREFIX: &str = "@@ -";
const SIGNATURE_LINE: &str = "-- ";

/// Parse unified-diff text into per-file hunks.
///
/// Files without any hunk (binary changes, pure renames, mode changes) are
/// left out of the result.
pub fn parse_unified_diff(text: &str) -> Vec<ParsedDiffFile> {
    let mut files = Vec::new();
    let mut current: Option<FileBuilder> = None;

    for line in text.lines() {
        if let Some((old_path, new_path)) = parse_file_header(line) {
            if let Some(done) = current.take() {
                done.finish_into(&mut files);
            }
            current = Some(FileBuilder::new(old_path, new_path));
            continue;
        }

        let Some(file) = current.as_mut() else {
            // Preamble before the first file (commit message, mail headers)
            continue;
        };

        if line.starts_with(HUNK_HEADER_PREFIX)
            && let Some(range) = parse_hunk_header(line)
        {
            file.start_hunk(range);
            continue;
        }

        file.push_body_line(line);
    }

    if let Some(done) = current {
        done.finish_into(&mut files);
    }

    files
}

/// Old/new paths of every `diff --git` line, in order, without parsing hunks
pub fn diff_file_paths(text: &str) -> Vec<(String, String)> {
    text.lines().filter_map(parse_file_header).collect()
}

/// Split a `diff --git a/<old> b/<new>` line into its two paths
pub fn parse_file_header(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix(FILE_HEADER_PREFIX)?;

    if let Some(rest) = rest.strip_prefix("a/")
        && let Some(split) = rest.find(" b/")
    {
        return Some((rest[..split].to_string(), rest[split + 3..].to_string()));
    }

    // Non-default prefixes (--no-prefix, --src-prefix): fall back to two tokens
    let mut parts = rest.split_whitespace();
    let old_path = parts.next()?;
    let new_path = parts.next()?;
    Some((old_path.to_string(), new_path.to_string()))
}

/// Header ranges of a hunk: `(start, count)` for the old and new side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange {
    pub old_start: u32,
    pub old_line_count: u32,
    pub new_start: u32,
    pub new_line_count: u32,
}

/// Parse `@@ -a[,b] +c[,d] @@[ section]`. Omitted counts mean 1.
pub fn parse_hunk_header(line: &str) -> Option<HunkRange> {
    let rest = line.strip_prefix(HUNK_HEADER_PREFIX)?;
    let end = rest.find(" @@")?;
    let (old, new) = rest[..end].split_once(" +")?;

    let (old_start, old_line_count) = parse_range(old)?;
    let (new_start, new_line_count) = parse_range(new)?;
    Some(HunkRange { old_start, old_line_count, new_start, new_line_count })
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

/// Hunk being filled, with the old-side header count still to be seen
struct OpenHunk {
    hunk: Hunk,
    old_remaining: u32,
}

struct FileBuilder {
    old_path: String,
    new_path: String,
    hunks: Vec<Hunk>,
    open: Option<OpenHunk>,
}

impl FileBuilder {
    fn new(old_path: String, new_path: String) -> Self {
        Self { old_path, new_path, hunks: Vec::new(), open: None }
    }

    fn start_hunk(&mut self, range: HunkRange) {
        self.close_hunk();
        self.open = Some(OpenHunk {
            hunk: Hunk {
                old_start: range.old_start,
                old_line_count: range.old_line_count,
                new_start: range.new_start,
                new_line_count: range.new_line_count,
                lines: Vec::new(),
            },
            old_remaining: range.old_line_count,
        });
    }

    fn push_body_line(&mut self, line: &str) {
        let Some(open) = self.open.as_mut() else {
            // index/mode/---/+++ lines between the file header and the first hunk
            return;
        };

        if line.starts_with('\\') {
            // "\ No newline at end of file"
            return;
        }

        if line == SIGNATURE_LINE && open.old_remaining == 0 {
            // Lines after the signature belong to no hunk
            self.close_hunk();
            return;
        }

        let (kind, text) = classify(line);
        if kind != LineKind::Added {
            open.old_remaining = open.old_remaining.saturating_sub(1);
        }
        open.hunk.lines.push(DiffLine::new(kind, text));
    }

    fn close_hunk(&mut self) {
        if let Some(open) = self.open.take() {
            self.hunks.push(open.hunk);
        }
    }

    fn finish_into(mut self, files: &mut Vec<ParsedDiffFile>) {
        self.close_hunk();
        if self.hunks.is_empty() {
            tracing::debug!(path = %self.new_path, "Dropping diff file without hunks");
            return;
        }
        self.hunks.sort_by_key(|hunk| hunk.old_start);
        files.push(ParsedDiffFile {
            old_path: self.old_path,
            new_path: self.new_path,
            hunks: self.hunks,
        });
    }
}

/// Classify a body line by its marker column and strip the marker
fn classify(line: &str) -> (LineKind, &str) {
    if let Some(text) = line.strip_prefix('+') {
        (LineKind::Added, text)
    } else if let Some(text) = line.strip_prefix('-') {
        (LineKind::Removed, text)
    } else {
        // The marker column is dropped whatever it holds; an empty line is
        // blank context whose leading space was trimmed by an editor
        let mut chars = line.chars();
        chars.next();
        (LineKind::Context, chars.as_str())
    }
}
