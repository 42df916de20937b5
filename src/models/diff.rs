use serde::{Deserialize, Serialize};

/// Classification of one hunk body line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Context,
    Added,
    Removed,
}

impl LineKind {
    fn in_old(self) -> bool {
        matches!(self, LineKind::Context | LineKind::Removed)
    }

    fn in_new(self) -> bool {
        matches!(self, LineKind::Context | LineKind::Added)
    }
}

/// One hunk body line with its marker column stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
}

impl DiffLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

/// A contiguous region of change, with 1-based header ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hunk {
    pub old_start: u32,
    pub old_line_count: u32,
    pub new_start: u32,
    pub new_line_count: u32,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Text of the old side: context and removed lines in order
    pub fn old_content(&self) -> String {
        let mut out = String::new();
        self.write_side(&mut out, LineKind::in_old);
        out
    }

    /// Text of the new side: context and added lines in order
    pub fn new_content(&self) -> String {
        let mut out = String::new();
        self.write_side(&mut out, LineKind::in_new);
        out
    }

    fn write_side(&self, out: &mut String, keep: fn(LineKind) -> bool) {
        for line in self.lines.iter().filter(|l| keep(l.kind)) {
            out.push_str(&line.text);
            out.push('\n');
        }
    }
}

/// Added/removed line totals for one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

/// One file's worth of a unified diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDiffFile {
    pub old_path: String,
    pub new_path: String,
    pub hunks: Vec<Hunk>,
}

impl ParsedDiffFile {
    /// Old-side text of every hunk, concatenated in hunk order
    pub fn old_content(&self) -> String {
        let mut out = String::new();
        for hunk in &self.hunks {
            hunk.write_side(&mut out, LineKind::in_old);
        }
        out
    }

    /// New-side text of every hunk, concatenated in hunk order
    pub fn new_content(&self) -> String {
        let mut out = String::new();
        for hunk in &self.hunks {
            hunk.write_side(&mut out, LineKind::in_new);
        }
        out
    }

    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats::default();
        for line in self.hunks.iter().flat_map(|h| &h.lines) {
            match line.kind {
                LineKind::Added => stats.added += 1,
                LineKind::Removed => stats.removed += 1,
                LineKind::Context => {}
            }
        }
        stats
    }
}
