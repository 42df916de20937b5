use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Validates that a file's size is within `max_bytes`
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be modified between the size check
/// and the read.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than `max_bytes`
pub fn validate_file_size(file: &File, path: &Path, max_bytes: u64) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > max_bytes {
        bail!("File too large: {} ({} bytes, max {} bytes)", path.display(), file_size, max_bytes);
    }

    Ok(())
}

/// Reads a whole file as UTF-8 after checking its size against `max_bytes`
///
/// The read itself is also capped, so a file that grows after the size check
/// still cannot exceed the limit.
pub fn read_to_string_limited(path: &Path, max_bytes: u64) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    validate_file_size(&file, path, max_bytes)?;

    let mut content = String::new();
    file.take(max_bytes + 1)
        .read_to_string(&mut content)
        .with_context(|| format!("Failed to read file as UTF-8: {}", path.display()))?;

    if content.len() as u64 > max_bytes {
        bail!("File too large: {} (grew past {} bytes while reading)", path.display(), max_bytes);
    }

    Ok(content)
}

/// Whether the path names a JSON Lines file (`.jsonl`, case-insensitive)
pub fn is_jsonl_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"))
}
