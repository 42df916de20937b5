//! Terminal output sanitization
//!
//! # Security: Terminal Injection Prevention
//!
//! Trajectory logs carry command output captured from real terminals, so titles
//! and contents routinely contain ANSI escape sequences (colors, cursor moves,
//! screen clears). Anything the CLI prints from a trajectory goes through
//! [`strip_ansi_codes`] or [`single_line`] first.

/// Strips ANSI CSI escape sequences and control characters
///
/// Tab, newline and carriage return are kept.
///
/// # Examples
///
/// ```
/// use trajectory_viewer::utils::terminal::strip_ansi_codes;
///
/// let output = "\x1b[32mPASSED\x1b[0m tests/test_core.py";
/// assert_eq!(strip_ansi_codes(output), "PASSED tests/test_core.py");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        // CSI sequence: ESC [ params final-letter
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next_ch in chars.by_ref() {
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Sanitized first line of `text`, cut to `max_chars` characters with `...`
pub fn single_line(text: &str, max_chars: usize) -> String {
    let clean = strip_ansi_codes(text);
    let first = clean.lines().next().unwrap_or("").trim_end();

    if first.chars().count() <= max_chars {
        return first.to_string();
    }
    let mut cut: String = first.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_colored_pytest_output() {
        let text = "\x1b[1m\x1b[31mFAILED\x1b[0m test_x.py::test_add - assert 1 == 2";
        assert_eq!(strip_ansi_codes(text), "FAILED test_x.py::test_add - assert 1 == 2");
    }

    #[test]
    fn test_strip_screen_clear() {
        assert_eq!(strip_ansi_codes("\x1b[2J\x1b[H$ ls"), "$ ls");
    }

    #[test]
    fn test_strip_bell_and_backspace() {
        assert_eq!(strip_ansi_codes("done\x07\x08"), "done");
    }

    #[test]
    fn test_strip_keeps_whitespace_controls() {
        let text = "line 1\nline 2\r\n\tindented";
        assert_eq!(strip_ansi_codes(text), text);
    }

    #[test]
    fn test_strip_unicode() {
        assert_eq!(strip_ansi_codes("✅ \x1b[32mok\x1b[0m"), "✅ ok");
    }

    #[test]
    fn test_strip_empty_and_only_escapes() {
        assert_eq!(strip_ansi_codes(""), "");
        assert_eq!(strip_ansi_codes("\x1b[31m\x1b[0m"), "");
    }

    #[test]
    fn test_single_line_takes_first_line() {
        assert_eq!(single_line("first\nsecond", 80), "first");
    }

    #[test]
    fn test_single_line_truncates() {
        assert_eq!(single_line("abcdefghij", 4), "abcd...");
        assert_eq!(single_line("abcd", 4), "abcd");
    }

    #[test]
    fn test_single_line_empty() {
        assert_eq!(single_line("", 10), "");
    }
}
