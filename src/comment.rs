//! Comment detection and line cleanup for TeX source.
//!
//! A comment starts at the first `%` that is not escaped as `\%`. The escape
//! itself can be escaped: in `\\%` the backslashes form a line break command
//! and the `%` is a real comment start.

/// Placeholder that masks escape sequences; contains neither `%` nor `\`.
const MASK: &str = "@@";

/// Returns the byte offset at which a comment starts on `line`, or
/// `line.len()` if the line has no comment.
///
/// Scanning for `\%` directly is not feasible because the backslash may
/// belong to a construct like `\\%`. Instead every `\\` is masked first,
/// then every remaining `\%`; the first `%` left standing is the comment
/// start. Both masks keep the byte length, so the offset found in the
/// masked copy is valid for the original line.
pub fn comment_index(line: &str) -> usize {
    let masked = line.replace(r"\\", MASK).replace(r"\%", MASK);
    masked.find('%').unwrap_or(masked.len())
}

/// Normalizes one line of TeX source for the flattened output.
///
/// Surrounding whitespace is trimmed and any comment text is dropped. A line
/// that ends in a comment keeps a single trailing `%` so that its
/// end-of-line behavior is unchanged. Returns the empty string for lines
/// that are whitespace-only or comment-only; callers treat that as blank.
pub fn normalize_line(line: &str) -> String {
    let stripped = line.trim();
    if stripped.is_empty() {
        return String::new();
    }
    let end = (comment_index(stripped) + 1).min(stripped.len());
    let kept = &stripped[..end];
    if kept.is_empty() || kept == "%" {
        String::new()
    } else {
        kept.to_string()
    }
}
