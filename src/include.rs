//! Recognition and resolution of `\input` directives.
//!
//! A directive is a normalized line whose content starts with `\input`; the
//! referenced name sits between the first pair of curly braces. Names are
//! resolved relative to the base directory, preferring the name with the
//! `.tex` suffix appended over the bare name.

use std::path::{Path, PathBuf};

/// Token that opens an inclusion directive.
pub const INPUT_TOKEN: &str = r"\input";

/// Suffix appended to an inclusion name for the preferred resolution
/// candidate.
pub const TEX_SUFFIX: &str = "tex";

/// Tests whether a normalized line is an inclusion directive.
pub fn is_include(normalized: &str) -> bool {
    normalized.starts_with(INPUT_TOKEN)
}

/// Extracts the referenced name from an inclusion directive line.
///
/// The name is the text between the first `{` and the first `}` after it.
/// This is a first-match extraction: a brace group appearing on the line
/// before the real argument yields the wrong name. Returns `None` when
/// either brace is missing.
pub fn include_name(line: &str) -> Option<&str> {
    let open = line.find('{')?;
    let rest = &line[open + 1..];
    let close = rest.find('}')?;
    Some(&rest[..close])
}

/// Resolves an inclusion name to an existing file under `base_dir`.
///
/// Tries `name.tex` first, then `name` as written. Returns `None` when
/// neither names a regular file; the caller turns that into a fatal error
/// carrying the including file and line.
pub fn resolve_include(base_dir: &Path, name: &str) -> Option<PathBuf> {
    let suffixed = base_dir.join(format!("{name}.{TEX_SUFFIX}"));
    if suffixed.is_file() {
        return Some(suffixed);
    }
    let bare = base_dir.join(name);
    if bare.is_file() { Some(bare) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_include() {
        assert!(is_include(r"\input{chapters/intro}"));
        assert!(is_include(r"\input{child} %"));
        assert!(!is_include(r"\section{Introduction}"));
        assert!(!is_include(r"text \input{child}"));
        assert!(!is_include(""));
    }

    #[test]
    fn test_include_name_basic() {
        assert_eq!(include_name(r"\input{child}"), Some("child"));
        assert_eq!(
            include_name(r"\input{chapters/intro}"),
            Some("chapters/intro")
        );
    }

    #[test]
    fn test_include_name_with_trailing_comment() {
        assert_eq!(include_name(r"\input{child} %"), Some("child"));
    }

    #[test]
    fn test_include_name_first_match() {
        // only the first brace pair counts
        assert_eq!(include_name(r"\input{a}{b}"), Some("a"));
    }

    #[test]
    fn test_include_name_missing_braces() {
        assert_eq!(include_name(r"\input"), None);
        assert_eq!(include_name(r"\input{child"), None);
    }

    #[test]
    fn test_resolve_prefers_suffixed() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::write(base.join("child.tex"), "suffixed").unwrap();
        fs::write(base.join("child"), "bare").unwrap();

        let resolved = resolve_include(base, "child").unwrap();
        assert_eq!(resolved, base.join("child.tex"));
    }

    #[test]
    fn test_resolve_falls_back_to_bare_name() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::write(base.join("child"), "bare").unwrap();

        let resolved = resolve_include(base, "child").unwrap();
        assert_eq!(resolved, base.join("child"));
    }

    #[test]
    fn test_resolve_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::create_dir(base.join("chapters")).unwrap();
        fs::write(base.join("chapters/intro.tex"), "intro").unwrap();

        let resolved = resolve_include(base, "chapters/intro").unwrap();
        assert_eq!(resolved, base.join("chapters/intro.tex"));
    }

    #[test]
    fn test_resolve_missing() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(resolve_include(temp_dir.path(), "nonexistent"), None);
    }

    #[test]
    fn test_resolve_ignores_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::create_dir(base.join("child")).unwrap();
        assert_eq!(resolve_include(base, "child"), None);
    }
}
