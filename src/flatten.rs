//! Recursive flattening of a TeX file hierarchy into one document.
//!
//! The root file is read line by line; every line is normalized (comments
//! stripped, whitespace trimmed) and runs of blank lines are collapsed to a
//! single blank line. A line holding an `\input` directive is replaced in
//! place by the flattened contents of the referenced file. The blank-line
//! state is threaded through the recursion so collapsing works across file
//! boundaries.

use crate::comment::normalize_line;
use crate::error::{Result, TexflatError};
use crate::include::{include_name, is_include, resolve_include};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Configuration for a flattening run
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Base directory that inclusion names are resolved against
    pub base_dir: PathBuf,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            base_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

/// One `\input` directive seen while walking the inclusion graph
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeRecord {
    /// The name as written between the braces
    pub name: String,
    /// File the directive appeared in
    pub included_from: PathBuf,
    /// 1-based line number of the directive
    pub line: usize,
    /// Resolved path, or `None` if neither candidate exists
    pub resolved: Option<PathBuf>,
}

/// Decides what to emit for a normalized line.
///
/// A blank line following another blank line is dropped; otherwise a blank
/// line passes through once. Returns the text to emit (if any) and the new
/// "last emitted line was blank" state.
fn collapse(normalized: &str, last_blank: bool) -> (Option<&str>, bool) {
    if normalized.is_empty() {
        if last_blank { (None, true) } else { (Some(""), true) }
    } else {
        (Some(normalized), false)
    }
}

/// Flattens the document rooted at `root` into `sink`.
///
/// `on_include` is invoked with the resolved path of every file pulled in,
/// in inclusion order. Each emitted line is terminated with a single
/// newline. The sink is left partially written if an error occurs.
///
/// # Errors
///
/// - `TexflatError::FileNotFound` if `root` is not an existing file.
/// - `TexflatError::IncludeNotFound` if a directive resolves to no file.
/// - `TexflatError::MalformedDirective` if a directive lacks a braced name.
/// - `TexflatError::Io` on read or write failures.
pub fn flatten_document<W, F>(
    config: &FlattenConfig,
    root: &Path,
    sink: &mut W,
    mut on_include: F,
) -> Result<()>
where
    W: Write,
    F: FnMut(&Path),
{
    if !root.is_file() {
        return Err(TexflatError::FileNotFound {
            path: root.to_path_buf(),
        });
    }
    flatten_file(config, root, sink, false, &mut on_include)?;
    Ok(())
}

/// Flattens one file, returning the blank state after its last line.
fn flatten_file<W, F>(
    config: &FlattenConfig,
    file: &Path,
    sink: &mut W,
    mut last_blank: bool,
    on_include: &mut F,
) -> Result<bool>
where
    W: Write,
    F: FnMut(&Path),
{
    let reader = BufReader::new(File::open(file)?);
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let normalized = normalize_line(&line);

        if is_include(&normalized) {
            let name = include_name(&normalized).ok_or_else(|| {
                TexflatError::MalformedDirective {
                    file: file.to_path_buf(),
                    line: index + 1,
                }
            })?;
            let target = resolve_include(&config.base_dir, name).ok_or_else(|| {
                TexflatError::IncludeNotFound {
                    name: name.to_string(),
                    file: file.to_path_buf(),
                    line: index + 1,
                }
            })?;
            on_include(&target);
            // the directive line itself is never written; the blank state
            // passes through it untouched so runs collapse across the
            // file boundary in both directions
            last_blank = flatten_file(config, &target, sink, last_blank, on_include)?;
            continue;
        }

        let (emitted, next_blank) = collapse(&normalized, last_blank);
        last_blank = next_blank;
        if let Some(text) = emitted {
            writeln!(sink, "{text}")?;
        }
    }
    Ok(last_blank)
}

/// Walks the inclusion graph without writing any output.
///
/// Produces one record per `\input` directive in traversal order. Unlike
/// [`flatten_document`], an unresolvable name is recorded rather than
/// fatal; the walk just does not descend into it.
///
/// # Errors
///
/// - `TexflatError::FileNotFound` if `root` is not an existing file.
/// - `TexflatError::MalformedDirective` if a directive lacks a braced name.
/// - `TexflatError::Io` on read failures.
pub fn walk_includes(config: &FlattenConfig, root: &Path) -> Result<Vec<IncludeRecord>> {
    if !root.is_file() {
        return Err(TexflatError::FileNotFound {
            path: root.to_path_buf(),
        });
    }
    let mut records = Vec::new();
    walk_file(config, root, &mut records)?;
    Ok(records)
}

fn walk_file(config: &FlattenConfig, file: &Path, records: &mut Vec<IncludeRecord>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let normalized = normalize_line(&line);
        if !is_include(&normalized) {
            continue;
        }
        let name = include_name(&normalized).ok_or_else(|| TexflatError::MalformedDirective {
            file: file.to_path_buf(),
            line: index + 1,
        })?;
        let resolved = resolve_include(&config.base_dir, name);
        records.push(IncludeRecord {
            name: name.to_string(),
            included_from: file.to_path_buf(),
            line: index + 1,
            resolved: resolved.clone(),
        });
        if let Some(target) = resolved {
            walk_file(config, &target, records)?;
        }
    }
    Ok(())
}
