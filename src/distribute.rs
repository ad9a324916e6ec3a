//! Batch distribution of files into pattern-derived destinations.
//!
//! Files in a source directory whose names match a regular expression are
//! moved or copied into a target directory. Both the target directory and
//! the target file name are templates that may reference capture groups
//! from the matched name as `{i}`, optionally transformed by a group
//! operation such as `{i:DEC}` (parse as integer, subtract one).

use crate::error::{Result, TexflatError};
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder syntax inside target templates: `{i}` or `{i:OP}`.
/// Indices are 0-based over the pattern's capture groups.
const INDEX_PATTERN: &str = r"\{(\d+)(?::([A-Z]+))?\}";

/// Whether matched files are moved or copied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Move,
    Copy,
}

/// Options controlling how matched files are transferred
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub mode: TransferMode,
    /// Report transfers without touching any file
    pub dry_run: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            mode: TransferMode::Move,
            dry_run: false,
        }
    }
}

/// A compiled matching pattern together with its two target templates
#[derive(Debug)]
pub struct Distribution {
    regex: Regex,
    index_regex: Regex,
    target_directory: String,
    target_file_name: String,
}

impl Distribution {
    /// Compiles `pattern` and prepares the target templates.
    ///
    /// # Errors
    ///
    /// Returns `TexflatError::Regex` if `pattern` is not a valid regular
    /// expression.
    pub fn new(pattern: &str, target_directory: &str, target_file_name: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            index_regex: Regex::new(INDEX_PATTERN)?,
            target_directory: target_directory.to_string(),
            target_file_name: target_file_name.to_string(),
        })
    }

    /// Matches a file name against the pattern, anchored at the start of
    /// the name. Returns `None` for non-matching names.
    pub fn matches<'d, 't>(&'d self, name: &'t str) -> Option<DistributionMatch<'d, 't>> {
        let caps = self.regex.captures(name)?;
        if caps.get(0)?.start() != 0 {
            return None;
        }
        Some(DistributionMatch {
            distribution: self,
            caps,
        })
    }
}

/// A single file name matched by a [`Distribution`]
#[derive(Debug)]
pub struct DistributionMatch<'d, 't> {
    distribution: &'d Distribution,
    caps: Captures<'t>,
}

impl DistributionMatch<'_, '_> {
    /// Expands the target directory template for this match.
    ///
    /// # Errors
    ///
    /// See [`DistributionMatch::target_file`].
    pub fn target_directory(&self) -> Result<String> {
        self.expand(&self.distribution.target_directory)
    }

    /// Expands the target file name template for this match.
    ///
    /// # Errors
    ///
    /// - `TexflatError::GroupOutOfRange` if the template references a group
    ///   the pattern does not capture.
    /// - `TexflatError::NonNumericGroup` if a numeric operation is applied
    ///   to text that does not parse as an integer.
    /// - `TexflatError::UnknownGroupOperation` for an operation other than
    ///   `DEC`.
    pub fn target_file(&self) -> Result<String> {
        self.expand(&self.distribution.target_file_name)
    }

    fn expand(&self, template: &str) -> Result<String> {
        let mut expanded = String::new();
        let mut last = 0;
        for placeholder in self.distribution.index_regex.captures_iter(template) {
            let (Some(whole), Some(index_match)) = (placeholder.get(0), placeholder.get(1)) else {
                continue;
            };
            expanded.push_str(&template[last..whole.start()]);

            let index: usize = index_match.as_str().parse().unwrap_or(usize::MAX);
            let group = self
                .caps
                .get(index.saturating_add(1))
                .ok_or(TexflatError::GroupOutOfRange { index })?
                .as_str();

            match placeholder.get(2).map(|op| op.as_str()) {
                None => expanded.push_str(group),
                Some("DEC") => {
                    let value: i64 =
                        group
                            .parse()
                            .map_err(|_| TexflatError::NonNumericGroup {
                                index,
                                value: group.to_string(),
                            })?;
                    // no padding is applied: "03" decrements to "2"
                    expanded.push_str(&(value - 1).to_string());
                }
                Some(operation) => {
                    return Err(TexflatError::UnknownGroupOperation {
                        operation: operation.to_string(),
                    });
                }
            }
            last = whole.end();
        }
        expanded.push_str(&template[last..]);
        Ok(expanded)
    }
}

/// Distributes every matching file in `directory`.
///
/// For each regular file whose name matches the pattern, the target
/// directory and file name templates are expanded, the target directory is
/// created if needed, and the file is moved or copied there. `on_transfer`
/// observes each (source, destination) pair before the transfer happens.
/// Transfers already performed are not undone when a later one fails.
///
/// # Errors
///
/// - `TexflatError::DestinationCollision` if two source files expand to the
///   same destination (also detected in dry-run mode).
/// - Template expansion errors from [`DistributionMatch::target_file`].
/// - `TexflatError::Io` on directory listing or transfer failures.
pub fn distribute<F>(
    directory: &Path,
    distribution: &Distribution,
    options: &TransferOptions,
    mut on_transfer: F,
) -> Result<()>
where
    F: FnMut(&Path, &Path),
{
    let mut distributed: HashSet<PathBuf> = HashSet::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(matched) = distribution.matches(name) else {
            continue;
        };

        let target_directory = PathBuf::from(matched.target_directory()?);
        let destination = target_directory.join(matched.target_file()?);
        let source = entry.path();
        if !distributed.insert(destination.clone()) {
            return Err(TexflatError::DestinationCollision {
                destination,
                source_file: source,
            });
        }

        on_transfer(&source, &destination);
        if options.dry_run {
            continue;
        }
        fs::create_dir_all(&target_directory)?;
        match options.mode {
            TransferMode::Copy => {
                fs::copy(&source, &destination)?;
            }
            TransferMode::Move => fs::rename(&source, &destination)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TEST_PATTERN: &str = r"prefix-([a-z0-9]*)_(\d{4})-(\d{2})-(\d{2})([a-z-]*)";
    const MATCHING_INPUT: &str = "prefix-move2end_2021-03-19";

    #[test]
    fn test_new_rejects_invalid_pattern() {
        let result = Distribution::new("(unclosed", "", "");
        assert!(matches!(result, Err(TexflatError::Regex(_))));
    }

    #[test]
    fn test_non_match() {
        let distribution = Distribution::new(TEST_PATTERN, "", "").unwrap();
        assert!(distribution.matches("non-matching").is_none());
    }

    #[test]
    fn test_match_anchored_at_start() {
        let distribution = Distribution::new(TEST_PATTERN, "", "").unwrap();
        assert!(distribution.matches(MATCHING_INPUT).is_some());
        // the pattern must match from the first character of the name
        assert!(distribution.matches("x-prefix-move2end_2021-03-19").is_none());
    }

    #[test]
    fn test_template_expansion() {
        let distribution = Distribution::new(
            TEST_PATTERN,
            "/target/directory/{1}",
            "{1}-{2}-{3}_{0}",
        )
        .unwrap();
        let matched = distribution.matches(MATCHING_INPUT).unwrap();
        assert_eq!(matched.target_directory().unwrap(), "/target/directory/2021");
        assert_eq!(matched.target_file().unwrap(), "2021-03-19_move2end");
    }

    #[test]
    fn test_template_decrement() {
        let distribution = Distribution::new(
            TEST_PATTERN,
            "/target/directory/{1:DEC}",
            "{1}-{2:DEC}-{3:DEC}_{0}",
        )
        .unwrap();
        let matched = distribution.matches(MATCHING_INPUT).unwrap();
        assert_eq!(matched.target_directory().unwrap(), "/target/directory/2020");
        // observe, no zero padding is applied
        assert_eq!(matched.target_file().unwrap(), "2021-2-18_move2end");
    }

    #[test]
    fn test_template_without_placeholders() {
        let distribution = Distribution::new(TEST_PATTERN, "/plain/dir", "plain-name").unwrap();
        let matched = distribution.matches(MATCHING_INPUT).unwrap();
        assert_eq!(matched.target_directory().unwrap(), "/plain/dir");
        assert_eq!(matched.target_file().unwrap(), "plain-name");
    }

    #[test]
    fn test_template_group_out_of_range() {
        let distribution = Distribution::new(TEST_PATTERN, "", "{9}").unwrap();
        let matched = distribution.matches(MATCHING_INPUT).unwrap();
        let result = matched.target_file();
        assert!(matches!(
            result,
            Err(TexflatError::GroupOutOfRange { index: 9 })
        ));
    }

    #[test]
    fn test_template_non_numeric_group() {
        let distribution = Distribution::new(TEST_PATTERN, "", "{0:DEC}").unwrap();
        let matched = distribution.matches(MATCHING_INPUT).unwrap();
        let result = matched.target_file();
        assert!(matches!(result, Err(TexflatError::NonNumericGroup { .. })));
    }

    #[test]
    fn test_template_unknown_operation() {
        let distribution = Distribution::new(TEST_PATTERN, "", "{1:HEX}").unwrap();
        let matched = distribution.matches(MATCHING_INPUT).unwrap();
        let result = matched.target_file();
        match result {
            Err(TexflatError::UnknownGroupOperation { operation }) => {
                assert_eq!(operation, "HEX");
            }
            other => panic!("expected UnknownGroupOperation, got {other:?}"),
        }
    }

    fn create_dirs(root: &Path) -> (PathBuf, PathBuf) {
        let source = root.join("distribution_source");
        fs::create_dir(&source).unwrap();
        let target = root.join("distribution_target");
        fs::create_dir(&target).unwrap();
        (source, target)
    }

    fn test_distribution(target: &Path) -> Distribution {
        Distribution::new(
            TEST_PATTERN,
            &format!("{}/{{1}}", target.display()),
            "{1}-{2}-{3}_{0}",
        )
        .unwrap()
    }

    #[test]
    fn test_distribute_moves_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        let (source, target) = create_dirs(temp_dir.path());
        fs::write(source.join(MATCHING_INPUT), "payload").unwrap();
        fs::write(source.join("non-matching"), "left alone").unwrap();

        let distribution = test_distribution(&target);
        let options = TransferOptions::default();
        distribute(&source, &distribution, &options, |_, _| {}).unwrap();

        let destination = target.join("2021").join("2021-03-19_move2end");
        assert!(destination.is_file());
        assert!(!source.join(MATCHING_INPUT).exists());
        assert!(source.join("non-matching").exists());
    }

    #[test]
    fn test_distribute_copy_keeps_source() {
        let temp_dir = TempDir::new().unwrap();
        let (source, target) = create_dirs(temp_dir.path());
        fs::write(source.join(MATCHING_INPUT), "payload").unwrap();

        let distribution = test_distribution(&target);
        let options = TransferOptions {
            mode: TransferMode::Copy,
            dry_run: false,
        };
        distribute(&source, &distribution, &options, |_, _| {}).unwrap();

        let destination = target.join("2021").join("2021-03-19_move2end");
        assert!(destination.is_file());
        assert!(source.join(MATCHING_INPUT).exists());
        assert_eq!(fs::read_to_string(destination).unwrap(), "payload");
    }

    #[test]
    fn test_distribute_dry_run_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let (source, target) = create_dirs(temp_dir.path());
        fs::write(source.join(MATCHING_INPUT), "payload").unwrap();

        let distribution = test_distribution(&target);
        let options = TransferOptions {
            mode: TransferMode::Move,
            dry_run: true,
        };
        let mut planned = Vec::new();
        distribute(&source, &distribution, &options, |src, dst| {
            planned.push((src.to_path_buf(), dst.to_path_buf()));
        })
        .unwrap();

        assert_eq!(planned.len(), 1);
        assert!(source.join(MATCHING_INPUT).exists());
        assert!(!target.join("2021").exists());
    }

    #[test]
    fn test_distribute_collision() {
        let temp_dir = TempDir::new().unwrap();
        let (source, target) = create_dirs(temp_dir.path());
        // both names expand to the same destination
        fs::write(source.join("prefix-aaa_2021-03-19"), "first").unwrap();
        fs::write(source.join("prefix-bbb_2021-03-19"), "second").unwrap();

        let distribution = Distribution::new(
            TEST_PATTERN,
            &format!("{}/{{1}}", target.display()),
            "{1}-{2}-{3}",
        )
        .unwrap();
        let options = TransferOptions::default();
        let result = distribute(&source, &distribution, &options, |_, _| {});
        assert!(matches!(
            result,
            Err(TexflatError::DestinationCollision { .. })
        ));
    }

    #[test]
    fn test_distribute_collision_detected_in_dry_run() {
        let temp_dir = TempDir::new().unwrap();
        let (source, target) = create_dirs(temp_dir.path());
        fs::write(source.join("prefix-aaa_2021-03-19"), "first").unwrap();
        fs::write(source.join("prefix-bbb_2021-03-19"), "second").unwrap();

        let distribution = Distribution::new(
            TEST_PATTERN,
            &format!("{}/{{1}}", target.display()),
            "{1}-{2}-{3}",
        )
        .unwrap();
        let options = TransferOptions {
            mode: TransferMode::Move,
            dry_run: true,
        };
        let result = distribute(&source, &distribution, &options, |_, _| {});
        assert!(matches!(
            result,
            Err(TexflatError::DestinationCollision { .. })
        ));
        assert!(source.join("prefix-aaa_2021-03-19").exists());
        assert!(source.join("prefix-bbb_2021-03-19").exists());
    }

    #[test]
    fn test_distribute_reports_transfers() {
        let temp_dir = TempDir::new().unwrap();
        let (source, target) = create_dirs(temp_dir.path());
        fs::write(source.join(MATCHING_INPUT), "payload").unwrap();

        let distribution = test_distribution(&target);
        let options = TransferOptions::default();
        let mut transfers = Vec::new();
        distribute(&source, &distribution, &options, |src, dst| {
            transfers.push((src.to_path_buf(), dst.to_path_buf()));
        })
        .unwrap();

        assert_eq!(
            transfers,
            vec![(
                source.join(MATCHING_INPUT),
                target.join("2021").join("2021-03-19_move2end"),
            )]
        );
    }
}
