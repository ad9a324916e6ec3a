use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use texflat::{FlattenConfig, Result, walk_includes};

const LONG_HELP: &str = r#"
Input syntax:
  % comment            - stripped; a line ending in a comment keeps its '%'
  \% / \\%             - escaped percent / line break followed by a comment
  \input{name}         - replaced by the flattened contents of name.tex
                         (or name, if name.tex does not exist), resolved
                         against BASE_DIR

Examples:
  # Flatten doc/document.tex into doc/document-arxiv.tex
  texflat doc document.tex doc/document-arxiv.tex
  # Check that every \input resolves without writing anything
  texflat doc document.tex --dry-run
  # List the inclusion graph
  texflat doc document.tex --list
  # List with details and existence checks
  texflat doc document.tex --list=detailed
  # Output as JSON for scripting
  texflat doc document.tex --list=json

For more information, visit: https://github.com/jkappmeier/texflat
"#;

/// Flatten a TeX file hierarchy into a single submission-ready document.
#[derive(Parser, Debug)]
#[command(
    name = "texflat",
    version,
    about = "Flatten a TeX file hierarchy into a single submission-ready document.",
    after_long_help = LONG_HELP,
    after_help = "For more information, visit: https://github.com/jkappmeier/texflat"
)]
struct Cli {
    /// Directory that \input names are resolved against
    #[arg(value_name = "BASE_DIR")]
    base_dir: PathBuf,

    /// Root document, relative to the base directory
    #[arg(value_name = "ROOT_DOC")]
    root: String,

    /// Flattened output file (overwritten unconditionally)
    #[arg(value_name = "OUT_FILE", required_unless_present_any = ["dry_run", "list"])]
    output: Option<PathBuf>,

    /// Validate that every \input resolves, without writing output
    #[arg(long, conflicts_with = "list")]
    dry_run: bool,

    /// List inclusion directives (optionally with format: plain, detailed, json)
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, default_missing_value = "plain", conflicts_with = "dry_run")]
    list: Option<ListFormat>,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq)]
enum ListFormat {
    /// Simple list of inclusion names
    Plain,
    /// Detailed information about each directive
    Detailed,
    /// JSON output for scripting
    Json,
}

#[derive(Serialize, Deserialize)]
struct IncludeInfo {
    name: String,
    included_from: String,
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved: Option<String>,
    exists: bool,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => LogLevel::Error,
        (false, 0) => LogLevel::Warn,
        (false, 1) => LogLevel::Info,
        (false, 2) => LogLevel::Debug,
        (false, _) => LogLevel::Trace,
    };

    let config = FlattenConfig {
        base_dir: cli.base_dir.clone(),
    };
    let root = config.base_dir.join(&cli.root);

    let result = if cli.dry_run {
        dry_run(&config, &root, log_level)
    } else if let Some(list_format) = cli.list {
        list_includes(&config, &root, list_format)
    } else {
        flatten(&cli, &config, &root, log_level)
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn flatten(cli: &Cli, config: &FlattenConfig, root: &Path, log_level: LogLevel) -> Result<()> {
    // clap guarantees the output path is present outside dry-run/list
    let Some(output_path) = cli.output.clone() else {
        return Ok(());
    };

    log(
        log_level,
        LogLevel::Info,
        &format!(
            "Flattening {} into {}",
            root.display(),
            output_path.display()
        ),
    );

    let mut sink = BufWriter::new(File::create(&output_path)?);
    texflat::flatten_document(config, root, &mut sink, |path| {
        log(
            log_level,
            LogLevel::Info,
            &format!("Read file {}", path.display()),
        );
    })?;
    sink.flush()?;

    log(log_level, LogLevel::Info, "Processing complete!");
    Ok(())
}

fn dry_run(config: &FlattenConfig, root: &Path, log_level: LogLevel) -> Result<()> {
    log(
        log_level,
        LogLevel::Info,
        "Performing dry run - validating inclusions...",
    );

    let records = walk_includes(config, root)?;
    let records_count = records.len();

    let mut valid_count = 0;
    let mut invalid_count = 0;

    for record in &records {
        match &record.resolved {
            Some(path) => {
                log(
                    log_level,
                    LogLevel::Info,
                    &format!("✓ \\input{{{}}} -> {}", record.name, path.display()),
                );
                valid_count += 1;
            }
            None => {
                log(
                    log_level,
                    LogLevel::Warn,
                    &format!(
                        "✗ \\input{{{}}} ({}, line {}) (not found)",
                        record.name,
                        record.included_from.display(),
                        record.line
                    ),
                );
                invalid_count += 1;
            }
        }
    }

    println!("\nSummary: {records_count} inclusions found");
    if valid_count > 0 {
        println!("  ✓ {valid_count} valid");
    }
    if invalid_count > 0 {
        println!("  ✗ {invalid_count} invalid");
    }

    if invalid_count > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn list_includes(config: &FlattenConfig, root: &Path, format: ListFormat) -> Result<()> {
    let records = walk_includes(config, root)?;

    match format {
        ListFormat::Plain => {
            for record in &records {
                println!("{}", record.name);
            }
        }
        ListFormat::Detailed => {
            for record in &records {
                println!("Include: \\input{{{}}}", record.name);
                println!(
                    "  From: {}, line {}",
                    record.included_from.display(),
                    record.line
                );
                match &record.resolved {
                    Some(path) => {
                        println!("  Path: {}", path.display());
                        if let Ok(metadata) = std::fs::metadata(path) {
                            println!("  Size: {} bytes", metadata.len());
                        }
                    }
                    None => {
                        println!("  Path: not found");
                    }
                }
                println!();
            }
        }
        ListFormat::Json => {
            let infos: Vec<IncludeInfo> = records
                .iter()
                .map(|record| IncludeInfo {
                    name: record.name.clone(),
                    included_from: record.included_from.display().to_string(),
                    line: record.line,
                    resolved: record
                        .resolved
                        .as_ref()
                        .map(|path| path.display().to_string()),
                    exists: record.resolved.is_some(),
                })
                .collect();

            let json = serde_json::to_string_pretty(&infos)?;
            println!("{json}");
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

fn log(current_level: LogLevel, message_level: LogLevel, message: &str) {
    if message_level >= current_level {
        eprintln!(
            "[{}] {}",
            match message_level {
                LogLevel::Trace => "TRACE",
                LogLevel::Debug => "DEBUG",
                LogLevel::Info => "INFO",
                LogLevel::Warn => "WARN",
                LogLevel::Error => "ERROR",
            },
            message
        );
    }
}
