use clap::Parser;
use std::path::PathBuf;
use texflat::{Distribution, TransferMode, TransferOptions, distribute};

const LONG_HELP: &str = r#"
Templates:
  {0}, {1}, ...        - capture groups from the pattern ({0} is the first)
  {0:DEC}              - group parsed as an integer and decremented by one
                         (no padding: "03" becomes 2)

Examples:
  # Sort scans into per-year folders, renamed to date-first
  texdist 'scan-([a-z0-9]*)_(\d{4})-(\d{2})-(\d{2})' \
      '/archive/{1}' '{1}-{2}-{3}_{0}' -d ~/Downloads
  # Same, but keep the originals
  texdist 'scan-([a-z0-9]*)_(\d{4})-(\d{2})-(\d{2})' \
      '/archive/{1}' '{1}-{2}-{3}_{0}' -d ~/Downloads --copy
  # Show what would happen first
  texdist 'scan-([a-z0-9]*)_(\d{4})-(\d{2})-(\d{2})' \
      '/archive/{1}' '{1}-{2}-{3}_{0}' -d ~/Downloads --dry-run
"#;

/// Distribute files matching a pattern into pattern-derived destinations.
#[derive(Parser, Debug)]
#[command(
    name = "texdist",
    version,
    about = "Distribute files matching a pattern into pattern-derived destinations.",
    after_long_help = LONG_HELP
)]
struct Cli {
    /// Pattern with capture groups, matched against file names
    #[arg(value_name = "PATTERN")]
    pattern: String,

    /// Target directory template; may reference capture groups as {i}
    #[arg(value_name = "TARGET_DIR")]
    target_directory: String,

    /// Target file name template; may reference capture groups as {i}
    #[arg(value_name = "TARGET_NAME")]
    target_file_name: String,

    /// Directory containing the files to distribute
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Copy files instead of moving them
    #[arg(long)]
    copy: bool,

    /// Report transfers without touching any file
    #[arg(long)]
    dry_run: bool,

    /// When enabled, additional output is available
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let result = run(&cli);
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> texflat::Result<()> {
    if cli.verbose {
        eprintln!("Pattern: {}", cli.pattern);
        eprintln!("Target directory: {}", cli.target_directory);
        eprintln!("Target file name: {}", cli.target_file_name);
    }

    let distribution = Distribution::new(
        &cli.pattern,
        &cli.target_directory,
        &cli.target_file_name,
    )?;
    let options = TransferOptions {
        mode: if cli.copy {
            TransferMode::Copy
        } else {
            TransferMode::Move
        },
        dry_run: cli.dry_run,
    };

    let action = match (cli.dry_run, cli.copy) {
        (true, _) => "Distribute",
        (false, true) => "Copy",
        (false, false) => "Move",
    };
    distribute(&cli.directory, &distribution, &options, |source, destination| {
        eprintln!(
            "{} from: '{}' to '{}'",
            action,
            source.display(),
            destination.display()
        );
    })
}
