use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for texflat operations
#[derive(Error, Debug)]
pub enum TexflatError {
    /// IO error when reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// File not found error with specific path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// An \input directive referenced a file that exists under neither
    /// candidate name
    #[error("Could not resolve \\input{{{name}}} ({file}, line {line})")]
    IncludeNotFound {
        name: String,
        file: PathBuf,
        line: usize,
    },

    /// An \input directive without a well-formed braced name
    #[error("Malformed \\input directive ({file}, line {line})")]
    MalformedDirective { file: PathBuf, line: usize },

    /// A target template referenced a capture group the pattern does not have
    #[error("Capture group {{{index}}} is out of range for the pattern")]
    GroupOutOfRange { index: usize },

    /// A group operation needed a number but the captured text is not one
    #[error("Capture group {{{index}}} captured non-numeric text: {value}")]
    NonNumericGroup { index: usize, value: String },

    /// A target template used an operation the distributor does not know
    #[error("Unknown group operation: {operation}")]
    UnknownGroupOperation { operation: String },

    /// Two source files resolved to the same destination
    #[error("{destination} would be overwritten by {source_file}")]
    DestinationCollision {
        destination: PathBuf,
        source_file: PathBuf,
    },

    /// Regex compilation error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TexflatError>;
