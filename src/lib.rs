//! # texflat
//!
//! A library and CLI tools for flattening a TeX file hierarchy into a
//! single document, as required by arXiv and other submission systems. The
//! root file is read line by line and every `\input` directive is replaced
//! in place by the (recursively flattened) contents of the referenced file.
//!
//! ## Features
//!
//! - Resolve `\input{name}` against a base directory, trying `name.tex`
//!   before `name`
//! - Strip comments; a line ending in a comment keeps its trailing `%`
//! - Collapse runs of blank lines, including across file boundaries
//! - Walk the inclusion graph without writing output (dry run, listings)
//! - Distribute files into pattern-derived target directories (`texdist`)
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```no_run
//! use std::path::Path;
//! use texflat::{FlattenConfig, flatten_document};
//!
//! let config = FlattenConfig {
//!     base_dir: "doc".into(),
//! };
//! let mut sink = Vec::new();
//! let result = flatten_document(&config, Path::new("doc/document.tex"), &mut sink, |path| {
//!     eprintln!("Read file {}", path.display());
//! });
//! match result {
//!     Ok(()) => print!("{}", String::from_utf8_lossy(&sink)),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```
//!
//! ### As a CLI Tool
//!
//! ```bash
//! # Flatten doc/document.tex into a single file
//! texflat doc document.tex doc/document-arxiv.tex
//!
//! # Validate that every \input resolves
//! texflat doc document.tex --dry-run
//! ```

pub mod comment;
pub mod distribute;
pub mod error;
pub mod flatten;
pub mod include;

// Re-export main types and functions for convenience
pub use comment::{comment_index, normalize_line};
pub use distribute::{Distribution, DistributionMatch, TransferMode, TransferOptions, distribute};
pub use error::{Result, TexflatError};
pub use flatten::{FlattenConfig, IncludeRecord, flatten_document, walk_includes};
pub use include::{include_name, is_include, resolve_include};
