//! Error types for the IEDB to PubChem converter
//!
//! Every variant is fatal for a run. Messages are user-facing and end up on
//! stderr through the binary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, PubmedError>;

/// Errors raised while converting an export
#[derive(Error, Debug)]
pub enum PubmedError {
    /// The input export could not be opened
    #[error("error opening file '{}': {source}", .path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The `--output` destination could not be created
    #[error("error creating output file '{}': {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV stream failed somewhere other than a clean end of file
    #[error("error reading file at line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// A row had fewer columns than the export layout requires
    #[error("line {line}: expected at least {expected} fields, found {found}")]
    ShortRow {
        line: u64,
        found: usize,
        expected: usize,
    },

    /// Writing the feed failed
    #[error("error writing output: {0}")]
    Write(#[from] std::io::Error),

    /// The multi-value delimiter pattern failed to compile
    #[error("invalid delimiter pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl PubmedError {
    /// Create an input-open error for `path`
    pub fn open_input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OpenInput {
            path: path.into(),
            source,
        }
    }

    /// Create an output-creation error for `path`
    pub fn create_output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateOutput {
            path: path.into(),
            source,
        }
    }
}
