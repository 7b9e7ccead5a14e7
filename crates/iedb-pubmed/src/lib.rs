//! IEDB to PubChem Feed Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Converts a CHEBI-filtered IEDB substance export into the grouped,
//! per-epitope record format of the PubChem deposition feed.
//!
//! # Pipeline
//!
//! - **Rows** ([`row`]): header detection, shape check and the `CHEBI:`
//!   accession filter
//! - **Grouping** ([`aggregate`]): run-length grouping by epitope id with
//!   deduplicated identifier and reference sets
//! - **Feed** ([`record`]): CRLF-terminated feed lines
//! - **Driver** ([`convert`]): streams a CSV source through the above
//!
//! # Example
//!
//! ```no_run
//! use iedb_pubmed::{convert_file, ConvertConfig};
//!
//! fn main() -> iedb_pubmed::Result<()> {
//!     let stdout = std::io::stdout();
//!     let stats = convert_file("chebi_export.csv", stdout.lock(), &ConvertConfig::default())?;
//!     eprintln!("{} groups", stats.groups_emitted);
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod convert;
pub mod error;
pub mod record;
pub mod row;

// Re-export commonly used types
pub use aggregate::{EpitopeAggregator, EpitopeGroup};
pub use config::{ConvertConfig, PlaceholderPolicy, ShortRowPolicy};
pub use convert::{convert_file, convert_reader, open_input, ConvertStats};
pub use error::{PubmedError, Result};
