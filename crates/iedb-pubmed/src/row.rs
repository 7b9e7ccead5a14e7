//! Row classification and field extraction
//!
//! # Export layout
//! ```text
//! epitope_id,accession,aliases,synonyms,smiles,pubmed_id
//! 1042,CHEBI:15377,"water, oxidane",null,O,12345
//! ```
//!
//! Only the first six columns are read; anything after them is ignored.

use csv::StringRecord;

use crate::config::ConvertConfig;

/// Number of positional columns a row must have
pub const FIELD_COUNT: usize = 6;

/// The six positional fields of an accepted row, borrowed from the CSV record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstanceRow<'a> {
    pub epitope_id: &'a str,
    pub accession: &'a str,
    /// Comma-space separated alias list, or `null`
    pub aliases: &'a str,
    /// Comma-space separated synonym list, or `null`
    pub synonyms: &'a str,
    pub smiles: &'a str,
    pub pubmed_id: &'a str,
}

impl<'a> SubstanceRow<'a> {
    /// Bind the positional fields of `record`, `None` if it is too short
    pub fn from_record(record: &'a StringRecord) -> Option<Self> {
        if record.len() < FIELD_COUNT {
            return None;
        }

        Some(Self {
            epitope_id: &record[0],
            accession: &record[1],
            aliases: &record[2],
            synonyms: &record[3],
            smiles: &record[4],
            pubmed_id: &record[5],
        })
    }
}

/// Rewrite `\r\n` inside field values as `\n`.
///
/// Quoted fields may span lines of a CRLF file; the feed only uses bare
/// newlines inside values. The record position is not kept, so read it first.
pub fn normalize_line_breaks(record: &mut StringRecord) -> bool {
    if !record.iter().any(|field| field.contains("\r\n")) {
        return false;
    }

    *record = record
        .iter()
        .map(|field| field.replace("\r\n", "\n"))
        .collect();
    true
}

/// Outcome of looking at one CSV record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind<'a> {
    /// A literal header row
    Header,
    /// Fewer than [`FIELD_COUNT`] columns
    Short { found: usize },
    /// Accession without the configured prefix
    Filtered { accession: &'a str },
    /// Participates in grouping
    Accepted(SubstanceRow<'a>),
}

/// Decides which records take part in the conversion
#[derive(Debug, Clone)]
pub struct RowFilter {
    accession_prefix: String,
    header_marker: String,
}

impl RowFilter {
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            accession_prefix: config.accession_prefix.clone(),
            header_marker: config.header_marker.clone(),
        }
    }

    /// Classify a record.
    ///
    /// Header detection comes first, so a header row is never reported as
    /// short. The shape check precedes the prefix test.
    pub fn classify<'r>(&self, record: &'r StringRecord) -> RowKind<'r> {
        if record.get(0) == Some(self.header_marker.as_str()) {
            return RowKind::Header;
        }

        let Some(row) = SubstanceRow::from_record(record) else {
            return RowKind::Short {
                found: record.len(),
            };
        };

        if row.accession.starts_with(&self.accession_prefix) {
            RowKind::Accepted(row)
        } else {
            RowKind::Filtered {
                accession: row.accession,
            }
        }
    }
}
