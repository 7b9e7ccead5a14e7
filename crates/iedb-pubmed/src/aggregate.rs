//! Run-length grouping of accepted rows by epitope id
//!
//! Rows are expected to arrive grouped by `epitope_id`, but this is not
//! checked: a group ends whenever the id changes, so an id that shows up
//! again later opens a second, separate group.
//!
//! At most one [`EpitopeGroup`] is live at a time. [`EpitopeAggregator::push`]
//! hands back the group it closes, and [`EpitopeAggregator::finish`] hands
//! back whatever is still open when the input ends.

use regex::Regex;
use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

use crate::config::{ConvertConfig, PlaceholderPolicy};
use crate::error::Result;
use crate::row::SubstanceRow;

/// Epitope id of the record emitted when no row was accepted
pub const PLACEHOLDER_EPITOPE_ID: &str = "-1";

/// Literal the export uses for "no value"
pub const NULL_TOKEN: &str = "null";

/// Separator used to split multi-value fields
pub const VALUE_SEPARATOR: &str = ", ";

/// Splits alias and synonym lists.
///
/// A field is split on `", "` only when it contains a comma followed by
/// whitespace. Tokens are never trimmed, so `"A,  B"` yields `"A"` and `" B"`
/// and `"A,\tB"` stays a single token.
#[derive(Debug, Clone)]
pub struct MultiValueSplitter {
    delimiter: Regex,
}

impl MultiValueSplitter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            delimiter: Regex::new(r",\s+")?,
        })
    }

    /// Yield the usable tokens of `field`, dropping `null` and empty ones
    pub fn split<'a>(&self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let tokens: Box<dyn Iterator<Item = &'a str> + 'a> = if self.delimiter.is_match(field) {
            Box::new(field.split(VALUE_SEPARATOR))
        } else {
            Box::new(std::iter::once(field))
        };

        tokens.filter(|token| !token.is_empty() && *token != NULL_TOKEN)
    }
}

/// Aggregated data for one contiguous run of rows sharing an epitope id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpitopeGroup {
    epitope_id: String,
    identifiers: BTreeSet<String>,
    references: BTreeSet<String>,
    structure: String,
}

impl EpitopeGroup {
    pub fn new(epitope_id: impl Into<String>) -> Self {
        Self {
            epitope_id: epitope_id.into(),
            identifiers: BTreeSet::new(),
            references: BTreeSet::new(),
            structure: String::new(),
        }
    }

    /// The empty `-1` group written when nothing was accepted
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_EPITOPE_ID)
    }

    pub fn epitope_id(&self) -> &str {
        &self.epitope_id
    }

    /// Accessions, aliases and synonyms, sorted and deduplicated
    pub fn identifiers(&self) -> &BTreeSet<String> {
        &self.identifiers
    }

    /// PubMed ids, sorted and deduplicated
    pub fn references(&self) -> &BTreeSet<String> {
        &self.references
    }

    /// SMILES of the last row merged into the group
    pub fn structure(&self) -> &str {
        &self.structure
    }

    /// Fold one row into the group
    pub fn merge(&mut self, row: &SubstanceRow<'_>, splitter: &MultiValueSplitter) {
        if !row.accession.is_empty() {
            self.identifiers.insert(row.accession.to_string());
        }

        for token in splitter.split(row.aliases).chain(splitter.split(row.synonyms)) {
            self.identifiers.insert(token.to_string());
        }

        // last row wins, even when empty
        self.structure.clear();
        self.structure.push_str(row.smiles);

        if !row.pubmed_id.is_empty() {
            self.references.insert(row.pubmed_id.to_string());
        }
    }
}

/// Owns the open group and decides when it is complete
#[derive(Debug)]
pub struct EpitopeAggregator {
    current: Option<EpitopeGroup>,
    splitter: MultiValueSplitter,
    placeholder: PlaceholderPolicy,
}

impl EpitopeAggregator {
    pub fn new(config: &ConvertConfig) -> Result<Self> {
        Ok(Self {
            current: None,
            splitter: MultiValueSplitter::new()?,
            placeholder: config.placeholder,
        })
    }

    /// Id of the open group, if any
    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(EpitopeGroup::epitope_id)
    }

    /// Merge an accepted row.
    ///
    /// Returns the previous group when `row` starts a new one.
    pub fn push(&mut self, row: &SubstanceRow<'_>) -> Option<EpitopeGroup> {
        let continues = self.current_id() == Some(row.epitope_id);

        let closed = if continues {
            None
        } else {
            let closed = self.current.take();
            if let Some(ref group) = closed {
                trace!(
                    closed = %group.epitope_id,
                    opened = %row.epitope_id,
                    "Epitope boundary"
                );
            }
            closed
        };

        self.current
            .get_or_insert_with(|| EpitopeGroup::new(row.epitope_id))
            .merge(row, &self.splitter);

        closed
    }

    /// Close the stream and return the last group.
    ///
    /// If no row was ever accepted, this is the placeholder group unless the
    /// placeholder policy suppresses it.
    pub fn finish(self) -> Option<EpitopeGroup> {
        match (self.current, self.placeholder) {
            (Some(group), _) => Some(group),
            (None, PlaceholderPolicy::Emit) => {
                warn!("No rows were accepted; emitting placeholder record");
                Some(EpitopeGroup::placeholder())
            },
            (None, PlaceholderPolicy::Suppress) => {
                debug!("No rows were accepted; placeholder record suppressed");
                None
            },
        }
    }
}
