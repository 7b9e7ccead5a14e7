//! Conversion settings
//!
//! The defaults reproduce the IEDB CHEBI export layout and the PubChem
//! deposition URLs. The binary only overrides a few of them from flags.

// ============================================================================
// Feed Constants
// ============================================================================

/// Accession prefix a row must carry to be converted.
pub const DEFAULT_ACCESSION_PREFIX: &str = "CHEBI:";

/// First cell of a header row in the export.
pub const DEFAULT_HEADER_MARKER: &str = "epitope_id";

/// Value of the `PUBCHEM_EXT_DATASOURCE_URL` column.
pub const DEFAULT_DATASOURCE_URL: &str = "www.iedb.org";

/// Prefix of the `PUBCHEM_EXT_SUBSTANCE_URL` column; the epitope id is appended.
pub const DEFAULT_EPITOPE_URL_BASE: &str = "http://www.iedb.org/epId/";

/// What to do with a row that has fewer than six columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortRowPolicy {
    /// Log a warning and drop the row
    #[default]
    Skip,
    /// Abort the run
    Fail,
}

/// Whether an input without any accepted row still produces the `-1` record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderPolicy {
    /// Emit `Epitope ID:-1` with empty fields, as existing consumers expect
    #[default]
    Emit,
    /// Emit nothing after the header
    Suppress,
}

/// Settings for one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    pub accession_prefix: String,
    pub header_marker: String,
    pub datasource_url: String,
    pub epitope_url_base: String,
    pub short_rows: ShortRowPolicy,
    pub placeholder: PlaceholderPolicy,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            accession_prefix: DEFAULT_ACCESSION_PREFIX.to_string(),
            header_marker: DEFAULT_HEADER_MARKER.to_string(),
            datasource_url: DEFAULT_DATASOURCE_URL.to_string(),
            epitope_url_base: DEFAULT_EPITOPE_URL_BASE.to_string(),
            short_rows: ShortRowPolicy::default(),
            placeholder: PlaceholderPolicy::default(),
        }
    }
}

impl ConvertConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accession_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.accession_prefix = prefix.into();
        self
    }

    pub fn with_short_rows(mut self, policy: ShortRowPolicy) -> Self {
        self.short_rows = policy;
        self
    }

    pub fn with_placeholder(mut self, policy: PlaceholderPolicy) -> Self {
        self.placeholder = policy;
        self
    }
}
