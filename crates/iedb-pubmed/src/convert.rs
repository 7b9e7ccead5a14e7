//! Streaming conversion driver
//!
//! Reads the export one record at a time, routes accepted rows through the
//! [`EpitopeAggregator`] and writes each group as soon as it closes. Memory
//! use is bounded by the size of the current group.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, instrument, trace, warn};

use crate::aggregate::EpitopeAggregator;
use crate::config::{ConvertConfig, ShortRowPolicy};
use crate::error::{PubmedError, Result};
use crate::record::FeedWriter;
use crate::row::{normalize_line_breaks, RowFilter, RowKind, FIELD_COUNT};

/// Counters collected over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Records returned by the CSV reader
    pub rows_read: u64,
    pub headers_skipped: u64,
    /// Rows dropped for lacking the accession prefix
    pub rows_filtered: u64,
    /// Rows dropped for having fewer than six columns
    pub rows_short: u64,
    pub rows_accepted: u64,
    /// Feed records written after the header, placeholder included
    pub groups_emitted: u64,
}

/// Open the export for reading
pub fn open_input(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    File::open(path).map_err(|source| PubmedError::open_input(path, source))
}

/// Convert the export at `path` into `output`
pub fn convert_file<W: Write>(
    path: impl AsRef<Path>,
    output: W,
    config: &ConvertConfig,
) -> Result<ConvertStats> {
    let input = open_input(path)?;
    convert_reader(input, output, config)
}

/// Convert a CSV stream into the feed.
///
/// The feed header is written before the first record is read. On a fatal
/// error the records of groups that already closed are flushed to `output`
/// before the error is returned.
#[instrument(skip_all)]
pub fn convert_reader<R: Read, W: Write>(
    input: R,
    output: W,
    config: &ConvertConfig,
) -> Result<ConvertStats> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let filter = RowFilter::new(config);
    let mut aggregator = EpitopeAggregator::new(config)?;
    let mut feed = FeedWriter::new(output, config);
    let mut stats = ConvertStats::default();

    feed.write_header()?;

    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {},
            Ok(false) => break,
            Err(source) => {
                feed.flush()?;
                let line = source.position().map_or(stats.rows_read + 1, |p| p.line());
                return Err(PubmedError::Read { line, source });
            },
        }

        stats.rows_read += 1;
        let line = record.position().map_or(stats.rows_read, |p| p.line());
        normalize_line_breaks(&mut record);

        match filter.classify(&record) {
            RowKind::Header => {
                trace!(line, "Skipping header row");
                stats.headers_skipped += 1;
            },
            RowKind::Short { found } => match config.short_rows {
                ShortRowPolicy::Skip => {
                    warn!(line, found, expected = FIELD_COUNT, "Skipping short row");
                    stats.rows_short += 1;
                },
                ShortRowPolicy::Fail => {
                    feed.flush()?;
                    return Err(PubmedError::ShortRow {
                        line,
                        found,
                        expected: FIELD_COUNT,
                    });
                },
            },
            RowKind::Filtered { accession } => {
                trace!(line, accession, "Dropping row without accession prefix");
                stats.rows_filtered += 1;
            },
            RowKind::Accepted(row) => {
                stats.rows_accepted += 1;
                if let Some(closed) = aggregator.push(&row) {
                    feed.write_group(&closed)?;
                    stats.groups_emitted += 1;
                }
            },
        }
    }

    if let Some(last) = aggregator.finish() {
        feed.write_group(&last)?;
        stats.groups_emitted += 1;
    }
    feed.flush()?;

    debug!(?stats, "Conversion finished");
    info!(
        rows_read = stats.rows_read,
        rows_accepted = stats.rows_accepted,
        rows_filtered = stats.rows_filtered,
        rows_short = stats.rows_short,
        groups_emitted = stats.groups_emitted,
        "Converted export"
    );

    Ok(stats)
}
