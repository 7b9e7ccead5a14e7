//! PubChem deposition feed serialization
//!
//! # Format
//! ```text
//! PUBCHEM_EXT_DATASOURCE_REGID,PUBCHEM_SUBSTANCE_SYNONYM,...,PUBCHEM_PUBMED_ID\r\n
//! Epitope ID:1042,"CHEBI:15377\noxidane\nwater",www.iedb.org,http://www.iedb.org/epId/1042,O,"12345"\r\n
//! ```
//!
//! Records are joined with a bare comma and terminated by CRLF. Set-valued
//! columns are wrapped in double quotes with members separated by `\n`.
//! Nothing else is quoted or escaped, the SMILES column included.

use std::collections::BTreeSet;
use std::io::{BufWriter, Write};

use crate::aggregate::EpitopeGroup;
use crate::config::ConvertConfig;

/// Column header line of the feed, without terminator
pub const FEED_HEADER: &str = "PUBCHEM_EXT_DATASOURCE_REGID,PUBCHEM_SUBSTANCE_SYNONYM,PUBCHEM_EXT_DATASOURCE_URL,PUBCHEM_EXT_SUBSTANCE_URL,PUBCHEM_EXT_DATASOURCE_SMILES,PUBCHEM_PUBMED_ID";

/// Line terminator of every feed line
pub const RECORD_TERMINATOR: &str = "\r\n";

/// Prefix of the registry id column
pub const REGID_PREFIX: &str = "Epitope ID:";

/// Render a set as `"a\nb\nc"` in ascending order
pub fn render_set(values: &BTreeSet<String>) -> String {
    let mut out = String::with_capacity(2 + values.iter().map(|v| v.len() + 1).sum::<usize>());
    out.push('"');
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(value);
    }
    out.push('"');
    out
}

/// Writes the feed header and one line per epitope group
pub struct FeedWriter<W: Write> {
    out: BufWriter<W>,
    datasource_url: String,
    epitope_url_base: String,
}

impl<W: Write> FeedWriter<W> {
    pub fn new(out: W, config: &ConvertConfig) -> Self {
        Self {
            out: BufWriter::new(out),
            datasource_url: config.datasource_url.clone(),
            epitope_url_base: config.epitope_url_base.clone(),
        }
    }

    /// Serialize a group into one feed line, terminator included
    pub fn render(&self, group: &EpitopeGroup) -> String {
        let id = group.epitope_id();
        let fields = [
            format!("{}{}", REGID_PREFIX, id),
            render_set(group.identifiers()),
            self.datasource_url.clone(),
            format!("{}{}", self.epitope_url_base, id),
            group.structure().to_string(),
            render_set(group.references()),
        ];

        let mut line = fields.join(",");
        line.push_str(RECORD_TERMINATOR);
        line
    }

    pub fn write_header(&mut self) -> std::io::Result<()> {
        self.out.write_all(FEED_HEADER.as_bytes())?;
        self.out.write_all(RECORD_TERMINATOR.as_bytes())
    }

    pub fn write_group(&mut self, group: &EpitopeGroup) -> std::io::Result<()> {
        self.out.write_all(self.render(group).as_bytes())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> std::io::Result<W> {
        self.out.into_inner().map_err(|e| e.into_error())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::aggregate::{EpitopeAggregator, MultiValueSplitter};
    use crate::row::SubstanceRow;

    fn group(id: &str, rows: &[[&str; 4]]) -> EpitopeGroup {
        let splitter = MultiValueSplitter::new().unwrap();
        let mut group = EpitopeGroup::new(id);
        for &[accession, aliases, smiles, pubmed_id] in rows {
            group.merge(
                &SubstanceRow {
                    epitope_id: id,
                    accession,
                    aliases,
                    synonyms: "null",
                    smiles,
                    pubmed_id,
                },
                &splitter,
            );
        }
        group
    }

    #[test]
    fn test_render_set() {
        let empty = BTreeSet::new();
        assert_eq!(render_set(&empty), "\"\"");

        let values: BTreeSet<String> = ["b", "C", "a"].iter().map(|s| s.to_string()).collect();
        // byte order: uppercase sorts before lowercase
        assert_eq!(render_set(&values), "\"C\na\nb\"");
    }

    #[test]
    fn test_render_group() {
        let writer = FeedWriter::new(Vec::new(), &ConvertConfig::default());
        let g = group(
            "1042",
            &[
                ["CHEBI:15377", "water, oxidane", "[OH2]", "12345"],
                ["CHEBI:15377", "null", "O", "12345"],
            ],
        );

        assert_eq!(
            writer.render(&g),
            "Epitope ID:1042,\"CHEBI:15377\noxidane\nwater\",www.iedb.org,http://www.iedb.org/epId/1042,O,\"12345\"\r\n"
        );
    }

    #[test]
    fn test_render_placeholder() {
        let writer = FeedWriter::new(Vec::new(), &ConvertConfig::default());
        let placeholder = EpitopeAggregator::new(&ConvertConfig::default())
            .unwrap()
            .finish()
            .unwrap();

        assert_eq!(
            writer.render(&placeholder),
            "Epitope ID:-1,\"\",www.iedb.org,http://www.iedb.org/epId/-1,,\"\"\r\n"
        );
    }

    #[test]
    fn test_structure_is_written_raw() {
        let writer = FeedWriter::new(Vec::new(), &ConvertConfig::default());
        let g = group("7", &[["CHEBI:1", "", "C(=O)O,\"x\"", ""]]);

        let line = writer.render(&g);
        assert!(line.contains(",C(=O)O,\"x\","));
    }

    #[test]
    fn test_write_header_then_groups() {
        let mut writer = FeedWriter::new(Vec::new(), &ConvertConfig::default());
        writer.write_header().unwrap();
        writer.write_group(&group("1", &[["CHEBI:1", "", "C", "9"]])).unwrap();

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let mut lines = out.split(RECORD_TERMINATOR);
        assert_eq!(lines.next(), Some(FEED_HEADER));
        assert_eq!(
            lines.next(),
            Some("Epitope ID:1,\"CHEBI:1\",www.iedb.org,http://www.iedb.org/epId/1,C,\"9\"")
        );
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), None);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_group_failure() {
        // larger than the buffer, so the write reaches the sink at once
        let smiles = "C".repeat(64 * 1024);
        let mut writer = FeedWriter::new(FailingWriter, &ConvertConfig::default());
        let err = writer
            .write_group(&group("1", &[["CHEBI:1", "", smiles.as_str(), "9"]]))
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);

        // small groups stay buffered until the flush
        let mut writer = FeedWriter::new(FailingWriter, &ConvertConfig::default());
        writer.write_group(&group("2", &[["CHEBI:2", "", "O", "9"]])).unwrap();
        assert_eq!(writer.flush().unwrap_err().kind(), std::io::ErrorKind::BrokenPipe);
    }
}
