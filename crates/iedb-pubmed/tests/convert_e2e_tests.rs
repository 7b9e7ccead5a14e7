//! End-to-end tests for the iedb-pubmed binary
//!
//! These tests run the compiled binary against export files on disk and check:
//! - The exact feed written to stdout
//! - Writing to a file with --output
//! - Exit codes and diagnostics for fatal errors
//! - The --strict and --no-placeholder switches

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const FEED_HEADER: &str = "PUBCHEM_EXT_DATASOURCE_REGID,PUBCHEM_SUBSTANCE_SYNONYM,PUBCHEM_EXT_DATASOURCE_URL,PUBCHEM_EXT_SUBSTANCE_URL,PUBCHEM_EXT_DATASOURCE_SMILES,PUBCHEM_PUBMED_ID\r\n";

const PLACEHOLDER: &str = "Epitope ID:-1,\"\",www.iedb.org,http://www.iedb.org/epId/-1,,\"\"\r\n";

/// Helper to write an export file into a fresh temp dir
fn export(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chebi_export.csv");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("iedb-pubmed").unwrap();
    cmd.env_remove("LOG_LEVEL")
        .env_remove("LOG_OUTPUT")
        .env_remove("LOG_FILTER")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Conversion Tests
// ============================================================================

#[test]
fn test_converts_grouped_export() {
    let (_dir, path) = export(
        "epitope_id,accession,aliases,synonyms,smiles,pubmed_id\n\
         100,CHEBI:15377,\"water, oxidane\",null,O,11111\n\
         100,CHEBI:15377,null,\"dihydrogen oxide\",[OH2],22222\n\
         100,PUBCHEM:962,ignored,ignored,X,33333\n\
         200,CHEBI:16236,ethanol,null,CCO,\n",
    );

    let expected = format!(
        "{}{}{}",
        FEED_HEADER,
        "Epitope ID:100,\"CHEBI:15377\ndihydrogen oxide\noxidane\nwater\",www.iedb.org,http://www.iedb.org/epId/100,[OH2],\"11111\n22222\"\r\n",
        "Epitope ID:200,\"CHEBI:16236\nethanol\",www.iedb.org,http://www.iedb.org/epId/200,CCO,\"\"\r\n",
    );

    cmd().arg(&path).assert().success().stdout(expected);
}

#[test]
fn test_no_matching_rows_emits_placeholder() {
    let (_dir, path) = export("E1,NOTCHEBI:1,X,Y,SM,P1\n");

    cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout(format!("{}{}", FEED_HEADER, PLACEHOLDER));
}

#[test]
fn test_no_placeholder_flag() {
    let (_dir, path) = export("E1,NOTCHEBI:1,X,Y,SM,P1\n");

    cmd()
        .arg(&path)
        .arg("--no-placeholder")
        .assert()
        .success()
        .stdout(FEED_HEADER);
}

#[test]
fn test_output_file() {
    let (dir, path) = export("7,CHEBI:7,null,null,C,1\n");
    let out = dir.path().join("feed.csv");

    cmd()
        .arg(&path)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        format!(
            "{}Epitope ID:7,\"CHEBI:7\",www.iedb.org,http://www.iedb.org/epId/7,C,\"1\"\r\n",
            FEED_HEADER
        )
    );
}

#[test]
fn test_custom_accession_prefix() {
    let (_dir, path) = export("1,CHEBI:1,,,C,\n2,CHEMBL25,,,O,\n");

    cmd()
        .arg(&path)
        .arg("--accession-prefix")
        .arg("CHEMBL")
        .assert()
        .success()
        .stdout(predicate::str::contains("Epitope ID:2,"))
        .stdout(predicate::str::contains("Epitope ID:1,").not());
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv");

    cmd()
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error: error opening file"));
}

#[test]
fn test_missing_input_does_not_create_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("feed.csv");

    cmd()
        .arg(dir.path().join("nope.csv"))
        .arg("-o")
        .arg(&out)
        .assert()
        .failure();

    assert!(!out.exists());
}

#[test]
fn test_short_rows_skipped_with_warning() {
    let (_dir, path) = export("1,CHEBI:1,,,C,\n1,CHEBI:2\n");

    cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"CHEBI:1\""))
        .stderr(predicate::str::contains("Skipping short row"));
}

#[test]
fn test_short_rows_fatal_with_strict() {
    let (_dir, path) = export("1,CHEBI:1,,,C,\n2,CHEBI:2,,,O,\n3,CHEBI:3\n");

    cmd()
        .arg(&path)
        .arg("--strict")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::starts_with(FEED_HEADER))
        .stdout(predicate::str::contains("Epitope ID:1,"))
        .stderr(predicate::str::contains("line 3: expected at least 6 fields, found 2"));
}

#[test]
fn test_conversion_error_names_the_input() {
    let (_dir, path) = export("1,CHEBI:1,,,C,\n2,CHEBI:2\n");

    cmd()
        .arg(&path)
        .arg("--strict")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(format!(
            "Error: converting '{}': line 2: expected at least 6 fields, found 2",
            path.display()
        )));
}

#[test]
fn test_input_is_required() {
    cmd().assert().failure().code(2);
}

// ============================================================================
// CLI Reference
// ============================================================================

#[test]
fn test_markdown_help() {
    cmd()
        .arg("--markdown-help")
        .assert()
        .success()
        .stdout(predicate::str::contains("iedb-pubmed"))
        .stdout(predicate::str::contains("--no-placeholder"));
}

#[test]
fn test_markdown_help_ignores_input() {
    let (_dir, path) = export("7,CHEBI:7,null,null,C,1\n");

    cmd()
        .arg(&path)
        .arg("--markdown-help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-placeholder"))
        .stdout(predicate::str::contains("PUBCHEM_EXT_DATASOURCE_REGID").not());
}
