//! iedb-pubmed - IEDB CHEBI export to PubChem feed converter

use anyhow::{Context, Result};
use clap::Parser;
use iedb_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use iedb_pubmed::{
    convert_reader, open_input, ConvertConfig, ConvertStats, PlaceholderPolicy, PubmedError,
    ShortRowPolicy,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info};

/// Convert a CHEBI-filtered IEDB substance export into a PubChem deposition feed
#[derive(Parser, Debug)]
#[command(name = "iedb-pubmed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV export with columns epitope_id, accession, aliases, synonyms, smiles, pubmed_id
    #[arg(required_unless_present = "markdown_help")]
    input: Option<PathBuf>,

    /// Write the feed to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only convert rows whose accession starts with this prefix
    #[arg(long, default_value = iedb_pubmed::config::DEFAULT_ACCESSION_PREFIX)]
    accession_prefix: String,

    /// Abort on rows with fewer than six columns instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Do not emit the "Epitope ID:-1" record when no row matches
    #[arg(long)]
    no_placeholder: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long)]
    verbose: bool,

    /// Print the command reference as Markdown and exit
    #[arg(long, hide = true)]
    markdown_help: bool,
}

impl Cli {
    fn convert_config(&self) -> ConvertConfig {
        ConvertConfig::new()
            .with_accession_prefix(self.accession_prefix.clone())
            .with_short_rows(if self.strict {
                ShortRowPolicy::Fail
            } else {
                ShortRowPolicy::Skip
            })
            .with_placeholder(if self.no_placeholder {
                PlaceholderPolicy::Suppress
            } else {
                PlaceholderPolicy::Emit
            })
    }

    fn log_config(&self) -> LogConfig {
        let level = if self.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        };

        LogConfig::builder()
            .level(level)
            .output(LogOutput::Console)
            .log_file_prefix("iedb-pubmed")
            .build()
    }
}

fn main() {
    let cli = Cli::parse();

    // clap only lets INPUT be omitted together with --markdown-help
    let input = match cli.input.as_deref() {
        Some(input) if !cli.markdown_help => input,
        _ => {
            println!("{}", clap_markdown::help_markdown::<Cli>());
            return;
        },
    };

    // Environment variables take precedence over flags
    let log_config = cli.log_config();
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The converter works without logging, so a failed setup is not fatal
    let log_guard = init_logging(&log_config).ok();

    let config = cli.convert_config();
    let result = run(input, cli.output.as_deref(), &config);

    if let Err(e) = result {
        let message = format!("{:#}", e);
        error!(error = %message, "Conversion failed");
        eprintln!("Error: {}", message);
        drop(log_guard);
        process::exit(1);
    }
}

/// Open the input first so a missing export never leaves an empty output file
fn run(input: &Path, output: Option<&Path>, config: &ConvertConfig) -> Result<()> {
    let reader = open_input(input)?;
    info!(input = %input.display(), "Converting export");

    let stats: ConvertStats = match output {
        Some(path) => {
            let file =
                File::create(path).map_err(|source| PubmedError::create_output(path, source))?;
            convert_reader(reader, file, config)
        },
        None => convert_reader(reader, std::io::stdout().lock(), config),
    }
    .with_context(|| format!("converting '{}'", input.display()))?;

    info!(groups = stats.groups_emitted, "Feed written");
    Ok(())
}
