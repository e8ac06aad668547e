//! Command-line front end for the anonymizer.
//!
//! Reads token-classification output as JSON, masks the source text and
//! prints the result as JSON on stdout. Logs go to stderr.

mod config;

use std::fs;
use std::io::{self, Read};

use anonymizer::{
    AnonymizationResult, Anonymizer, BoundaryConvention, PlaceholderNumbering, PredictionDocument,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Overrides};

#[derive(Parser)]
#[command(name = "anonymize")]
#[command(about = "Mask sensitive spans using token classification output")]
struct Cli {
    /// Minimum group score to mask (overrides ANONYMIZER_THRESHOLD)
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Placeholder numbering: right-to-left or left-to-right
    /// (overrides ANONYMIZER_NUMBERING)
    #[arg(long, global = true)]
    numbering: Option<PlaceholderNumbering>,

    /// Tokenizer marker convention: byte-level, sentencepiece or wordpiece
    /// (overrides ANONYMIZER_BOUNDARY_MARKER)
    #[arg(long, global = true)]
    marker: Option<BoundaryConvention>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            threshold: self.threshold,
            numbering: self.numbering,
            convention: self.marker.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Mask one document: {"text": ..., "tokens": [...]}
    Mask {
        /// Input file, or - for stdin
        #[arg(long, default_value = "-")]
        input: String,

        /// Print masked text and a replacement table instead of JSON
        #[arg(long)]
        table: bool,
    },

    /// Mask JSON Lines, one document per line
    Batch {
        /// Input file, or - for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
}

#[derive(Serialize)]
#[serde(untagged)]
enum RowOutput {
    Masked(AnonymizationResult),
    Failed { row: usize, error: String },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,anonymizer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env(cli.overrides()).context("Failed to load configuration")?;

    let anonymizer =
        Anonymizer::new(config.anonymizer_config()).context("Invalid anonymizer configuration")?;
    tracing::info!(
        threshold = config.threshold,
        numbering = %config.numbering,
        "Anonymizer ready"
    );

    match cli.command {
        Commands::Mask { input, table } => {
            let raw = read_input(&input)?;
            let doc: PredictionDocument =
                serde_json::from_str(&raw).context("Failed to parse input document")?;
            let doc = doc
                .into_document(&config.convention)
                .context("Failed to classify predictions")?;
            let result = anonymizer
                .anonymize_document(&doc)
                .context("Failed to anonymize document")?;

            if table {
                println!("{}", result.masked_text);
                for line in result.summary_lines() {
                    println!("  {}", line);
                }
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
        Commands::Batch { input } => {
            let raw = read_input(&input)?;
            let mut failed = 0usize;
            let mut rows = 0usize;

            for (row, line) in raw.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
                rows += 1;
                let output = match process_row(&anonymizer, &config, line) {
                    Ok(result) => RowOutput::Masked(result),
                    Err(e) => {
                        failed += 1;
                        tracing::warn!(row, error = %e, "Row failed");
                        RowOutput::Failed {
                            row,
                            error: format!("{:#}", e),
                        }
                    }
                };
                println!("{}", serde_json::to_string(&output)?);
            }

            tracing::info!(rows, failed, "Batch complete");
        }
    }

    Ok(())
}

fn process_row(anonymizer: &Anonymizer, config: &Config, line: &str) -> Result<AnonymizationResult> {
    let doc: PredictionDocument = serde_json::from_str(line).context("Failed to parse row")?;
    let doc = doc.into_document(&config.convention)?;
    Ok(anonymizer.anonymize_document(&doc)?)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}
