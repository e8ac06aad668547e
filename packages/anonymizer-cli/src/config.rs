use anonymizer::{AnonymizerConfig, BoundaryConvention, PlaceholderNumbering, DEFAULT_THRESHOLD};
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Values given on the command line. Each one replaces its environment
/// variable, which is then not read at all.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub threshold: Option<f64>,
    pub numbering: Option<PlaceholderNumbering>,
    pub convention: Option<BoundaryConvention>,
}

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub threshold: f64,
    pub numbering: PlaceholderNumbering,
    pub convention: BoundaryConvention,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env(overrides: Overrides) -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(overrides, |key| env::var(key).ok())
    }

    /// Resolve each setting from `overrides` first, then `lookup`, then the
    /// default.
    pub fn from_lookup(
        overrides: Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let threshold = match overrides.threshold {
            Some(threshold) => threshold,
            None => match lookup("ANONYMIZER_THRESHOLD") {
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .context("ANONYMIZER_THRESHOLD must be a number")?,
                None => DEFAULT_THRESHOLD,
            },
        };

        let numbering = match overrides.numbering {
            Some(numbering) => numbering,
            None => match lookup("ANONYMIZER_NUMBERING") {
                Some(raw) => raw
                    .parse()
                    .context("ANONYMIZER_NUMBERING must be right-to-left or left-to-right")?,
                None => PlaceholderNumbering::default(),
            },
        };

        let convention = match overrides.convention {
            Some(convention) => convention,
            None => match lookup("ANONYMIZER_BOUNDARY_MARKER") {
                Some(raw) => raw.parse().context(
                    "ANONYMIZER_BOUNDARY_MARKER must be byte-level, sentencepiece or wordpiece",
                )?,
                None => BoundaryConvention::default(),
            },
        };

        Ok(Self {
            threshold,
            numbering,
            convention,
        })
    }

    pub fn anonymizer_config(&self) -> AnonymizerConfig {
        AnonymizerConfig::new()
            .with_threshold(self.threshold)
            .with_numbering(self.numbering)
    }
}
