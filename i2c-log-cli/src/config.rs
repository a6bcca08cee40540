//! Configuration loading and parsing
//!
//! Queries are described in TOML. Pattern fields that are left out act as
//! wildcards:
//!
//! ```toml
//! [[queries]]
//! name = "fifo read"
//! kind = "sequence"
//! patterns = [
//!     { kind = "write", address = 0x6B, data = [0x3E], ack = "ack" },
//!     { kind = "read", address = 0x6B },
//! ]
//! ```

use anyhow::{bail, Context, Result};
use i2c_log_decoder::{Ack, DecoderConfig, Match, Pattern, TransactionKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub queries: Vec<QueryConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub show_invalid: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// Every transaction matching the single pattern
    #[default]
    Message,
    /// Every run of consecutive transactions matching the patterns in order
    Sequence,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    pub name: String,
    #[serde(default)]
    pub kind: QueryKind,
    pub patterns: Vec<PatternConfig>,
}

/// One pattern; omitted fields match anything
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PatternConfig {
    pub kind: Option<TransactionKind>,
    pub address: Option<u8>,
    pub data: Option<Vec<u8>>,
    pub ack: Option<Ack>,
}

impl PatternConfig {
    pub fn to_pattern(&self) -> Pattern {
        Pattern {
            kind: Match::from(self.kind),
            address: Match::from(self.address),
            data: Match::from(self.data.clone()),
            target_ack: Match::from(self.ack),
        }
    }

    /// True if no field is set
    pub fn is_wildcard(&self) -> bool {
        self == &PatternConfig::default()
    }
}

impl QueryConfig {
    pub fn patterns(&self) -> Vec<Pattern> {
        self.patterns.iter().map(PatternConfig::to_pattern).collect()
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate(&config).with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}

fn validate(config: &AppConfig) -> Result<()> {
    config.decoder.delimiter_byte()?;

    for query in &config.queries {
        if query.patterns.is_empty() {
            bail!("query '{}' has no patterns", query.name);
        }
        if query.kind == QueryKind::Message && query.patterns.len() != 1 {
            bail!(
                "message query '{}' needs exactly one pattern, got {}",
                query.name,
                query.patterns.len()
            );
        }
    }

    Ok(())
}
