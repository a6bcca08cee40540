//! Decoder configuration types
//!
//! Describes the layout of the capture export: which delimiter separates the
//! columns, where the event description lives, and how the header and the trailing
//! column are handled.

use crate::types::{DecoderError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for reading a capture log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Column delimiter (default: `;`)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Zero-based index of the event description column (default: 1, after the time)
    #[serde(default = "default_event_column")]
    pub event_column: usize,

    /// Whether the first row is a header (default: true)
    #[serde(default = "default_true")]
    pub has_header: bool,

    /// Whether every row ends with an empty trailing column to drop (default: true)
    #[serde(default = "default_true")]
    pub strip_trailing_column: bool,
}

fn default_delimiter() -> char {
    ';'
}

fn default_event_column() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            event_column: default_event_column(),
            has_header: true,
            strip_trailing_column: true,
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the column delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder method: set the event description column
    pub fn with_event_column(mut self, column: usize) -> Self {
        self.event_column = column;
        self
    }

    /// Builder method: enable or disable header handling
    pub fn with_header(mut self, enabled: bool) -> Self {
        self.has_header = enabled;
        self
    }

    /// Builder method: enable or disable trailing column stripping
    pub fn with_trailing_column(mut self, strip: bool) -> Self {
        self.strip_trailing_column = strip;
        self
    }

    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(DecoderError::InvalidConfig(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_config_builder() {
        let config = DecoderConfig::new()
            .with_delimiter(',')
            .with_event_column(2)
            .with_header(false)
            .with_trailing_column(false);

        assert_eq!(config.delimiter, ',');
        assert_eq!(config.event_column, 2);
        assert!(!config.has_header);
        assert!(!config.strip_trailing_column);
    }

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::new();
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.event_column, 1);
        assert!(config.has_header);
        assert!(config.strip_trailing_column);
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let config = DecoderConfig::new().with_delimiter('§');
        assert!(config.delimiter_byte().is_err());
    }
}
