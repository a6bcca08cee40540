//! Main decoder API
//!
//! This module provides the primary interface for the decoder library.
//! The Decoder struct ties together log ingestion, event classification and
//! transaction reconstruction.

use crate::classifier::EventClassifier;
use crate::config::DecoderConfig;
use crate::formats::{CsvLogParser, LogHeader, LogRow};
use crate::stream::I2cStream;
use crate::types::{Event, Result};
use std::path::Path;

/// A decoded capture file
#[derive(Debug, Clone)]
pub struct Capture {
    /// Header row of the capture log
    pub header: LogHeader,
    /// Events and transactions of the capture
    pub stream: I2cStream,
}

/// The main decoder struct - entry point for all decoding operations
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
    classifier: EventClassifier,
}

impl Decoder {
    /// Create a decoder for captures laid out as described by `config`
    pub fn new(config: DecoderConfig) -> Self {
        let classifier = EventClassifier::new(config.event_column);
        Self { config, classifier }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a capture log file
    ///
    /// # Example
    /// ```no_run
    /// use i2c_log_decoder::{Decoder, DecoderConfig, Pattern};
    /// use std::path::Path;
    ///
    /// let decoder = Decoder::new(DecoderConfig::new());
    /// let capture = decoder.decode_file(Path::new("capture.csv")).unwrap();
    ///
    /// for (index, transaction) in capture.stream.find_message(&Pattern::write(0x6B)) {
    ///     println!("#{}: {}", index, transaction);
    /// }
    /// ```
    pub fn decode_file(&self, path: &Path) -> Result<Capture> {
        log::info!("Decoding capture file: {:?}", path);

        let rows = CsvLogParser::parse(path, &self.config)?;
        let header = rows.header().clone();
        let events = rows
            .map(|row| row.map(|row| self.classify(&row)))
            .collect::<Result<Vec<Event>>>()?;

        let stream = I2cStream::from_events(events);
        let stats = stream.stats();
        log::info!(
            "Decoded {} events into {} transactions ({} invalid)",
            stats.num_events,
            stats.num_transactions,
            stats.num_invalid
        );

        Ok(Capture { header, stream })
    }

    /// Classify already-read rows and build a stream from them
    pub fn decode_rows<'a, I>(&self, rows: I) -> I2cStream
    where
        I: IntoIterator<Item = &'a LogRow>,
    {
        let events: Vec<Event> = rows.into_iter().map(|row| self.classify(row)).collect();
        I2cStream::from_events(events)
    }

    fn classify(&self, row: &[String]) -> Event {
        self.classifier.classify(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;

    fn row(description: &str) -> LogRow {
        vec!["0.0".to_string(), description.to_string()]
    }

    #[test]
    fn test_missing_file() {
        let decoder = Decoder::default();
        assert!(decoder.decode_file(Path::new("missing.csv")).is_err());
    }

    #[test]
    fn test_decode_rows() {
        let rows = vec![
            row("START"),
            row("Write to 0x6B - R/W = 0"),
            row("ACK"),
            row("DATA = 0x0A"),
            row("ACK"),
            row("STOP"),
        ];
        let stream = Decoder::new(DecoderConfig::new()).decode_rows(&rows);
        assert_eq!(stream.num_events(), 6);
        assert_eq!(stream.transactions()[0].kind, TransactionKind::Write);
        assert_eq!(stream.transactions()[0].data, vec![0x0A]);
    }
}
