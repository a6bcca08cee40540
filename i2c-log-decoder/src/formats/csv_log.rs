//! Delimited capture log parser
//!
//! Reads the text export of a logic analyzer's I2C decoder. The export is a
//! `;`-delimited file whose first row is a header and whose remaining rows carry
//! one bus event each, e.g.
//!
//! ```text
//! Time [s];Event;
//! 0.000100;START;
//! 0.000112;Write to 0x6B - R/W = 0;
//! 0.000190;ACK;
//! ```
//!
//! Every row ends with an empty trailing column which is dropped before the row is
//! handed to the classifier.

use crate::config::DecoderConfig;
use crate::types::{DecoderError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One raw capture row (trailing column already stripped)
pub type LogRow = Vec<String>;

/// Column names from the capture's header row
pub type LogHeader = Vec<String>;

/// Capture log parser using the csv crate
pub struct CsvLogParser;

impl CsvLogParser {
    /// Open a capture file and return an iterator over its rows
    pub fn parse(path: &Path, config: &DecoderConfig) -> Result<LogRowIterator<BufReader<File>>> {
        log::info!("Parsing capture log: {:?}", path);

        let file = File::open(path)?;

        Self::from_reader(BufReader::new(file), config)
    }

    /// Parse capture rows from any reader
    pub fn from_reader<R: Read>(reader: R, config: &DecoderConfig) -> Result<LogRowIterator<R>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(config.delimiter_byte()?)
            .has_headers(config.has_header)
            .flexible(true)
            .from_reader(reader);

        let header = if config.has_header {
            csv_reader
                .headers()
                .map_err(|e| {
                    DecoderError::LogParseError(format!("Failed to read header row: {}", e))
                })?
                .iter()
                .map(String::from)
                .collect()
        } else {
            Vec::new()
        };

        log::debug!("Capture header: {:?}", header);

        Ok(LogRowIterator {
            records: csv_reader.into_records(),
            header,
            strip_trailing_column: config.strip_trailing_column,
        })
    }
}

/// Iterator over the rows of a capture log
pub struct LogRowIterator<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    header: LogHeader,
    strip_trailing_column: bool,
}

impl<R: Read> LogRowIterator<R> {
    /// Header row of the capture (empty when the config has no header)
    pub fn header(&self) -> &LogHeader {
        &self.header
    }
}

impl<R: Read> Iterator for LogRowIterator<R> {
    type Item = Result<LogRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };

        let mut row: LogRow = record.iter().map(String::from).collect();
        if self.strip_trailing_column {
            row.pop();
        }
        Some(Ok(row))
    }
}

/// Read a whole capture file into its header and rows
pub fn read_log(path: &Path, config: &DecoderConfig) -> Result<(LogHeader, Vec<LogRow>)> {
    let rows = CsvLogParser::parse(path, config)?;
    let header = rows.header().clone();
    let rows = rows.collect::<Result<Vec<_>>>()?;
    log::debug!("Read {} rows from {:?}", rows.len(), path);
    Ok((header, rows))
}
