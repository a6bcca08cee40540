//! Capture log formats
//!
//! Parsers for the text exports produced by logic analyzer I2C decoders. Each
//! parser yields raw rows for the event classifier.

pub mod csv_log;

pub use csv_log::{read_log, CsvLogParser, LogHeader, LogRow, LogRowIterator};
