//! I2C Log Decoder Library
//!
//! A reusable library for reconstructing I2C bus transactions from logic analyzer
//! captures and searching them.
//!
//! # Architecture
//!
//! - Reads the analyzer's delimited text export into raw rows
//! - Classifies every row into a typed bus event (START, address, ACK, DATA...)
//! - Segments the event stream into START..STOP brackets
//! - Decodes each bracket into a transaction (direction, address, data, target ack)
//! - Matches transactions, or runs of consecutive transactions, against patterns
//!   with per-field wildcards
//!
//! The library does NOT:
//! - Capture live bus traffic
//! - Repair malformed captures (they decode as invalid transactions)
//! - Print or format reports
//!
//! Reporting is in the application layer (i2c-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use i2c_log_decoder::{Ack, Decoder, DecoderConfig, Pattern};
//! use std::path::Path;
//!
//! let decoder = Decoder::new(DecoderConfig::new().with_delimiter(';'));
//! let capture = decoder.decode_file(Path::new("lsm6ds33_fifo.csv")).unwrap();
//!
//! // Register write selecting the FIFO, followed by the read of its contents
//! let patterns = [
//!     Pattern::write(0x6B).with_data(vec![0x3E]).with_ack(Ack::Ack),
//!     Pattern::read(0x6B),
//! ];
//!
//! for hits in capture.stream.find_sequence(&patterns) {
//!     for (index, transaction) in hits {
//!         println!("#{}: {}", index, transaction);
//!     }
//! }
//! ```

// Public modules
pub mod classifier;
pub mod config;
pub mod decoder;
pub mod formats;
pub mod pattern;
pub mod segmenter;
pub mod stream;
pub mod transaction_decoder;
pub mod types;

// Re-export main types for convenience
pub use classifier::{classify_description, EventClassifier};
pub use config::DecoderConfig;
pub use decoder::{Capture, Decoder};
pub use formats::{read_log, LogHeader, LogRow};
pub use pattern::{find_message, find_sequence, Hit, Match, Pattern};
pub use segmenter::{segment, Segment};
pub use stream::{I2cStream, StreamStats};
pub use transaction_decoder::TransactionDecoder;
pub use types::{
    Ack, DecoderError, Event, EventKind, Result, Transaction, TransactionKind, ADDRESS_UNSET,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
