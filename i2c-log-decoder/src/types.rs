//! Core types for the I2C log decoder library
//!
//! This module defines the fundamental types the decoder works with: classified bus
//! events coming out of a capture log, and the transactions reconstructed from them.
//! Events and transactions are plain values; nothing here carries decoding state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Address value of a transaction whose address phase was never decoded
pub const ADDRESS_UNSET: u8 = 0xFF;

/// Kind of a single classified bus event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Row that did not match any known event description
    None,
    /// START condition
    Start,
    /// STOP condition
    Stop,
    /// Repeated START condition
    Restart,
    /// Acknowledge bit
    Ack,
    /// Not-acknowledge bit
    Nack,
    /// Address phase with R/W = 1
    Read,
    /// Address phase with R/W = 0
    Write,
    /// One data byte
    Data,
}

impl EventKind {
    /// True for the kinds that bracket a transaction (Start, Stop, Restart)
    pub fn is_condition(&self) -> bool {
        matches!(self, EventKind::Start | EventKind::Stop | EventKind::Restart)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::None => "NONE",
            EventKind::Start => "START",
            EventKind::Stop => "STOP",
            EventKind::Restart => "RESTART",
            EventKind::Ack => "ACK",
            EventKind::Nack => "NACK",
            EventKind::Read => "READ",
            EventKind::Write => "WRITE",
            EventKind::Data => "DATA",
        };
        write!(f, "{}", name)
    }
}

/// One classified bus event
///
/// Read and Write events carry the target address as payload, Data events
/// carry the transferred byte. All other kinds have no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub payload: Option<u8>,
}

impl Event {
    /// Create an event without payload
    pub fn new(kind: EventKind) -> Self {
        Self { kind, payload: None }
    }

    pub fn none() -> Self {
        Self::new(EventKind::None)
    }

    pub fn start() -> Self {
        Self::new(EventKind::Start)
    }

    pub fn stop() -> Self {
        Self::new(EventKind::Stop)
    }

    pub fn restart() -> Self {
        Self::new(EventKind::Restart)
    }

    pub fn ack() -> Self {
        Self::new(EventKind::Ack)
    }

    pub fn nack() -> Self {
        Self::new(EventKind::Nack)
    }

    /// Address phase of a read from `address`
    pub fn read(address: u8) -> Self {
        Self {
            kind: EventKind::Read,
            payload: Some(address),
        }
    }

    /// Address phase of a write to `address`
    pub fn write(address: u8) -> Self {
        Self {
            kind: EventKind::Write,
            payload: Some(address),
        }
    }

    /// A transferred data byte
    pub fn data(byte: u8) -> Self {
        Self {
            kind: EventKind::Data,
            payload: Some(byte),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload {
            Some(value) => write!(f, "{}(0x{:02X})", self.kind, value),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Direction of a decoded transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Slice was malformed or violated the expected event order
    Invalid,
    Read,
    Write,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Invalid => write!(f, "Invalid"),
            TransactionKind::Read => write!(f, "Read"),
            TransactionKind::Write => write!(f, "Write"),
        }
    }
}

/// Acknowledge state reported by the target device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ack {
    Nack,
    Ack,
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ack::Nack => write!(f, "NACK"),
            Ack::Ack => write!(f, "ACK"),
        }
    }
}

/// A reconstructed I2C bus transaction (one START..STOP bracket)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Read, Write, or Invalid if the slice could not be decoded
    pub kind: TransactionKind,
    /// Target address as printed in the capture ([`ADDRESS_UNSET`] on invalid transactions)
    pub address: u8,
    /// Data bytes in transfer order
    pub data: Vec<u8>,
    /// Final acknowledge state of the target
    pub target_ack: Ack,
}

impl Transaction {
    /// The value every malformed slice decodes to
    pub fn invalid() -> Self {
        Self {
            kind: TransactionKind::Invalid,
            address: ADDRESS_UNSET,
            data: Vec::new(),
            target_ack: Ack::Nack,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.kind != TransactionKind::Invalid
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::invalid()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "Invalid");
        }
        write!(f, "{} 0x{:02X} [", self.kind, self.address)?;
        for (i, byte) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        write!(f, "] {}", self.target_ack)
    }
}

/// Errors that can occur while loading a capture
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Failed to parse log file: {0}")]
    LogParseError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
