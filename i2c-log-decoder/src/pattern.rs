//! Transaction patterns and queries
//!
//! A [`Pattern`] is a transaction template where every field is either an exact
//! value or a wildcard. Patterns are matched against decoded transactions one at a
//! time ([`find_message`]) or as an ordered run of consecutive transactions
//! ([`find_sequence`]).

use crate::types::{Ack, Transaction, TransactionKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single pattern field: either a wildcard or an exact value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Match<T> {
    Any,
    Exact(T),
}

impl<T: PartialEq> Match<T> {
    /// True if the field is a wildcard or equals `value`
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Match::Any => true,
            Match::Exact(expected) => expected == value,
        }
    }
}

impl<T> Default for Match<T> {
    fn default() -> Self {
        Match::Any
    }
}

impl<T> From<Option<T>> for Match<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Match::Exact(v),
            None => Match::Any,
        }
    }
}

/// A wildcardable transaction template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub kind: Match<TransactionKind>,
    pub address: Match<u8>,
    /// `Any` matches every data sequence, including an empty one
    pub data: Match<Vec<u8>>,
    pub target_ack: Match<Ack>,
}

impl Pattern {
    /// Pattern matching every transaction
    pub fn any() -> Self {
        Self::default()
    }

    /// Any read from `address`
    pub fn read(address: u8) -> Self {
        Self::any()
            .with_kind(TransactionKind::Read)
            .with_address(address)
    }

    /// Any write to `address`
    pub fn write(address: u8) -> Self {
        Self::any()
            .with_kind(TransactionKind::Write)
            .with_address(address)
    }

    /// Builder method: require a transaction kind
    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Match::Exact(kind);
        self
    }

    /// Builder method: require a target address
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = Match::Exact(address);
        self
    }

    /// Builder method: require exactly these data bytes
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = Match::Exact(data);
        self
    }

    /// Builder method: require a target acknowledge state
    pub fn with_ack(mut self, ack: Ack) -> Self {
        self.target_ack = Match::Exact(ack);
        self
    }

    /// True if all four fields match `transaction`
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.matches(&transaction.kind)
            && self.address.matches(&transaction.address)
            && self.data.matches(&transaction.data)
            && self.target_ack.matches(&transaction.target_ack)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Match::Any => write!(f, "*")?,
            Match::Exact(kind) => write!(f, "{}", kind)?,
        }
        match &self.address {
            Match::Any => write!(f, " *")?,
            Match::Exact(address) => write!(f, " 0x{:02X}", address)?,
        }
        match &self.data {
            Match::Any => write!(f, " [*]")?,
            Match::Exact(data) => {
                write!(f, " [")?;
                for (i, byte) in data.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{:02X}", byte)?;
                }
                write!(f, "]")?;
            }
        }
        match &self.target_ack {
            Match::Any => write!(f, " *"),
            Match::Exact(ack) => write!(f, " {}", ack),
        }
    }
}

/// A matched transaction together with its index in the searched list
pub type Hit<'a> = (usize, &'a Transaction);

/// Find every transaction fully matching `pattern`, in input order
pub fn find_message<'a>(pattern: &Pattern, transactions: &'a [Transaction]) -> Vec<Hit<'a>> {
    transactions
        .iter()
        .enumerate()
        .filter(|(_, t)| pattern.matches(t))
        .collect()
}

/// Find every window of consecutive transactions matching `patterns` in order
///
/// Windows slide by one, so overlapping matches are all reported, in ascending
/// offset order. An empty pattern list, or one longer than `transactions`, finds
/// nothing.
pub fn find_sequence<'a>(
    patterns: &[Pattern],
    transactions: &'a [Transaction],
) -> Vec<Vec<Hit<'a>>> {
    if patterns.is_empty() || patterns.len() > transactions.len() {
        return Vec::new();
    }

    transactions
        .windows(patterns.len())
        .enumerate()
        .filter(|(_, window)| patterns.iter().zip(window.iter()).all(|(p, t)| p.matches(t)))
        .map(|(offset, window)| {
            window
                .iter()
                .enumerate()
                .map(|(i, t)| (offset + i, t))
                .collect()
        })
        .collect()
}
