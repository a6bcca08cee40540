//! Capture session: events plus their derived transactions
//!
//! [`I2cStream`] owns the event sequence of one capture together with the
//! transactions decoded from it. Every mutation re-segments and re-decodes from
//! scratch, so the transaction list can never drift from its source events.

use crate::pattern::{find_message, find_sequence, Hit, Pattern};
use crate::segmenter::{self, Segment};
use crate::transaction_decoder::TransactionDecoder;
use crate::types::{Event, Transaction};
use serde::Serialize;

/// Summary counts for a capture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    pub num_events: usize,
    pub num_transactions: usize,
    pub num_invalid: usize,
}

/// Event sequence of one capture with its decoded transactions
#[derive(Debug, Clone, Default)]
pub struct I2cStream {
    events: Vec<Event>,
    segments: Vec<Segment>,
    transactions: Vec<Transaction>,
}

impl I2cStream {
    /// Create an empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stream from an existing event sequence
    pub fn from_events(events: Vec<Event>) -> Self {
        let mut stream = Self {
            events,
            ..Self::default()
        };
        stream.rebuild();
        stream
    }

    /// Append one event and recompute the transactions
    pub fn append(&mut self, event: Event) {
        self.events.push(event);
        self.rebuild();
    }

    /// Append several events, recomputing the transactions once
    pub fn extend<I: IntoIterator<Item = Event>>(&mut self, events: I) {
        self.events.extend(events);
        self.rebuild();
    }

    /// Drop all events and transactions
    pub fn clear(&mut self) {
        self.events.clear();
        self.segments.clear();
        self.transactions.clear();
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Index ranges of the transactions in the event sequence
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Event slices of the transactions, in segment order
    pub fn slices(&self) -> impl Iterator<Item = &[Event]> + '_ {
        self.segments.iter().map(|s| s.slice(&self.events))
    }

    /// All decoded transactions, including invalid ones
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Decoded transactions that are not invalid
    pub fn valid_transactions(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions.iter().filter(|t| t.is_valid())
    }

    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    pub fn num_transactions(&self) -> usize {
        self.transactions.len()
    }

    pub fn stats(&self) -> StreamStats {
        StreamStats {
            num_events: self.events.len(),
            num_transactions: self.transactions.len(),
            num_invalid: self.transactions.iter().filter(|t| !t.is_valid()).count(),
        }
    }

    /// Find every transaction of this capture matching `pattern`
    pub fn find_message(&self, pattern: &Pattern) -> Vec<Hit<'_>> {
        find_message(pattern, &self.transactions)
    }

    /// Find every run of consecutive transactions matching `patterns`
    pub fn find_sequence(&self, patterns: &[Pattern]) -> Vec<Vec<Hit<'_>>> {
        find_sequence(patterns, &self.transactions)
    }

    fn rebuild(&mut self) {
        self.segments = segmenter::segment(&self.events);
        self.transactions = self
            .segments
            .iter()
            .map(|s| TransactionDecoder::decode(s.slice(&self.events)))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ack, EventKind, TransactionKind};

    fn fifo_read(address: u8, register: u8, value: u8) -> Vec<Event> {
        vec![
            Event::start(),
            Event::write(address),
            Event::ack(),
            Event::data(register),
            Event::ack(),
            Event::stop(),
            Event::start(),
            Event::read(address),
            Event::ack(),
            Event::data(value),
            Event::nack(),
            Event::stop(),
        ]
    }

    #[test]
    fn test_empty_stream() {
        let stream = I2cStream::new();
        assert_eq!(stream.num_events(), 0);
        assert_eq!(stream.num_transactions(), 0);
        assert_eq!(stream.stats(), StreamStats::default());
    }

    #[test]
    fn test_from_events() {
        let stream = I2cStream::from_events(fifo_read(0x6B, 0x3A, 0x06));
        assert_eq!(stream.num_events(), 12);
        assert_eq!(stream.num_transactions(), 2);
        assert_eq!(stream.transactions()[0].kind, TransactionKind::Write);
        assert_eq!(stream.transactions()[1].kind, TransactionKind::Read);
        assert_eq!(stream.transactions()[1].target_ack, Ack::Ack);
    }

    #[test]
    fn test_append_recomputes() {
        let mut stream = I2cStream::new();
        for event in fifo_read(0x6B, 0x3A, 0x06) {
            stream.append(event);
        }
        assert_eq!(stream.num_transactions(), 2);

        stream.extend(fifo_read(0x6B, 0x3A, 0x07));
        assert_eq!(stream.num_transactions(), 4);
        assert_eq!(stream.transactions()[3].data, vec![0x07]);
    }

    #[test]
    fn test_clear_invalidates_transactions() {
        let mut stream = I2cStream::from_events(fifo_read(0x6B, 0x3A, 0x06));
        stream.clear();
        assert_eq!(stream.num_events(), 0);
        assert!(stream.transactions().is_empty());
        assert!(stream.segments().is_empty());
    }

    #[test]
    fn test_slices_are_bracketed() {
        let mut events = fifo_read(0x6B, 0x3A, 0x06);
        events.insert(0, Event::stop());
        events.push(Event::stop());
        events.push(Event::none());
        let stream = I2cStream::from_events(events);

        for slice in stream.slices() {
            assert_eq!(slice.first().map(|e| e.kind), Some(EventKind::Start));
            assert!(matches!(
                slice.last().map(|e| e.kind),
                Some(EventKind::Stop | EventKind::Restart)
            ));
        }
    }

    #[test]
    fn test_invalid_transactions_are_counted() {
        let mut events = fifo_read(0x6B, 0x3A, 0x06);
        // Second STOP re-closes the read from its START, spanning an inner STOP
        events.push(Event::stop());
        let stream = I2cStream::from_events(events);

        let stats = stream.stats();
        assert_eq!(stats.num_transactions, 3);
        assert_eq!(stats.num_invalid, 1);
        assert_eq!(stream.valid_transactions().count(), 2);
    }

    #[test]
    fn test_queries() {
        let mut events = fifo_read(0x6B, 0x3A, 0x06);
        events.extend(fifo_read(0x6B, 0x3A, 0x07));
        let stream = I2cStream::from_events(events);

        let writes = stream.find_message(&Pattern::write(0x6B).with_data(vec![0x3A]));
        assert_eq!(writes.len(), 2);

        let reads = stream.find_sequence(&[Pattern::write(0x6B), Pattern::read(0x6B)]);
        assert_eq!(reads.len(), 2);
        assert_eq!(reads[1][1].1.data, vec![0x07]);
    }

    #[test]
    fn test_eight_bit_address_capture() {
        let classifier = crate::classifier::EventClassifier::default();
        let events = [
            "START",
            "Write to 0xD6 - R/W = 0",
            "ACK",
            "DATA = 0x0A",
            "ACK",
            "STOP",
        ]
        .iter()
        .map(|description| classifier.classify(&["0.0".to_string(), description.to_string()]))
        .collect();
        let stream = I2cStream::from_events(events);

        assert_eq!(stream.stats().num_invalid, 0);
        let t = &stream.transactions()[0];
        assert_eq!(t.kind, TransactionKind::Write);
        assert_eq!(t.address, 0xD6);
        assert_eq!(t.data, vec![0x0A]);
        assert_eq!(stream.find_message(&Pattern::write(0xD6)).len(), 1);
    }

    #[test]
    fn test_idempotent_pipeline() {
        let events = fifo_read(0x6B, 0x3A, 0x06);
        let first = I2cStream::from_events(events.clone());
        let second = I2cStream::from_events(events);
        assert_eq!(first.transactions(), second.transactions());
        assert_eq!(first.segments(), second.segments());
    }
}
