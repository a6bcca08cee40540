//! Transaction segmentation
//!
//! Locates the START..STOP brackets in a flat event sequence. Each bracket is
//! reported as an inclusive index range; interpreting the events inside it is the
//! job of the transaction decoder.

use crate::types::{Event, EventKind};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Inclusive `[start, stop]` index range of one transaction in the event sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Index of the START event
    pub start: usize,
    /// Index of the STOP event
    pub stop: usize,
}

impl Segment {
    pub fn range(&self) -> RangeInclusive<usize> {
        self.start..=self.stop
    }

    /// Number of events covered by the segment
    pub fn len(&self) -> usize {
        self.stop - self.start + 1
    }

    /// Always false, a segment covers at least its START and STOP
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Borrow the events covered by this segment
    pub fn slice<'a>(&self, events: &'a [Event]) -> &'a [Event] {
        &events[self.range()]
    }
}

/// Find all transaction segments in `events`
///
/// Single left-to-right scan remembering the most recent START. Every STOP that
/// comes after a recorded START closes a segment from that START. The remembered
/// START is only replaced by a later START, never cleared, so a second STOP without
/// a new START emits another segment from the same START.
pub fn segment(events: &[Event]) -> Vec<Segment> {
    let mut last_start: Option<usize> = None;
    let mut segments = Vec::new();

    for (i, event) in events.iter().enumerate() {
        match event.kind {
            EventKind::Start => last_start = Some(i),
            EventKind::Stop => {
                if let Some(start) = last_start.filter(|&start| start < i) {
                    segments.push(Segment { start, stop: i });
                }
            }
            _ => {}
        }
    }

    log::debug!(
        "Segmented {} events into {} transactions",
        events.len(),
        segments.len()
    );
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_transaction(address: u8, byte: u8) -> Vec<Event> {
        vec![
            Event::start(),
            Event::write(address),
            Event::ack(),
            Event::data(byte),
            Event::ack(),
            Event::stop(),
        ]
    }

    #[test]
    fn test_empty_sequence() {
        assert!(segment(&[]).is_empty());
    }

    #[test]
    fn test_consecutive_transactions() {
        let mut events = write_transaction(0x6B, 0x0A);
        events.push(Event::none());
        events.extend(write_transaction(0x6B, 0x0B));

        let segments = segment(&events);
        assert_eq!(
            segments,
            vec![Segment { start: 0, stop: 5 }, Segment { start: 7, stop: 12 }]
        );

        for seg in &segments {
            let slice = seg.slice(&events);
            assert_eq!(slice.first().unwrap().kind, EventKind::Start);
            assert_eq!(slice.last().unwrap().kind, EventKind::Stop);
            assert_eq!(slice.len(), seg.len());
            assert!(!seg.is_empty());
        }
    }

    #[test]
    fn test_stop_without_start_is_ignored() {
        let events = vec![Event::stop(), Event::write(0x10), Event::stop()];
        assert!(segment(&events).is_empty());
    }

    #[test]
    fn test_unclosed_start_is_ignored() {
        let events = vec![Event::start(), Event::write(0x10), Event::ack()];
        assert!(segment(&events).is_empty());
    }

    #[test]
    fn test_second_stop_reuses_last_start() {
        let events = vec![
            Event::start(),
            Event::write(0x10),
            Event::ack(),
            Event::stop(),
            Event::stop(),
        ];
        assert_eq!(
            segment(&events),
            vec![Segment { start: 0, stop: 3 }, Segment { start: 0, stop: 4 }]
        );
    }

    #[test]
    fn test_latest_start_wins() {
        let events = vec![
            Event::start(),
            Event::write(0x10),
            Event::start(),
            Event::read(0x10),
            Event::ack(),
            Event::stop(),
        ];
        assert_eq!(segment(&events), vec![Segment { start: 2, stop: 5 }]);
    }
}
