//! Event classification
//!
//! Maps the free-text event description of one capture row to a typed [`Event`].
//! Descriptions are matched against a fixed, prioritised list of patterns; the
//! first pattern that matches decides the kind. Addresses and data bytes are
//! parsed as hexadecimal.

use crate::types::{Event, EventKind};
use regex::Regex;
use std::sync::LazyLock;

// Static patterns, guaranteed to compile.
static START_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^START").expect("static regex: start condition"));

static STOP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^STOP").expect("static regex: stop condition"));

static RESTART_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:RESTART|REPEATED START)").expect("static regex: repeated start condition")
});

static READ_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Read from 0x([0-9A-Fa-f]+) - R/W = 1").expect("static regex: read address")
});

static WRITE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Write to 0x([0-9A-Fa-f]+) - R/W = 0").expect("static regex: write address")
});

static ACK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ACK").expect("static regex: ack"));

static NACK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^NACK").expect("static regex: nack"));

static DATA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^DATA = 0x([0-9A-Fa-f]+)").expect("static regex: data byte")
});

struct EventPattern {
    kind: EventKind,
    regex: &'static LazyLock<Regex>,
}

/// Evaluated in order, first match wins
static EVENT_PATTERNS: &[EventPattern] = &[
    EventPattern { kind: EventKind::Start, regex: &START_REGEX },
    EventPattern { kind: EventKind::Stop, regex: &STOP_REGEX },
    EventPattern { kind: EventKind::Restart, regex: &RESTART_REGEX },
    EventPattern { kind: EventKind::Read, regex: &READ_REGEX },
    EventPattern { kind: EventKind::Write, regex: &WRITE_REGEX },
    EventPattern { kind: EventKind::Ack, regex: &ACK_REGEX },
    EventPattern { kind: EventKind::Nack, regex: &NACK_REGEX },
    EventPattern { kind: EventKind::Data, regex: &DATA_REGEX },
];

/// Classifies capture rows into events
#[derive(Debug, Clone, Copy)]
pub struct EventClassifier {
    event_column: usize,
}

impl EventClassifier {
    /// Create a classifier reading the description from `event_column`
    pub fn new(event_column: usize) -> Self {
        Self { event_column }
    }

    /// Classify one raw row
    ///
    /// Rows too short to contain the event column classify as `None`.
    pub fn classify(&self, row: &[String]) -> Event {
        match row.get(self.event_column) {
            Some(description) => classify_description(description),
            None => {
                log::trace!("Row has no column {}, classified as NONE", self.event_column);
                Event::none()
            }
        }
    }
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Classify a single event description
pub fn classify_description(description: &str) -> Event {
    for pattern in EVENT_PATTERNS {
        let Some(captures) = pattern.regex.captures(description) else {
            continue;
        };

        let Some(value) = captures.get(1) else {
            return Event::new(pattern.kind);
        };

        return match u8::from_str_radix(value.as_str(), 16) {
            Ok(payload) => Event {
                kind: pattern.kind,
                payload: Some(payload),
            },
            Err(e) => {
                log::warn!(
                    "Payload 0x{} of {} event does not fit in a byte ({}), classified as NONE",
                    value.as_str(),
                    pattern.kind,
                    e
                );
                Event::none()
            }
        };
    }

    Event::none()
}
