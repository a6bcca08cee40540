//! Transaction decoding engine
//!
//! Turns the events of one START..STOP bracket into a [`Transaction`]. Decoding is
//! a small state machine following the I2C frame layout:
//!
//! ```text
//! START    --Start-->        ADDR
//! ADDR     --Read/Write-->   ADDR_ACK   (direction and address)
//! ADDR_ACK --Ack/Nack-->     DATA       (target ack)
//! DATA     --Data-->         DATA_ACK   (append byte)
//! DATA     --Stop/Restart--> done
//! DATA_ACK --Ack/Nack-->     DATA       (writes only: Ack updates target ack)
//! ```
//!
//! Any other event aborts decoding and yields an invalid transaction. There is no
//! recovery: a malformed bracket is reported, never repaired.

use crate::types::{Ack, Event, EventKind, Transaction, TransactionKind};

/// Transaction decoder - interprets bracketed event slices
pub struct TransactionDecoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    Start,
    Addr,
    AddrAck,
    Data,
    DataAck,
}

enum Step {
    Next(DecodeState),
    Done,
    Invalid,
}

impl TransactionDecoder {
    /// Decode one event slice into a transaction
    ///
    /// Slices that are not bracketed as START, then no conditions, then STOP or
    /// RESTART decode to [`Transaction::invalid`] without running the state machine.
    /// The same happens as soon as an event arrives out of order.
    pub fn decode(events: &[Event]) -> Transaction {
        if !Self::is_bracketed(events) {
            log::debug!("Slice of {} events is not bracketed, marking invalid", events.len());
            return Transaction::invalid();
        }

        let mut transaction = Transaction::invalid();
        let mut state = DecodeState::Start;

        for (i, event) in events.iter().enumerate() {
            match Self::step(state, event, &mut transaction) {
                Step::Next(next) => {
                    log::trace!("{:?} --{}--> {:?}", state, event, next);
                    state = next;
                }
                Step::Done => {
                    log::trace!("{:?} --{}--> done", state, event);
                    return transaction;
                }
                Step::Invalid => {
                    log::debug!(
                        "Unexpected {} in state {:?} at offset {}, marking invalid",
                        event,
                        state,
                        i
                    );
                    return Transaction::invalid();
                }
            }
        }

        // Ran out of events before reaching STOP
        Transaction::invalid()
    }

    /// Check the outer bracketing of a transaction slice
    ///
    /// The first event must be START, the last STOP or RESTART, and no START, STOP
    /// or RESTART may occur in between.
    pub fn is_bracketed(events: &[Event]) -> bool {
        let [first, inner @ .., last] = events else {
            return false;
        };

        first.kind == EventKind::Start
            && matches!(last.kind, EventKind::Stop | EventKind::Restart)
            && !inner.iter().any(|e| e.kind.is_condition())
    }

    fn step(state: DecodeState, event: &Event, transaction: &mut Transaction) -> Step {
        match (state, event.kind) {
            (DecodeState::Start, EventKind::Start) => Step::Next(DecodeState::Addr),

            (DecodeState::Addr, EventKind::Read | EventKind::Write) => match event.payload {
                Some(address) => {
                    transaction.kind = if event.kind == EventKind::Read {
                        TransactionKind::Read
                    } else {
                        TransactionKind::Write
                    };
                    transaction.address = address;
                    Step::Next(DecodeState::AddrAck)
                }
                None => Step::Invalid,
            },

            (DecodeState::AddrAck, EventKind::Ack) => {
                transaction.target_ack = Ack::Ack;
                Step::Next(DecodeState::Data)
            }
            (DecodeState::AddrAck, EventKind::Nack) => {
                transaction.target_ack = Ack::Nack;
                Step::Next(DecodeState::Data)
            }

            (DecodeState::Data, EventKind::Stop | EventKind::Restart) => Step::Done,
            (DecodeState::Data, EventKind::Data) => match event.payload {
                Some(byte) => {
                    transaction.data.push(byte);
                    Step::Next(DecodeState::DataAck)
                }
                None => Step::Invalid,
            },

            // Read data is acknowledged by the initiator, not the target
            (DecodeState::DataAck, EventKind::Ack) => {
                if transaction.kind == TransactionKind::Write {
                    transaction.target_ack = Ack::Ack;
                }
                Step::Next(DecodeState::Data)
            }
            (DecodeState::DataAck, EventKind::Nack) => Step::Next(DecodeState::Data),

            _ => Step::Invalid,
        }
    }
}
