//! Go-Back-N receive-side state machine.
//!
//! [`Expectation`] implements the receiver side of Go-Back-N:
//!
//! - Only the exactly **in-order** frame is accepted (`seq == expected`).
//! - Out-of-order and duplicate frames are **discarded**, never buffered.
//! - After every frame (accepted or not) the caller sends a **cumulative
//!   ACK** carrying [`ack_number`](Expectation::ack_number) = `expected`,
//!   which tells the sender the next frame the receiver wants.
//!
//! This module only manages state; all socket I/O is the session's
//! responsibility ([`crate::session::ReceiverSession`]).

/// Go-Back-N receive-side state for one session.
#[derive(Debug, Default)]
pub struct Expectation {
    /// Next in-order sequence number this receiver will accept.
    ///
    /// Incremented by exactly 1 each time the expected frame arrives.
    pub expected: u64,

    /// Frames delivered to the upper layer, in acceptance order.
    ///
    /// Always the contiguous run `0, 1, 2, …` — kept as the observable
    /// record of what "delivery" meant for the session.
    pub delivered: Vec<u64>,
}

impl Expectation {
    /// Create a fresh receiver expecting frame 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an arriving frame.
    ///
    /// Returns `true` if the frame was **accepted** (`seq == expected`) and
    /// delivered to the upper layer.
    ///
    /// Returns `false` for any other sequence number — lower (duplicate)
    /// or higher (gap) — which GBN discards without buffering. The caller
    /// must still send a cumulative ACK with the unchanged
    /// [`ack_number`](Self::ack_number) in both cases.
    pub fn on_frame(&mut self, seq: u64) -> bool {
        if seq == self.expected {
            self.delivered.push(seq);
            self.expected += 1;
            true
        } else {
            false
        }
    }

    /// Cumulative ACK number to send after a frame arrival.
    ///
    /// Means "every frame below this value has been received in order" —
    /// equivalently, the next frame this receiver wants.
    pub fn ack_number(&self) -> u64 {
        self.expected
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
