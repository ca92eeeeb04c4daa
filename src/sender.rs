//! Go-Back-N send-side state machine.
//!
//! [`SendWindow`] maintains a sliding window of up to `N` in-flight frames.
//! Unlike stop-and-wait, multiple frames may be outstanding simultaneously.
//!
//! # Protocol contract
//!
//! - At most `window_size` frames may be in flight at once.
//! - ACKs are **cumulative**: `ack = K` means the receiver has accepted all
//!   frames with sequence number < `K`.
//! - On timeout, the caller retransmits **all** unacked frames from `base`
//!   onwards (go back to N).
//! - A transmission attempt suppressed by the loss model still counts as
//!   sent: the sender cannot know the channel dropped it, so `next_seq`
//!   advances either way and only retransmission can recover the frame.
//!
//! This module only manages state; all socket I/O and timing is the
//! session's responsibility ([`crate::session::SenderSession`]).

use crate::frame::Datagram;

// ---------------------------------------------------------------------------
// SendWindow
// ---------------------------------------------------------------------------

/// Go-Back-N send-side state for one session.
///
/// # Sequence-number layout
///
/// ```text
///     base            next_seq        base + N
///      │                  │               │
///  ────┼──────────────────┼───────────────┼─────▶ seq space
///      │ <── in flight ──▶│ <─ sendable ─▶│ blocked
/// ```
///
/// Invariant: `base <= next_seq <= base + N` at all times.
#[derive(Debug)]
pub struct SendWindow {
    /// Sequence number of the **oldest** unacked frame (left window edge).
    pub base: u64,

    /// Sequence number of the **next** new frame to send.
    pub next_seq: u64,

    /// Maximum number of frames that may be in flight simultaneously (N).
    window_size: u64,

    /// Total frames in the session; sequence numbers run in `[0, total)`.
    total_frames: u64,
}

impl SendWindow {
    /// Create a new [`SendWindow`] for a session of `total_frames` frames.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    pub fn new(total_frames: u64, window_size: u64) -> Self {
        assert!(window_size >= 1, "window_size must be at least 1");
        Self {
            base: 0,
            next_seq: 0,
            window_size,
            total_frames,
        }
    }

    /// `true` when a new frame may be transmitted: the window has room and
    /// frames remain unsent.
    pub fn can_send(&self) -> bool {
        self.next_seq < self.base + self.window_size && self.next_seq < self.total_frames
    }

    /// Number of frames currently awaiting acknowledgement.
    pub fn in_flight(&self) -> u64 {
        self.next_seq - self.base
    }

    /// `true` when at least one frame is awaiting acknowledgement.
    pub fn has_unacked(&self) -> bool {
        self.base < self.next_seq
    }

    /// `true` once every frame has been cumulatively acknowledged.
    pub fn is_complete(&self) -> bool {
        self.base == self.total_frames
    }

    /// The frame that the next transmission attempt will carry.
    ///
    /// Call [`record_sent`](Self::record_sent) immediately after the attempt
    /// to advance `next_seq` — whether or not the channel delivered it.
    pub fn next_frame(&self) -> Datagram {
        Datagram::Frame { seq: self.next_seq }
    }

    /// Mark the frame from [`next_frame`](Self::next_frame) as sent and
    /// advance `next_seq`.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if the window is full or no frames remain.
    /// Check [`can_send`](Self::can_send) before calling.
    pub fn record_sent(&mut self) {
        debug_assert!(
            self.can_send(),
            "record_sent called outside the window (next_seq={} base={} N={})",
            self.next_seq,
            self.base,
            self.window_size
        );
        self.next_seq += 1;
        self.assert_invariant();
    }

    /// Process a cumulative ACK.
    ///
    /// Slides `base` forward to `ack` and returns the number of newly
    /// acknowledged frames. Returns `0` for a stale/duplicate ACK
    /// (`ack <= base`) or a spurious ACK beyond `next_seq` — neither moves
    /// the window.
    pub fn on_ack(&mut self, ack: u64) -> u64 {
        if ack <= self.base || ack > self.next_seq {
            return 0;
        }
        let newly_acked = ack - self.base;
        self.base = ack;
        self.assert_invariant();
        newly_acked
    }

    /// Sequence numbers to retransmit on timeout, in ascending order:
    /// the entire current window `[base, next_seq)`.
    pub fn retransmit_seqs(&self) -> std::ops::Range<u64> {
        self.base..self.next_seq
    }

    fn assert_invariant(&self) {
        debug_assert!(
            self.base <= self.next_seq && self.next_seq <= self.base + self.window_size,
            "window invariant violated: base={} next_seq={} N={}",
            self.base,
            self.next_seq,
            self.window_size
        );
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Send as many new frames as the window allows.
    fn fill(w: &mut SendWindow) -> u64 {
        let mut sent = 0;
        while w.can_send() {
            w.record_sent();
            sent += 1;
        }
        sent
    }

    #[test]
    fn initial_state() {
        let w = SendWindow::new(10, 4);
        assert_eq!(w.base, 0);
        assert_eq!(w.next_seq, 0);
        assert!(w.can_send());
        assert!(!w.has_unacked());
        assert!(!w.is_complete());
        assert_eq!(w.in_flight(), 0);
    }

    #[test]
    #[should_panic(expected = "window_size")]
    fn zero_window_rejected() {
        let _ = SendWindow::new(10, 0);
    }

    #[test]
    fn record_sent_advances_next_seq() {
        let mut w = SendWindow::new(10, 4);
        assert_eq!(w.next_frame(), Datagram::Frame { seq: 0 });
        w.record_sent();
        assert_eq!(w.next_seq, 1);
        assert_eq!(w.base, 0); // not acked yet
        assert_eq!(w.in_flight(), 1);
        assert!(w.has_unacked());
    }

    #[test]
    fn window_full_blocks_send() {
        let mut w = SendWindow::new(10, 3);
        assert_eq!(fill(&mut w), 3);
        assert!(!w.can_send());
        assert_eq!(w.in_flight(), 3);
    }

    #[test]
    fn total_frames_blocks_send() {
        // Window of 8 but only 2 frames in the session.
        let mut w = SendWindow::new(2, 8);
        assert_eq!(fill(&mut w), 2);
        assert!(!w.can_send());
    }

    #[test]
    fn ack_slides_window_by_one() {
        let mut w = SendWindow::new(10, 4);
        w.record_sent();

        assert_eq!(w.on_ack(1), 1);
        assert_eq!(w.base, 1);
        assert!(!w.has_unacked());
    }

    #[test]
    fn cumulative_ack_slides_multiple() {
        let mut w = SendWindow::new(10, 4);
        fill(&mut w);
        assert_eq!(w.next_seq, 4);

        // One ACK covers three frames at once.
        assert_eq!(w.on_ack(3), 3);
        assert_eq!(w.base, 3);
        assert_eq!(w.in_flight(), 1);
        assert!(w.can_send());
    }

    #[test]
    fn stale_ack_does_not_move_base() {
        let mut w = SendWindow::new(10, 4);
        fill(&mut w);
        assert_eq!(w.on_ack(2), 2);

        assert_eq!(w.on_ack(2), 0);
        assert_eq!(w.on_ack(1), 0);
        assert_eq!(w.base, 2);
    }

    #[test]
    fn spurious_ack_beyond_next_seq_ignored() {
        let mut w = SendWindow::new(10, 4);
        w.record_sent();

        assert_eq!(w.on_ack(1000), 0);
        assert_eq!(w.base, 0); // unchanged
    }

    #[test]
    fn retransmit_scope_is_whole_window() {
        // Window [5, 9): a timeout must retransmit exactly 5,6,7,8 ascending.
        let mut w = SendWindow::new(20, 4);
        fill(&mut w); // 0..4 in flight
        w.on_ack(4);
        fill(&mut w); // 4..8 in flight
        w.on_ack(5);
        fill(&mut w); // window now [5, 9)
        assert_eq!(w.base, 5);
        assert_eq!(w.next_seq, 9);

        let seqs: Vec<u64> = w.retransmit_seqs().collect();
        assert_eq!(seqs, vec![5, 6, 7, 8]);
    }

    #[test]
    fn retransmit_scope_shrinks_as_acks_arrive() {
        let mut w = SendWindow::new(10, 4);
        fill(&mut w);
        assert_eq!(w.retransmit_seqs().collect::<Vec<_>>(), vec![0, 1, 2, 3]);

        w.on_ack(2);
        assert_eq!(w.retransmit_seqs().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn completion_when_base_reaches_total() {
        let mut w = SendWindow::new(3, 4);
        fill(&mut w);
        assert!(!w.is_complete());

        assert_eq!(w.on_ack(3), 3);
        assert!(w.is_complete());
        assert!(!w.can_send());
        assert!(!w.has_unacked());
    }

    #[test]
    fn zero_frames_session_trivially_complete() {
        let w = SendWindow::new(0, 4);
        assert!(w.is_complete());
        assert!(!w.can_send());
    }

    #[test]
    fn window_reopens_after_slide() {
        let mut w = SendWindow::new(10, 2);
        fill(&mut w);
        assert!(!w.can_send());

        w.on_ack(1);
        assert!(w.can_send());
        w.record_sent();
        assert_eq!(w.next_seq, 3);
        assert!(!w.can_send());
    }
}
