//! Retransmission timer management.
//!
//! Go-Back-N runs a **single** logical timer per sender, tied to the oldest
//! unacknowledged frame — not one timer per frame. [`RetransmitTimer`]
//! tracks that timer as an optional deadline over a fixed timeout:
//!
//! - armed **iff** at least one frame is in flight,
//! - restarted fresh whenever a new frame becomes the oldest unacked one,
//! - disarmed when the window drains (`base == next_seq`).
//!
//! Re-arming replaces the deadline rather than stacking timers, so there is
//! never more than one pending expiry. The session plugs
//! [`sleep_deadline`](RetransmitTimer::sleep_deadline) straight into a
//! parked `tokio::time::Sleep`; the armed guard on the select branch keeps
//! a disarmed timer from ever firing.

use std::time::Duration;

use tokio::time::Instant;

/// Park a disarmed timer far enough out that it can never win a select.
const FAR_FUTURE: Duration = Duration::from_secs(365 * 24 * 3600);

/// The sender's single retransmission timer.
#[derive(Debug)]
pub struct RetransmitTimer {
    /// Fixed retransmission timeout granted to the oldest unacked frame.
    timeout: Duration,
    /// Pending expiry, or `None` while no frame is in flight.
    deadline: Option<Instant>,
}

impl RetransmitTimer {
    /// Create a disarmed timer with the given fixed timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: None,
        }
    }

    /// `true` while an expiry is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Arm the timer if it is idle; a pending deadline is left untouched.
    ///
    /// Used when a new frame enters an already-running window: the timer
    /// still belongs to the oldest unacked frame.
    pub fn arm_if_idle(&mut self) {
        if self.deadline.is_none() {
            self.deadline = Some(Instant::now() + self.timeout);
        }
    }

    /// Restart the timer with a fresh full timeout, replacing any pending
    /// deadline.
    ///
    /// Used when the window slides (a new oldest unacked frame gets a fresh
    /// RTT budget) and after a timeout retransmission.
    pub fn restart(&mut self) {
        self.deadline = Some(Instant::now() + self.timeout);
    }

    /// Disarm the timer: no outstanding frames remain.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Deadline to park a `tokio::time::Sleep` on.
    ///
    /// A disarmed timer yields a far-future instant; the caller must still
    /// gate the select branch on [`is_armed`](Self::is_armed).
    pub fn sleep_deadline(&self) -> Instant {
        self.deadline
            .unwrap_or_else(|| Instant::now() + FAR_FUTURE)
    }
}
