//! Session loops wiring the state machines to the channel.
//!
//! # Architecture
//!
//! ```text
//!  ┌───────────────┐        FRAME:<seq>        ┌─────────────────┐
//!  │ SenderSession │──────────────────────────▶│ ReceiverSession │
//!  │  SendWindow   │                           │   Expectation   │
//!  │  RetransmitTimer  ◀── ACK:<n> ────────────│                 │
//!  └───────┬───────┘        (cumulative)       └────────┬────────┘
//!          │                                            │
//!          └────────────────── EXIT ────────────────────┘
//! ```
//!
//! Each actor is a single-threaded cooperative loop. The sender's loop must
//! interleave three concerns without blocking: window fill, ACK receipt,
//! and timer expiry. [`SenderSession::run`] merges the last two into one
//! ordered event stream with `tokio::select!` — the ACK wait is bounded by
//! `ack_poll_interval` so the timer check is never starved. The receiver
//! has nothing to do concurrently, so [`ReceiverSession::run`] blocks on
//! the next datagram.
//!
//! Loss is decided per transmission attempt at the sending site: the
//! sender's [`LossModel`] covers frames, the receiver's covers ACKs. A
//! suppressed attempt never touches the socket, but the sender still
//! treats it as sent — `next_seq` advances and the timer arms — because a
//! real sender cannot observe channel loss.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::time;

use crate::channel::{Channel, ChannelError};
use crate::frame::Datagram;
use crate::loss::LossModel;
use crate::receiver::Expectation;
use crate::sender::SendWindow;
use crate::timer::RetransmitTimer;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunable parameters for one sending session.
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// Frames to deliver; sequence numbers run in `[0, total_frames)`.
    pub total_frames: u64,
    /// Sliding-window size N (≥ 1). `1` degenerates to stop-and-wait.
    pub window_size: u64,
    /// Fixed retransmission timeout for the oldest unacked frame.
    pub timeout: Duration,
    /// Upper bound on one ACK wait, so timer expiry is checked regularly.
    pub ack_poll_interval: Duration,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            total_frames: 20,
            window_size: 4,
            timeout: Duration::from_secs(2),
            ack_poll_interval: Duration::from_millis(200),
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What one sending session did, for inspection after completion.
#[derive(Debug, Default)]
pub struct SenderReport {
    /// Transmission attempts, first sends and retransmissions alike.
    pub frame_attempts: u64,
    /// Attempts the loss model dropped before they reached the socket.
    pub suppressed: u64,
    /// Timeout expirations, each retransmitting the whole current window.
    pub timeout_rounds: u64,
    /// Every ACK number observed, in arrival order.
    pub acks: Vec<u64>,
    /// ACKs that did not move the window (duplicate or spurious).
    pub stale_acks: u64,
}

/// What one receiving session did.
#[derive(Debug, Default)]
pub struct ReceiverReport {
    /// Frames delivered to the upper layer, in order.
    pub delivered: Vec<u64>,
    /// Frames discarded as out-of-order or duplicate.
    pub discarded: u64,
    /// Cumulative ACK transmission attempts.
    pub ack_attempts: u64,
    /// ACK attempts dropped by the loss model.
    pub acks_suppressed: u64,
}

// ---------------------------------------------------------------------------
// SenderSession
// ---------------------------------------------------------------------------

/// The sending actor: drives a [`SendWindow`] over a [`Channel`] until
/// every frame is cumulatively acknowledged, then signals termination.
pub struct SenderSession {
    channel: Channel,
    peer: SocketAddr,
    config: SenderConfig,
    loss: Box<dyn LossModel>,
}

impl SenderSession {
    /// Wire a sender to `peer` over an already-bound channel.
    pub fn new(
        channel: Channel,
        peer: SocketAddr,
        config: SenderConfig,
        loss: Box<dyn LossModel>,
    ) -> Self {
        Self {
            channel,
            peer,
            config,
            loss,
        }
    }

    /// Run the session to completion.
    ///
    /// Returns once all frames in `[0, total_frames)` have been cumulatively
    /// acknowledged and the termination signal has been sent (best-effort).
    pub async fn run(self) -> Result<SenderReport, ChannelError> {
        let Self {
            channel,
            peer,
            config,
            mut loss,
        } = self;

        let mut window = SendWindow::new(config.total_frames, config.window_size);
        let mut timer = RetransmitTimer::new(config.timeout);
        let mut report = SenderReport::default();

        log::info!(
            "[gbn] sending {} frame(s) to {peer}: window={} timeout={:?}",
            config.total_frames,
            config.window_size,
            config.timeout
        );

        let sleep = time::sleep_until(timer.sleep_deadline());
        tokio::pin!(sleep);

        while !window.is_complete() {
            // Fill the window: every attempt counts as sent, delivered or not.
            while window.can_send() {
                let frame = window.next_frame();
                if !attempt_send(&channel, loss.as_mut(), &frame, peer).await? {
                    report.suppressed += 1;
                }
                report.frame_attempts += 1;
                window.record_sent();
                timer.arm_if_idle();
            }

            sleep.as_mut().reset(timer.sleep_deadline());

            tokio::select! {
                // ── ACK arrival (bounded wait) ───────────────────────────
                polled = time::timeout(config.ack_poll_interval, channel.recv_from()) => {
                    match polled {
                        Ok(Ok((Datagram::Ack { ack }, addr))) if addr == peer => {
                            report.acks.push(ack);
                            let newly_acked = window.on_ack(ack);
                            if newly_acked > 0 {
                                // A new oldest unacked frame gets a fresh
                                // timeout budget; an empty window needs none.
                                if window.has_unacked() {
                                    timer.restart();
                                } else {
                                    timer.disarm();
                                }
                                log::debug!(
                                    "[gbn] ← ACK:{ack} window slides: base={} next_seq={}",
                                    window.base,
                                    window.next_seq
                                );
                            } else {
                                report.stale_acks += 1;
                                log::debug!("[gbn] ← ACK:{ack} stale (base={})", window.base);
                            }
                        }
                        Ok(Ok((datagram, addr))) => {
                            log::debug!("[gbn] ignoring {datagram} from {addr}");
                        }
                        Ok(Err(ChannelError::Malformed(e))) => {
                            log::debug!("[gbn] ignoring malformed datagram: {e}");
                        }
                        Ok(Err(e)) => return Err(e),
                        // No ACK within the poll interval; re-check the timer.
                        Err(_elapsed) => {}
                    }
                }

                // ── Retransmission timeout ───────────────────────────────
                _ = &mut sleep, if timer.is_armed() => {
                    report.timeout_rounds += 1;
                    log::debug!(
                        "[gbn] timeout — retransmitting window [{}, {})",
                        window.base,
                        window.next_seq
                    );
                    // Go-Back-N: resend every unacked frame, oldest first.
                    for seq in window.retransmit_seqs() {
                        if !attempt_send(&channel, loss.as_mut(), &Datagram::Frame { seq }, peer)
                            .await?
                        {
                            report.suppressed += 1;
                        }
                        report.frame_attempts += 1;
                    }
                    timer.restart();
                }
            }
        }

        // Termination signal: best-effort, unacknowledged, and a shutdown
        // notification rather than a data transmission — no loss roll.
        let _ = channel.send_to(&Datagram::Exit, peer).await;
        log::info!(
            "[gbn] all {} frame(s) acknowledged; sent EXIT ({} attempt(s), {} timeout round(s))",
            config.total_frames,
            report.frame_attempts,
            report.timeout_rounds
        );
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// ReceiverSession
// ---------------------------------------------------------------------------

/// The receiving actor: accepts in-order frames, discards everything else,
/// and answers every arrival with a cumulative ACK until EXIT arrives.
pub struct ReceiverSession {
    channel: Channel,
    expectation: Expectation,
    loss: Box<dyn LossModel>,
}

impl ReceiverSession {
    /// Wire a receiver over an already-bound channel. `loss` covers its
    /// outbound ACKs.
    pub fn new(channel: Channel, loss: Box<dyn LossModel>) -> Self {
        Self {
            channel,
            expectation: Expectation::new(),
            loss,
        }
    }

    /// Address the receiver is listening on (useful with ephemeral binds).
    pub fn local_addr(&self) -> SocketAddr {
        self.channel.local_addr
    }

    /// Loop until the termination signal arrives.
    ///
    /// The channel endpoint is released when the session (and with it the
    /// channel) is dropped on return.
    pub async fn run(mut self) -> Result<ReceiverReport, ChannelError> {
        log::info!("[gbn] receiver listening on {}", self.channel.local_addr);
        let mut report = ReceiverReport::default();

        loop {
            let (datagram, peer) = match self.channel.recv_from().await {
                Ok(v) => v,
                Err(ChannelError::Malformed(e)) => {
                    log::debug!("[gbn] ignoring malformed datagram: {e}");
                    continue;
                }
                Err(e) => return Err(e),
            };

            match datagram {
                Datagram::Exit => {
                    log::info!("[gbn] exit signal received; shutting down");
                    break;
                }
                Datagram::Frame { seq } => {
                    if self.expectation.on_frame(seq) {
                        log::debug!("[gbn] ← FRAME:{seq} in order; delivered");
                    } else {
                        report.discarded += 1;
                        log::debug!(
                            "[gbn] ← FRAME:{seq} out of order (expected {}); discarded",
                            self.expectation.expected
                        );
                    }
                    // Accepted or discarded, answer with the cumulative ACK.
                    let ack = Datagram::Ack {
                        ack: self.expectation.ack_number(),
                    };
                    report.ack_attempts += 1;
                    if !attempt_send(&self.channel, self.loss.as_mut(), &ack, peer).await? {
                        report.acks_suppressed += 1;
                    }
                }
                Datagram::Ack { ack } => {
                    log::debug!("[gbn] ignoring unexpected ACK:{ack}");
                }
            }
        }

        report.delivered = self.expectation.delivered;
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Channel helpers
// ---------------------------------------------------------------------------

/// One transmission attempt, subject to the loss model.
///
/// Returns `Ok(true)` when the datagram was handed to the socket and
/// `Ok(false)` when the channel dropped it (simulated). Each call rolls an
/// independent drop decision.
async fn attempt_send(
    channel: &Channel,
    loss: &mut dyn LossModel,
    datagram: &Datagram,
    dest: SocketAddr,
) -> Result<bool, ChannelError> {
    if loss.decide_drop() {
        log::debug!("[gbn] {datagram} lost in channel (simulated)");
        return Ok(false);
    }
    channel.send_to(datagram, dest).await?;
    log::debug!("[gbn] → {datagram}");
    Ok(true)
}
