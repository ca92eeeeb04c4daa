//! `gbn-over-udp` — a Go-Back-N ARQ simulator over a lossy UDP channel.
//!
//! A sender streams numbered frames under a bounded sliding window; a
//! receiver accepts frames only in sequence order and answers every
//! arrival with a cumulative ACK. A single retransmission timer covers the
//! oldest unacknowledged frame, and its expiry resends the entire current
//! window — the defining Go-Back-N behavior. Packet loss is simulated by
//! an injectable per-attempt drop decision, so every loss pattern (frame
//! lost, ACK lost, both, out-of-order arrival) is reproducible in tests.
//!
//! # Architecture
//!
//! ```text
//!  ┌───────────────┐      FRAME:<seq>       ┌─────────────────┐
//!  │ SenderSession │───────────────────────▶│ ReceiverSession │
//!  └───┬───────────┘                        └───────┬─────────┘
//!      │ SendWindow        ACK:<n>                  │ Expectation
//!      │ RetransmitTimer ◀───────────────────────── │
//!      │                                            │
//!  ┌───▼────────┐    raw UDP datagrams    ┌─────────▼───────┐
//!  │  Channel   │◀───────────────────────▶│     Channel     │
//!  └────────────┘   (loss decided per     └─────────────────┘
//!                    attempt, send side)
//! ```
//!
//! Each module has a single responsibility:
//! - [`frame`]    — wire format (`FRAME:<seq>`, `ACK:<n>`, `EXIT`)
//! - [`loss`]     — injectable loss model (random, scripted, none)
//! - [`channel`]  — async UDP endpoint speaking [`frame::Datagram`]
//! - [`sender`]   — GBN outbound window state machine
//! - [`receiver`] — GBN inbound cumulative-ACK state machine
//! - [`timer`]    — the sender's single retransmission timer
//! - [`session`]  — per-actor I/O loops and session reports
//! - [`driver`]   — in-process simulation wiring both actors over loopback

pub mod channel;
pub mod driver;
pub mod frame;
pub mod loss;
pub mod receiver;
pub mod sender;
pub mod session;
pub mod timer;
