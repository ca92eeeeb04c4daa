//! In-process simulation driver.
//!
//! Wires a [`SenderSession`] and a [`ReceiverSession`] to loopback UDP
//! endpoints and runs the session to completion: the receiver is spawned
//! as a background task, the sender drives the window until every frame is
//! cumulatively acknowledged, and its EXIT signal stops the receiver. Both
//! actors' reports are joined into a [`SimReport`] so callers (the
//! `simulate` subcommand and the integration tests) can assert on what
//! actually happened on the wire.

use std::net::SocketAddr;

use crate::channel::{Channel, ChannelError};
use crate::loss::LossModel;
use crate::session::{
    ReceiverReport, ReceiverSession, SenderConfig, SenderReport, SenderSession,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can arise while driving a simulation.
#[derive(Debug)]
pub enum SimError {
    /// A session's channel failed.
    Channel(ChannelError),
    /// The receiver task aborted or panicked.
    ReceiverTask(tokio::task::JoinError),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Channel(e) => write!(f, "simulation channel error: {e}"),
            Self::ReceiverTask(e) => write!(f, "receiver task failed: {e}"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<ChannelError> for SimError {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

impl From<tokio::task::JoinError> for SimError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::ReceiverTask(e)
    }
}

// ---------------------------------------------------------------------------
// SimReport
// ---------------------------------------------------------------------------

/// Joined outcome of one complete simulated session.
#[derive(Debug)]
pub struct SimReport {
    pub sender: SenderReport,
    pub receiver: ReceiverReport,
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Run one complete session over loopback.
///
/// `frame_loss` governs the sender's frame transmissions, `ack_loss` the
/// receiver's ACK transmissions; the two decide independently per attempt.
/// Returns after the sender's window has slid past the last frame and the
/// receiver has seen EXIT.
pub async fn run_simulation(
    config: SenderConfig,
    frame_loss: Box<dyn LossModel>,
    ack_loss: Box<dyn LossModel>,
) -> Result<SimReport, SimError> {
    let loopback = SocketAddr::from(([127, 0, 0, 1], 0));

    let receiver_channel = Channel::bind(loopback).await?;
    let receiver_addr = receiver_channel.local_addr;
    let receiver = ReceiverSession::new(receiver_channel, ack_loss);
    let receiver_task = tokio::spawn(receiver.run());

    let sender_channel = Channel::bind(loopback).await?;
    let sender = SenderSession::new(sender_channel, receiver_addr, config, frame_loss);
    let sender_report = sender.run().await?;

    let receiver_report = receiver_task.await??;

    Ok(SimReport {
        sender: sender_report,
        receiver: receiver_report,
    })
}
