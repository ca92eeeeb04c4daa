//! Entry point for `gbn-over-udp`.
//!
//! Parses CLI arguments and dispatches into **receiver**, **sender**, or
//! **simulate** mode. All actual protocol work is delegated to library
//! modules; `main.rs` owns only process setup (logging, signal handling,
//! argument parsing) and the startup bind diagnostic.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};

use gbn_over_udp::channel::Channel;
use gbn_over_udp::driver;
use gbn_over_udp::loss::{LossModel, RandomLoss};
use gbn_over_udp::session::{ReceiverSession, SenderConfig, SenderSession};

/// Go-Back-N ARQ over a simulated lossy UDP channel.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Run the receiving actor, listening for frames.
    Receiver {
        /// Local address to bind (e.g. 127.0.0.1:5001).
        #[arg(short, long, default_value = "127.0.0.1:5001")]
        bind: SocketAddr,
        /// Drop probability applied to each outbound ACK.
        #[arg(short, long, default_value_t = 0.2)]
        loss: f64,
        /// RNG seed for a reproducible loss pattern.
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Run the sending actor against a receiver.
    Sender {
        /// Receiver address to send to (e.g. 127.0.0.1:5001).
        #[arg(short, long, default_value = "127.0.0.1:5001")]
        target: SocketAddr,
        /// Total frames to deliver.
        #[arg(long, default_value_t = 20)]
        total: u64,
        /// Sliding-window size N (1 = stop-and-wait).
        #[arg(short, long, default_value_t = 4)]
        window: u64,
        /// Drop probability applied to each frame transmission.
        #[arg(short, long, default_value_t = 0.2)]
        loss: f64,
        /// Retransmission timeout in milliseconds.
        #[arg(long, default_value_t = 2000)]
        timeout_ms: u64,
        /// ACK poll interval in milliseconds.
        #[arg(long, default_value_t = 200)]
        poll_ms: u64,
        /// RNG seed for a reproducible loss pattern.
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Run both actors in-process over loopback.
    Simulate {
        /// Total frames to deliver.
        #[arg(long, default_value_t = 20)]
        total: u64,
        /// Sliding-window size N (1 = stop-and-wait).
        #[arg(short, long, default_value_t = 4)]
        window: u64,
        /// Drop probability, applied independently to frames and ACKs.
        #[arg(short, long, default_value_t = 0.2)]
        loss: f64,
        /// Retransmission timeout in milliseconds.
        #[arg(long, default_value_t = 2000)]
        timeout_ms: u64,
        /// ACK poll interval in milliseconds.
        #[arg(long, default_value_t = 200)]
        poll_ms: u64,
        /// RNG seed for a reproducible loss pattern.
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise env_logger; set RUST_LOG to control verbosity.
    env_logger::init();

    let cli = Cli::parse();

    match cli.mode {
        Mode::Receiver { bind, loss, seed } => {
            let channel = Channel::bind(bind).await.map_err(|e| {
                log::error!("cannot bind receiver endpoint {bind}: {e}");
                e
            })?;
            let session = ReceiverSession::new(channel, loss_model(loss, seed)?);
            tokio::select! {
                res = session.run() => {
                    let report = res?;
                    log::info!(
                        "receiver done: {} delivered, {} discarded, {} ACK(s) suppressed",
                        report.delivered.len(),
                        report.discarded,
                        report.acks_suppressed
                    );
                }
                _ = tokio::signal::ctrl_c() => {
                    log::info!("interrupted; releasing receiver endpoint");
                }
            }
        }

        Mode::Sender {
            target,
            total,
            window,
            loss,
            timeout_ms,
            poll_ms,
            seed,
        } => {
            let local = SocketAddr::from(([0, 0, 0, 0], 0));
            let channel = Channel::bind(local).await.map_err(|e| {
                log::error!("cannot bind sender endpoint: {e}");
                e
            })?;
            let config = SenderConfig {
                total_frames: total,
                window_size: window,
                timeout: Duration::from_millis(timeout_ms),
                ack_poll_interval: Duration::from_millis(poll_ms),
            };
            let session = SenderSession::new(channel, target, config, loss_model(loss, seed)?);
            tokio::select! {
                res = session.run() => {
                    let report = res?;
                    log::info!(
                        "sender done: {} attempt(s), {} suppressed, {} timeout round(s), {} stale ACK(s)",
                        report.frame_attempts,
                        report.suppressed,
                        report.timeout_rounds,
                        report.stale_acks
                    );
                }
                _ = tokio::signal::ctrl_c() => {
                    log::info!("interrupted; releasing sender endpoint");
                }
            }
        }

        Mode::Simulate {
            total,
            window,
            loss,
            timeout_ms,
            poll_ms,
            seed,
        } => {
            let config = SenderConfig {
                total_frames: total,
                window_size: window,
                timeout: Duration::from_millis(timeout_ms),
                ack_poll_interval: Duration::from_millis(poll_ms),
            };
            // Independent models for the two directions; a seeded run derives
            // a distinct stream for each so both replay.
            let frame_loss = loss_model(loss, seed)?;
            let ack_loss = loss_model(loss, seed.map(|s| s.wrapping_add(1)))?;
            let report = driver::run_simulation(config, frame_loss, ack_loss).await?;
            log::info!(
                "simulation done: {} frame(s) delivered in order, {} attempt(s), {} timeout round(s), {} discard(s) at receiver",
                report.receiver.delivered.len(),
                report.sender.frame_attempts,
                report.sender.timeout_rounds,
                report.receiver.discarded
            );
        }
    }

    Ok(())
}

/// Build the Bernoulli loss model for a CLI-supplied probability.
fn loss_model(p: f64, seed: Option<u64>) -> Result<Box<dyn LossModel>, String> {
    if !(0.0..=1.0).contains(&p) {
        return Err(format!("loss probability must be in [0, 1], got {p}"));
    }
    Ok(match seed {
        Some(s) => Box::new(RandomLoss::with_seed(p, s)),
        None => Box::new(RandomLoss::new(p)),
    })
}
