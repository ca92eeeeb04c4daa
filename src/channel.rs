//! Async UDP channel abstraction.
//!
//! [`Channel`] is a thin wrapper around `tokio::net::UdpSocket` that speaks
//! [`crate::frame::Datagram`] instead of raw bytes. All protocol logic
//! lives elsewhere; this module owns only byte I/O. Loss is not applied
//! here — the sessions decide drops per attempt via a
//! [`crate::loss::LossModel`] before touching the channel, so a suppressed
//! attempt never reaches the socket.

use std::net::SocketAddr;

use tokio::net::UdpSocket;

use crate::frame::{Datagram, DecodeError};

/// Receive buffer size. The wire format is short ASCII, so this is
/// generous; the original scripts read 1024 bytes per datagram too.
const MAX_DATAGRAM: usize = 1024;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can arise from channel operations.
#[derive(Debug)]
pub enum ChannelError {
    /// Underlying I/O error from the OS.
    Io(std::io::Error),
    /// The received datagram could not be decoded. The receiving actor is
    /// expected to ignore these and keep looping.
    Malformed(DecodeError),
}

impl std::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "channel I/O error: {e}"),
            Self::Malformed(e) => write!(f, "malformed datagram: {e}"),
        }
    }
}

impl std::error::Error for ChannelError {}

impl From<std::io::Error> for ChannelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<DecodeError> for ChannelError {
    fn from(e: DecodeError) -> Self {
        Self::Malformed(e)
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// An async, datagram-oriented UDP endpoint.
///
/// All methods are `&self` so the channel can be shared between the receive
/// future and the send paths of one session loop.
#[derive(Debug)]
pub struct Channel {
    /// Address this endpoint is bound to (resolved after the OS assigns an
    /// ephemeral port).
    pub local_addr: SocketAddr,
    inner: UdpSocket,
}

impl Channel {
    /// Bind a new channel endpoint to `local_addr`.
    ///
    /// Passing `127.0.0.1:0` lets the OS choose an ephemeral port.
    /// An unbindable address is the one fatal startup error in this system;
    /// callers surface it before entering their loop.
    pub async fn bind(local_addr: SocketAddr) -> Result<Self, ChannelError> {
        let inner = UdpSocket::bind(local_addr).await?;
        let local_addr = inner.local_addr()?;
        Ok(Self { local_addr, inner })
    }

    /// Encode `datagram` and send it as a single UDP datagram to `dest`.
    pub async fn send_to(&self, datagram: &Datagram, dest: SocketAddr) -> Result<(), ChannelError> {
        self.inner.send_to(&datagram.encode(), dest).await?;
        Ok(())
    }

    /// Receive the next datagram and decode it.
    ///
    /// Returns `(datagram, sender_address)`. Datagrams that fail to decode
    /// are returned as [`ChannelError::Malformed`] — the caller decides
    /// whether to ignore them.
    pub async fn recv_from(&self) -> Result<(Datagram, SocketAddr), ChannelError> {
        let mut buf = [0u8; MAX_DATAGRAM];
        let (n, addr) = self.inner.recv_from(&mut buf).await?;
        let datagram = Datagram::decode(&buf[..n])?;
        Ok((datagram, addr))
    }
}
