//! Wire-format definitions for protocol datagrams.
//!
//! Every UDP datagram exchanged between the two actors is a [`Datagram`].
//! This module is responsible for:
//! - Defining the on-wire text layout.
//! - Serialising a [`Datagram`] into a byte buffer ready for transmission.
//! - Deserialising a raw byte slice back into a [`Datagram`], returning
//!   errors for malformed or unrecognised input.
//!
//! No I/O happens here — this is pure data transformation.
//!
//! # Wire format
//!
//! Three ASCII payloads, one per datagram kind:
//!
//! ```text
//! FRAME:<seq>   data frame; <seq> is a non-negative base-10 integer
//! ACK:<n>       cumulative ACK: every frame with seq < n arrived in order
//! EXIT          termination signal, sender → receiver, ends the session
//! ```
//!
//! Sequence numbers start at 0 and only grow within a session, so they are
//! carried as `u64` and never wrap.

use std::str;

/// One protocol datagram, ready to encode onto the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datagram {
    /// A numbered data frame. The payload itself is opaque to the protocol
    /// and carried out-of-band in this simulation, so only the sequence
    /// number travels on the wire.
    Frame { seq: u64 },
    /// Cumulative acknowledgment: all frames with `seq < ack` were received
    /// in order.
    Ack { ack: u64 },
    /// Best-effort termination signal.
    Exit,
}

impl Datagram {
    /// Serialise this datagram into a newly allocated byte vector.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Datagram::Frame { seq } => format!("FRAME:{seq}").into_bytes(),
            Datagram::Ack { ack } => format!("ACK:{ack}").into_bytes(),
            Datagram::Exit => b"EXIT".to_vec(),
        }
    }

    /// Parse a [`Datagram`] from a raw byte slice.
    ///
    /// Returns [`Err`] if:
    /// - `buf` is not valid UTF-8,
    /// - the payload does not start with a recognised keyword, or
    /// - the number after the `:` is missing or not a base-10 `u64`.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let text = str::from_utf8(buf).map_err(|_| DecodeError::NotText)?;

        if text == "EXIT" {
            return Ok(Datagram::Exit);
        }
        if let Some(num) = text.strip_prefix("FRAME:") {
            let seq = num.parse().map_err(|_| DecodeError::BadNumber)?;
            return Ok(Datagram::Frame { seq });
        }
        if let Some(num) = text.strip_prefix("ACK:") {
            let ack = num.parse().map_err(|_| DecodeError::BadNumber)?;
            return Ok(Datagram::Ack { ack });
        }
        Err(DecodeError::UnknownKind)
    }
}

impl std::fmt::Display for Datagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Datagram::Frame { seq } => write!(f, "FRAME:{seq}"),
            Datagram::Ack { ack } => write!(f, "ACK:{ack}"),
            Datagram::Exit => write!(f, "EXIT"),
        }
    }
}

/// Errors that can arise when parsing a raw datagram.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload is not valid UTF-8 text.
    NotText,
    /// Payload does not start with `FRAME:`, `ACK:`, or `EXIT`.
    UnknownKind,
    /// The part after the `:` is not a non-negative base-10 integer.
    BadNumber,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::NotText => write!(f, "datagram is not valid UTF-8"),
            DecodeError::UnknownKind => write!(f, "unrecognised datagram keyword"),
            DecodeError::BadNumber => write!(f, "sequence field is not a base-10 integer"),
        }
    }
}

impl std::error::Error for DecodeError {}
