//! Network error types for framing, dispatch and the connection itself.

use std::io;
use thiserror::Error;

use super::messages::MessageKind;

/// A message that couldn't be understood. The message is dropped and the
/// connection stays up.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Failed to encode a message
    #[error("failed to encode message: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// Failed to decode a message
    #[error("failed to decode message: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// Message size exceeded maximum allowed
    #[error("message size {actual} exceeds maximum {max}")]
    MessageTooLarge { actual: usize, max: usize },

    /// Payload doesn't fit the message type
    #[error("{kind} message can't carry {payload}")]
    UnexpectedPayload {
        kind: MessageKind,
        payload: &'static str,
    },

    /// Player list with the wrong number of seats
    #[error("player list names {0} seats")]
    WrongSeatCount(usize),
}

/// The connection is unusable. The client drops to disconnected and waits
/// for an explicit reconnect.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("already connected")]
    AlreadyConnected,
    #[error("not connected")]
    NotConnected,
    #[error("connection lost: {0}")]
    Io(#[from] io::Error),
}

/// A message referring to a seat this session doesn't know about.
#[derive(Debug, Eq, Error, PartialEq)]
pub enum SessionError {
    #[error("unknown player slot {0}")]
    UnknownSeat(i32),
}

#[derive(Debug, Error)]
pub enum NetError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<io::Error> for NetError {
    fn from(error: io::Error) -> Self {
        Self::Connection(ConnectionError::Io(error))
    }
}

/// Result type for network operations
pub type Result<T> = std::result::Result<T, NetError>;
