//! Error types for the transport and client layers.

use oakbus_protocol::ProtocolError;
use thiserror::Error;

/// Result type alias using [`ClientError`].
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures of the physical half-duplex exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Nothing arrived before the computed turnaround deadline.
    #[error("no response from station (gateway target device failed to respond)")]
    NoResponse,

    /// Octets arrived that are neither an echoed function code nor an
    /// exception frame.
    #[error("unexpected data on the wire")]
    UnexpectedData,

    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel was already released.
    #[error("port already closed")]
    AlreadyClosed,
}

/// Any failure an engine operation can return.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}
