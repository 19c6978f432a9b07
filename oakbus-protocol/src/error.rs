//! Error types for the protocol layer.

use thiserror::Error;

use crate::codes::ExceptionCode;

/// Result type alias using [`ProtocolError`].
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised by the frame codec, value codec, and response validation.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The encoded frame would exceed the RTU maximum.
    #[error("frame length {length} exceeds the RTU maximum of 256 octets")]
    FrameTooLarge { length: usize },

    /// The trailing checksum pair disagrees with the recomputed value.
    #[error("response crc {received:#06x} does not match computed {expected:#06x}")]
    ChecksumMismatch { expected: u16, received: u16 },

    /// The response is shorter than the minimal frame.
    #[error("response length {length} is below the RTU minimum of 4 octets")]
    ResponseTooShort { length: usize },

    /// The response echoes a different station than the request addressed.
    #[error("response station {received} does not match request station {expected}")]
    StationMismatch { expected: u8, received: u8 },

    /// The station answered with an exception frame.
    #[error("station exception '{}' ({code}) for function {function:#04x}", .code.code())]
    Exception { function: u8, code: ExceptionCode },

    /// The response payload length disagrees with what the operation expects.
    #[error("response payload length {actual} does not match expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The response carried no payload at all.
    #[error("empty response payload")]
    EmptyResponse,

    /// A write response echoed a different register address.
    #[error("echoed register address {received} does not match requested {expected}")]
    EchoMismatch { expected: u16, received: u16 },

    /// A write response echoed a different register value.
    #[error("echoed register value {received} does not match written {expected}")]
    ValueMismatch { expected: u16, received: u16 },

    /// The octet sequence cannot be interpreted as an unsigned value.
    #[error("cannot convert {0} octets to an unsigned value")]
    InvalidLength(usize),
}
