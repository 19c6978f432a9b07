//! RTU frame codec.
//!
//! An application data unit (ADU) wraps a protocol data unit (PDU) as
//! `[station][function][data...][crc lo][crc hi]`. The checksum is stored
//! low octet first; that ordering is fixed by the wire protocol.

use crate::crc;
use crate::error::{ProtocolError, Result};

/// Minimum ADU length: station + function + checksum.
pub const MIN_FRAME_LEN: usize = 4;
/// Maximum RTU ADU length.
pub const MAX_FRAME_LEN: usize = 256;
/// Length of an exception response frame.
pub const EXCEPTION_FRAME_LEN: usize = 5;

/// A protocol data unit: function code plus payload, independent of the
/// transport framing.
///
/// Request PDUs are built once and never mutated; decoding a response
/// always produces a fresh value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    pub function: u8,
    pub data: Vec<u8>,
}

impl Pdu {
    /// Create a PDU from a function code and payload.
    pub fn new(function: u8, data: Vec<u8>) -> Self {
        Self { function, data }
    }
}

/// Serialize 16-bit words into big-endian octets.
pub fn data_block(words: &[u16]) -> Vec<u8> {
    let mut data = Vec::with_capacity(words.len() * 2);
    for word in words {
        data.extend_from_slice(&word.to_be_bytes());
    }
    data
}

/// Build the wire frame for a PDU addressed to `station`.
pub fn encode(station: u8, pdu: &Pdu) -> Result<Vec<u8>> {
    let length = pdu.data.len() + MIN_FRAME_LEN;
    if length > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge { length });
    }
    let mut adu = Vec::with_capacity(length);
    adu.push(station);
    adu.push(pdu.function);
    adu.extend_from_slice(&pdu.data);

    let checksum = crc::checksum(&adu);
    adu.push(checksum as u8);
    adu.push((checksum >> 8) as u8);
    Ok(adu)
}

/// Extract the PDU from a wire frame, verifying its checksum.
pub fn decode(adu: &[u8]) -> Result<Pdu> {
    let length = adu.len();
    if length < MIN_FRAME_LEN {
        return Err(ProtocolError::ResponseTooShort { length });
    }
    let expected = crc::checksum(&adu[..length - 2]);
    let received = u16::from(adu[length - 1]) << 8 | u16::from(adu[length - 2]);
    if received != expected {
        return Err(ProtocolError::ChecksumMismatch { expected, received });
    }
    Ok(Pdu {
        function: adu[1],
        data: adu[2..length - 2].to_vec(),
    })
}

/// Check that a response frame plausibly answers a request: long enough,
/// and echoing the station the request addressed.
///
/// This check is advisory; function-code agreement is validated separately
/// by the client engine.
pub fn verify(request: &[u8], response: &[u8]) -> Result<()> {
    let length = response.len();
    if length < MIN_FRAME_LEN {
        return Err(ProtocolError::ResponseTooShort { length });
    }
    if response[0] != request[0] {
        return Err(ProtocolError::StationMismatch {
            expected: request[0],
            received: response[0],
        });
    }
    Ok(())
}
