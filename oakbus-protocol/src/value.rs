//! Register value conversion.
//!
//! The engine hands register payloads back verbatim; interpreting them as
//! numbers or engineering readings happens here, at the caller's request.

use crate::error::{ProtocolError, Result};

/// Divisor for readings transmitted in tenths, the common convention of
/// temperature and humidity stations.
pub const TENTHS: f64 = 10.0;

/// Interpret big-endian octets as an unsigned integer.
///
/// Accepts 1, 2, or 4 octets; 3 octets are zero-extended on the high side
/// before interpretation. Any other length is rejected.
pub fn to_unsigned(octets: &[u8]) -> Result<u32> {
    match octets {
        [a] => Ok(u32::from(*a)),
        [a, b] => Ok(u32::from(u16::from_be_bytes([*a, *b]))),
        [a, b, c] => Ok(u32::from_be_bytes([0, *a, *b, *c])),
        [a, b, c, d] => Ok(u32::from_be_bytes([*a, *b, *c, *d])),
        _ => Err(ProtocolError::InvalidLength(octets.len())),
    }
}

/// Decode one scaled reading: the unsigned value divided by `divisor`.
pub fn to_scaled(octets: &[u8], divisor: f64) -> Result<f64> {
    Ok(f64::from(to_unsigned(octets)?) / divisor)
}

/// Decode consecutive 16-bit registers into scaled readings.
pub fn to_scaled_sequence(octets: &[u8], divisor: f64) -> Result<Vec<f64>> {
    if octets.len() % 2 != 0 {
        return Err(ProtocolError::InvalidLength(octets.len()));
    }
    octets
        .chunks(2)
        .map(|register| to_scaled(register, divisor))
        .collect()
}
