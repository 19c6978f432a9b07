//! Oakbus Protocol Library
//!
//! Wire-level building blocks for a Modbus RTU master:
//!
//! - [`crc`] - CRC-16/MODBUS checksum
//! - [`codes`] - Function and exception code constants
//! - [`frame`] - PDU/ADU frame codec
//! - [`timing`] - Response-length prediction and turnaround delay
//! - [`value`] - Register value conversion
//! - [`error`] - Error types
//!
//! Everything in this crate is pure: no I/O, no clocks, no global state.
//! The serial side lives in `oakbus-client`.

pub mod codes;
pub mod crc;
pub mod error;
pub mod frame;
pub mod timing;
pub mod value;

// Re-export commonly used types at the crate root
pub use codes::ExceptionCode;
pub use error::{ProtocolError, Result};
pub use frame::{EXCEPTION_FRAME_LEN, MAX_FRAME_LEN, MIN_FRAME_LEN, Pdu, data_block};
pub use timing::{predicted_response_length, response_delay, turnaround};
pub use value::{TENTHS, to_scaled, to_scaled_sequence, to_unsigned};
