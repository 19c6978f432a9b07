//! The RTU client engine.
//!
//! [`RtuClient`] drives one serial channel: it frames each request for the
//! currently selected station, performs the half-duplex exchange through a
//! [`Transport`], and validates the response against the request before any
//! payload reaches the caller.

use oakbus_protocol::frame::{self, Pdu};
use oakbus_protocol::{ExceptionCode, ProtocolError, codes, data_block};
use tracing::debug;

use crate::error::Result;
use crate::transport::Transport;

/// Register-oriented master operations.
///
/// All methods return the raw register octets from the wire; unit
/// conversion belongs to the value codec in `oakbus-protocol`, applied by
/// the caller.
pub trait RegisterClient {
    /// Read `quantity` holding registers starting at `address`.
    async fn read_holding_registers(&mut self, address: u16, quantity: u16) -> Result<Vec<u8>>;

    /// Read `quantity` input registers starting at `address`.
    async fn read_input_registers(&mut self, address: u16, quantity: u16) -> Result<Vec<u8>>;

    /// Write `value` to the holding register at `address` and return the
    /// echoed value octets.
    async fn write_single_register(&mut self, address: u16, value: u16) -> Result<Vec<u8>>;
}

/// Coil-oriented master operations.
///
/// This surface is declared but not provided by [`RtuClient`]; a caller
/// needing coils must bring an implementation, and the gap is visible at
/// compile time instead of as a runtime abort.
///
/// Contracts mirror the register operations: read responses declare a byte
/// count in their first payload octet which must equal the remaining
/// payload length; write responses echo address and value, both validated.
pub trait CoilClient {
    /// Read `quantity` coils starting at `address`; returns packed bits,
    /// one octet per eight coils, low bit first.
    async fn read_coils(&mut self, address: u16, quantity: u16) -> Result<Vec<u8>>;

    /// Read `quantity` discrete inputs starting at `address`; same packing
    /// as [`read_coils`](CoilClient::read_coils).
    async fn read_discrete_inputs(&mut self, address: u16, quantity: u16) -> Result<Vec<u8>>;

    /// Force the coil at `address` on (0xFF00) or off (0x0000); the echoed
    /// output value must match what was sent.
    async fn write_single_coil(&mut self, address: u16, value: u16) -> Result<Vec<u8>>;

    /// Force `quantity` coils starting at `address` from packed `values`;
    /// the response echoes address and quantity, both validated.
    async fn write_multiple_coils(
        &mut self,
        address: u16,
        quantity: u16,
        values: &[u8],
    ) -> Result<Vec<u8>>;
}

/// Bulk register operations.
///
/// Declared but not provided by [`RtuClient`], like [`CoilClient`].
pub trait BulkRegisterClient {
    /// Write `quantity` registers starting at `address` from big-endian
    /// `values`; the response echoes address and quantity, both validated.
    async fn write_multiple_registers(
        &mut self,
        address: u16,
        quantity: u16,
        values: &[u8],
    ) -> Result<Vec<u8>>;

    /// Combined write-then-read in one transaction; returns the octets of
    /// the read window with the declared byte count validated.
    async fn read_write_multiple_registers(
        &mut self,
        read_address: u16,
        read_quantity: u16,
        write_address: u16,
        write_quantity: u16,
        values: &[u8],
    ) -> Result<Vec<u8>>;
}

/// Modbus RTU master bound to one serial channel.
///
/// The engine is strictly synchronous per instance: every exchanging method
/// takes `&mut self`, so one request is outstanding at a time and the
/// channel is never shared mid-exchange.
pub struct RtuClient<T> {
    transport: T,
    station: u8,
}

impl<T: Transport> RtuClient<T> {
    /// Wrap a transport with no station selected yet (station 0).
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            station: 0,
        }
    }

    /// Wrap a transport talking to `station`.
    pub fn with_station(transport: T, station: u8) -> Self {
        Self { transport, station }
    }

    /// The currently selected station address.
    pub fn station(&self) -> u8 {
        self.station
    }

    /// Select the station addressed by subsequent exchanges. No I/O.
    pub fn set_station(&mut self, station: u8) {
        self.station = station;
    }

    /// Release the underlying channel. A second call reports
    /// `AlreadyClosed`; it never aborts.
    pub async fn close(&mut self) -> Result<()> {
        self.transport.close().await?;
        Ok(())
    }

    /// One request/response cycle: encode for the current station, send,
    /// verify the station echo, decode, and classify exceptions.
    async fn exchange(&mut self, request: &Pdu) -> Result<Pdu> {
        let adu = frame::encode(self.station, request)?;
        let response_adu = self.transport.send(&adu).await?;

        frame::verify(&adu, &response_adu)?;
        let response = frame::decode(&response_adu)?;

        if response.function != request.function {
            let code = response.data.first().copied().unwrap_or(0);
            return Err(ProtocolError::Exception {
                function: response.function,
                code: ExceptionCode::from_code(code),
            }
            .into());
        }
        if response.data.is_empty() {
            return Err(ProtocolError::EmptyResponse.into());
        }

        debug!(
            "station {:02}: function {:#04x} answered {} payload octets",
            self.station,
            response.function,
            response.data.len()
        );
        Ok(response)
    }

    /// Shared body of the register reads: the first payload octet declares
    /// the byte count and must match the rest of the payload.
    async fn read_registers(&mut self, function: u8, address: u16, quantity: u16) -> Result<Vec<u8>> {
        let request = Pdu::new(function, data_block(&[address, quantity]));
        let response = self.exchange(&request).await?;

        let declared = usize::from(response.data[0]);
        let actual = response.data.len() - 1;
        if declared != actual {
            return Err(ProtocolError::LengthMismatch {
                expected: declared,
                actual,
            }
            .into());
        }
        Ok(response.data[1..].to_vec())
    }
}

impl<T: Transport> RegisterClient for RtuClient<T> {
    async fn read_holding_registers(&mut self, address: u16, quantity: u16) -> Result<Vec<u8>> {
        self.read_registers(codes::READ_HOLDING_REGISTERS, address, quantity)
            .await
    }

    async fn read_input_registers(&mut self, address: u16, quantity: u16) -> Result<Vec<u8>> {
        self.read_registers(codes::READ_INPUT_REGISTERS, address, quantity)
            .await
    }

    async fn write_single_register(&mut self, address: u16, value: u16) -> Result<Vec<u8>> {
        let request = Pdu::new(codes::WRITE_SINGLE_REGISTER, data_block(&[address, value]));
        let response = self.exchange(&request).await?;

        // The response to a single write is always the four request octets.
        if response.data.len() != 4 {
            return Err(ProtocolError::LengthMismatch {
                expected: 4,
                actual: response.data.len(),
            }
            .into());
        }

        let echoed_address = u16::from_be_bytes([response.data[0], response.data[1]]);
        if echoed_address != address {
            return Err(ProtocolError::EchoMismatch {
                expected: address,
                received: echoed_address,
            }
            .into());
        }

        let echoed_value = u16::from_be_bytes([response.data[2], response.data[3]]);
        if echoed_value != value {
            return Err(ProtocolError::ValueMismatch {
                expected: value,
                received: echoed_value,
            }
            .into());
        }

        Ok(response.data[2..].to_vec())
    }
}
