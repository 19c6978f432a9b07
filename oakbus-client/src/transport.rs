//! Half-duplex serial transport.
//!
//! One exchange is: write the whole request frame, wait up to the computed
//! turnaround delay for the reply, read once, classify what came back. The
//! read timeout enforces the wait; there is no separate sleep and no retry.

use oakbus_protocol::frame::{EXCEPTION_FRAME_LEN, MAX_FRAME_LEN};
use oakbus_protocol::{codes, timing};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::SerialStream;
use tracing::trace;

use crate::config::SerialConfig;
use crate::error::TransportError;

/// The physical exchange seam.
///
/// Implementations own their channel exclusively; `&mut self` keeps the
/// protocol strictly half-duplex with one outstanding request.
pub trait Transport {
    /// Write one request frame and return the octets read back.
    async fn send(&mut self, request: &[u8]) -> Result<Vec<u8>, TransportError>;

    /// Release the underlying channel. A second call reports
    /// [`TransportError::AlreadyClosed`].
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// RTU transport over a serial line.
pub struct SerialTransport {
    port: Option<SerialStream>,
    baud_rate: u32,
}

impl SerialTransport {
    /// Open the serial port described by `config`.
    pub fn open(config: &SerialConfig) -> Result<Self, TransportError> {
        let parity = match config.parity.to_lowercase().as_str() {
            "even" => tokio_serial::Parity::Even,
            "odd" => tokio_serial::Parity::Odd,
            _ => tokio_serial::Parity::None,
        };

        let stop_bits = match config.stop_bits {
            2 => tokio_serial::StopBits::Two,
            _ => tokio_serial::StopBits::One,
        };

        let data_bits = match config.data_bits {
            5 => tokio_serial::DataBits::Five,
            6 => tokio_serial::DataBits::Six,
            7 => tokio_serial::DataBits::Seven,
            _ => tokio_serial::DataBits::Eight,
        };

        let builder = tokio_serial::new(&config.port, config.baud_rate)
            .parity(parity)
            .stop_bits(stop_bits)
            .data_bits(data_bits);

        let port = SerialStream::open(&builder)?;

        Ok(Self {
            port: Some(port),
            baud_rate: config.baud_rate,
        })
    }

    /// Baud rate the channel was opened with.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

impl Transport for SerialTransport {
    async fn send(&mut self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
        let port = self.port.as_mut().ok_or(TransportError::AlreadyClosed)?;

        port.write_all(request).await?;
        port.flush().await?;

        let wait = timing::turnaround(self.baud_rate, request);
        trace!("TX {} octets, waiting up to {:?}", request.len(), wait);

        let mut buffer = [0u8; MAX_FRAME_LEN];
        let read = match timeout(wait, port.read(&mut buffer)).await {
            Ok(Ok(read)) => read,
            Ok(Err(e)) => return Err(e.into()),
            // Deadline passed with nothing readable.
            Err(_) => 0,
        };
        trace!("RX {} octets", read);

        classify(request, &buffer[..read])
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self.port.take() {
            Some(port) => {
                drop(port);
                Ok(())
            }
            None => Err(TransportError::AlreadyClosed),
        }
    }
}

/// Classify the octets read back for `request`.
///
/// An echoed function code is a response; the exception bit selects the
/// minimal five-octet exception frame; anything else is noise on the wire.
fn classify(request: &[u8], response: &[u8]) -> Result<Vec<u8>, TransportError> {
    if response.is_empty() {
        return Err(TransportError::NoResponse);
    }
    let function = request[1];
    match response.get(1) {
        Some(&echoed) if echoed == function => Ok(response.to_vec()),
        Some(&echoed) if echoed == function | codes::EXCEPTION_BIT => {
            let cut = response.len().min(EXCEPTION_FRAME_LEN);
            Ok(response[..cut].to_vec())
        }
        _ => Err(TransportError::UnexpectedData),
    }
}
