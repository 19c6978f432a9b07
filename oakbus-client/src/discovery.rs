//! Station discovery across serial ports.
//!
//! A scan probes candidate stations with a small register read and keeps
//! the first one that answers. Every engine failure counts as "this
//! candidate did not respond"; the scan itself never retries a candidate.

use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

use crate::client::{RegisterClient, RtuClient};
use crate::config::SerialConfig;
use crate::error::TransportError;
use crate::transport::{SerialTransport, Transport};

/// Default number of station addresses probed on each port.
pub const DEFAULT_STATION_LIMIT: u8 = 20;

/// A scan plan: which stations to probe, and with what read.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Station addresses to probe, in order.
    pub stations: RangeInclusive<u8>,
    /// Input register address used as the probe.
    pub probe_address: u16,
    /// Quantity requested by the probe.
    pub probe_quantity: u16,
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            stations: 1..=DEFAULT_STATION_LIMIT,
            probe_address: 1,
            probe_quantity: 1,
        }
    }
}

impl Discovery {
    /// Probe the stations in order on an already-open channel.
    ///
    /// Returns the first answering station, leaving it selected on the
    /// client. Stations on one channel are always probed one at a time;
    /// concurrent probes would interleave octets on the shared wire.
    pub async fn probe<T: Transport>(&self, client: &mut RtuClient<T>) -> Option<u8> {
        for station in self.stations.clone() {
            client.set_station(station);
            match client
                .read_input_registers(self.probe_address, self.probe_quantity)
                .await
            {
                Ok(_) => {
                    info!("station {:02} answered the probe", station);
                    return Some(station);
                }
                Err(e) => {
                    debug!("station {:02} did not respond: {}", station, e);
                }
            }
        }
        None
    }

    /// Open one port and probe it; the first responder wins.
    ///
    /// Failing to open the port is reported to the caller; a port that
    /// opens but where nobody answers yields `Ok(None)` with the port
    /// released again.
    pub async fn scan_port(
        &self,
        serial: &SerialConfig,
    ) -> Result<Option<RtuClient<SerialTransport>>, TransportError> {
        let mut client = RtuClient::new(SerialTransport::open(serial)?);

        if self.probe(&mut client).await.is_some() {
            return Ok(Some(client));
        }

        let _ = client.close().await;
        Ok(None)
    }

    /// Sweep candidate ports sequentially, stopping at the first port with
    /// a responding station.
    ///
    /// The `port` field of `line` is replaced by each candidate; the other
    /// line settings apply to every port. Ports are independent channels,
    /// so a caller wanting parallelism can spawn one
    /// [`scan_port`](Self::scan_port) task per port instead; stations on a
    /// single port must still be probed sequentially.
    pub async fn scan(
        &self,
        ports: &[String],
        line: &SerialConfig,
    ) -> Option<RtuClient<SerialTransport>> {
        for port in ports {
            let serial = SerialConfig {
                port: port.clone(),
                ..line.clone()
            };
            match self.scan_port(&serial).await {
                Ok(Some(client)) => {
                    info!("station {:02}@{} connected", client.station(), port);
                    return Some(client);
                }
                Ok(None) => debug!("no station answered on {}", port),
                Err(e) => warn!("could not open {}: {}", port, e),
            }
        }
        None
    }
}
