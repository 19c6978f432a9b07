//! Oakbus RTU Client
//!
//! Async Modbus RTU master engine over a serial line:
//!
//! - [`client`] - The engine (`RtuClient`) and its capability traits
//! - [`transport`] - Half-duplex serial transport
//! - [`discovery`] - Station scanning across ports
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types
//!
//! Wire-level framing, checksums, and timing live in `oakbus-protocol`.

pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod transport;

// Re-export commonly used types at the crate root
pub use client::{BulkRegisterClient, CoilClient, RegisterClient, RtuClient};
pub use config::{ClientConfig, ConfigError, LoggingConfig, SerialConfig};
pub use discovery::{DEFAULT_STATION_LIMIT, Discovery};
pub use error::{ClientError, Result, TransportError};
pub use transport::{SerialTransport, Transport};

/// Initialize tracing with the given configuration.
///
/// The `RUST_LOG` environment variable, when set, overrides the configured
/// level.
pub fn init_tracing(config: &LoggingConfig) -> std::result::Result<(), ConfigError> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    Ok(())
}
