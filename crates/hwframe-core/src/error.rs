//! Error taxonomy for device access.
//!
//! The variants separate "no hardware present" ([`Error::NoDevice`],
//! [`Error::NotFound`], [`Error::TransportInit`]) from "protocol corruption"
//! ([`Error::Framing`]) and from "transient connect failure"
//! ([`Error::Connect`]), the only kind the acquirer retries.

use std::io;

use hwframe_proto::ProtocolError;
use thiserror::Error;

/// Result alias for device operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Underlying failure reported by a bus driver.
pub type BusError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from discovery, acquisition and exchanges.
#[derive(Debug, Error)]
pub enum Error {
    /// A physical bus could not be initialized.
    #[error("{bus} initialization failed: {source}")]
    TransportInit {
        /// Bus name.
        bus: &'static str,
        /// Failure reported by the bus driver.
        #[source]
        source: BusError,
    },

    /// A bus failed while listing devices.
    #[error("{bus} enumeration failed: {source}")]
    Enumerate {
        /// Bus name.
        bus: &'static str,
        /// Failure reported by the bus driver.
        #[source]
        source: BusError,
    },

    /// Nothing to talk to: no device enumerated, or no usable device class.
    #[error("no device connected")]
    NoDevice,

    /// No registered bus claims the path.
    #[error("device not found: {path}")]
    NotFound {
        /// Requested path.
        path: String,
    },

    /// Opening a device failed.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        /// Device path or endpoint address.
        path: String,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// Writing a report failed. Remaining reports were not sent.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    /// Reading the reply failed.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    /// The reply was not a well-formed message.
    #[error("framing error: {0}")]
    Framing(#[source] ProtocolError),
}

impl Error {
    /// Whether retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }
}

impl From<ProtocolError> for Error {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Io(e) => Self::Read(e),
            other => Self::Framing(other),
        }
    }
}
