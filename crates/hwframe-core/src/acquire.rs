//! Turning a device class into one open device.
//!
//! # Policy
//!
//! - **Emulator**: dial the configured UDP endpoint once. No retry.
//! - **USB**: initialize WebUSB, then HID. Either failure aborts. Enumerate
//!   both unfiltered and connect to the first entry, retrying a bounded number
//!   of times with a fixed delay.
//! - **Invalid**: fail with [`Error::NoDevice`] without touching any bus.
//!
//! Bus initialization happens on every acquisition; nothing is cached between
//! calls.

use std::{
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    time::Duration,
};

use tracing::{debug, info, warn};

use crate::{
    bus::{Bus, BusSet},
    device::{Device, DeviceClass},
    env::{Environment, SystemEnv},
    error::{Error, Result},
};

/// Provides the concrete transports an [`Acquirer`] draws from.
pub trait Platform {
    /// Open a datagram stream to the emulator at `addr`.
    fn dial_emulator(&self, addr: SocketAddr) -> Result<Box<dyn Device>>;

    /// Initialize the WebUSB bus.
    fn webusb(&self) -> Result<Box<dyn Bus>>;

    /// Initialize the HID bus.
    fn hid(&self) -> Result<Box<dyn Bus>>;
}

/// Acquisition settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireConfig {
    /// Emulator endpoint.
    pub emulator_addr: SocketAddr,
    /// Total connect attempts for USB devices. Zero is treated as one.
    pub connect_attempts: u32,
    /// Delay between USB connect attempts.
    pub retry_delay: Duration,
}

impl AcquireConfig {
    /// Where the emulator listens by default.
    pub const DEFAULT_EMULATOR_ADDR: SocketAddr =
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 21324));
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            emulator_addr: Self::DEFAULT_EMULATOR_ADDR,
            connect_attempts: 3,
            retry_delay: Duration::from_millis(100),
        }
    }
}

/// Obtains open devices according to [`AcquireConfig`].
pub struct Acquirer<P, E = SystemEnv> {
    platform: P,
    env: E,
    config: AcquireConfig,
}

impl<P: Platform> Acquirer<P> {
    /// Acquirer with the default configuration and the real clock.
    pub fn new(platform: P) -> Self {
        Self::with_env(platform, SystemEnv, AcquireConfig::default())
    }
}

impl<P: Platform, E: Environment> Acquirer<P, E> {
    /// Acquirer with an explicit environment and configuration.
    pub fn with_env(platform: P, env: E, config: AcquireConfig) -> Self {
        Self { platform, env, config }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AcquireConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &AcquireConfig {
        &self.config
    }

    /// Transport provider.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Open one device of the given class.
    ///
    /// The caller owns the returned device for one exchange and must close or
    /// drop it before starting another.
    pub fn acquire(&self, class: DeviceClass) -> Result<Box<dyn Device>> {
        match class {
            DeviceClass::Emulator => self.emulator(),
            DeviceClass::Usb => self.usb(),
            DeviceClass::Invalid => {
                debug!(%class, "no transport for device class");
                Err(Error::NoDevice)
            },
        }
    }

    /// Initialize the physical buses, WebUSB first.
    ///
    /// Stops at the first bus that fails to initialize.
    pub fn usb_buses(&self) -> Result<BusSet> {
        let webusb = self.platform.webusb().inspect_err(|err| warn!(error = %err, "webusb"))?;
        let hid = self.platform.hid().inspect_err(|err| warn!(error = %err, "hidapi"))?;
        Ok(BusSet::new(vec![webusb, hid]))
    }

    fn emulator(&self) -> Result<Box<dyn Device>> {
        let addr = self.config.emulator_addr;
        debug!(%addr, "dialing emulator");
        self.platform.dial_emulator(addr)
    }

    fn usb(&self) -> Result<Box<dyn Device>> {
        let mut buses = self.usb_buses()?;

        let infos = buses.enumerate(0, 0)?;
        let Some(first) = infos.first() else {
            debug!("no usb device enumerated");
            return Err(Error::NoDevice);
        };
        if infos.len() > 1 {
            info!(count = infos.len(), path = %first.path, "several devices found, using the first");
        }

        self.connect_with_retry(&mut buses, &first.path)
    }

    fn connect_with_retry(&self, buses: &mut BusSet, path: &str) -> Result<Box<dyn Device>> {
        let attempts = self.config.connect_attempts.max(1);
        let started = self.env.now();
        let mut attempt = 1;

        loop {
            match buses.connect(path) {
                Ok(device) => {
                    let elapsed = self.env.now().duration_since(started);
                    debug!(path, attempt, ?elapsed, "connected");
                    return Ok(device);
                },
                Err(err) if attempt < attempts => {
                    warn!(path, attempt, error = %err, "connect failed, retrying");
                    self.env.sleep(self.config.retry_delay);
                    attempt += 1;
                },
                Err(err) => {
                    warn!(path, attempt, error = %err, "connect failed, giving up");
                    return Err(err);
                },
            }
        }
    }
}
