//! Transports available on the host.

use std::net::SocketAddr;

use hwframe_core::{Bus, Device, Error, Platform, Result};

use crate::emulator::EmulatorDevice;

/// The host's real transports.
///
/// Built without the `usb` feature, both physical buses fail to initialize
/// and only the emulator is reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    fn dial_emulator(&self, addr: SocketAddr) -> Result<Box<dyn Device>> {
        let device = EmulatorDevice::dial(addr)
            .map_err(|source| Error::Connect { path: addr.to_string(), source })?;
        Ok(Box::new(device))
    }

    #[cfg(feature = "usb")]
    fn webusb(&self) -> Result<Box<dyn Bus>> {
        Ok(Box::new(crate::webusb::WebUsbBus::new()?))
    }

    #[cfg(not(feature = "usb"))]
    fn webusb(&self) -> Result<Box<dyn Bus>> {
        Err(unsupported("webusb"))
    }

    #[cfg(feature = "usb")]
    fn hid(&self) -> Result<Box<dyn Bus>> {
        Ok(Box::new(crate::hid::HidBus::new()?))
    }

    #[cfg(not(feature = "usb"))]
    fn hid(&self) -> Result<Box<dyn Bus>> {
        Err(unsupported("hidapi"))
    }
}

#[cfg(not(feature = "usb"))]
fn unsupported(bus: &'static str) -> Error {
    Error::TransportInit { bus, source: "built without the `usb` feature".into() }
}
