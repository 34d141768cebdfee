//! WebUSB transport via libusb.
//!
//! Wallets exposing a vendor-specific interface 0 are driven with interrupt
//! transfers on endpoints `0x81` (in) and `0x01` (out). Transfers use no
//! timeout, so a silent device blocks the reader.

use std::{
    io::{self, Read, Write},
    time::Duration,
};

use hwframe_core::{Bus, Device, DeviceInfo, Error, Result, device::wallet_info};
use rusb::{Context, DeviceHandle, UsbContext};
use tracing::{debug, trace};

/// Path prefix claimed by [`WebUsbBus`].
pub const WEBUSB_PREFIX: &str = "webusb:";

const INTERFACE: u8 = 0;
const ENDPOINT_IN: u8 = 0x81;
const ENDPOINT_OUT: u8 = 0x01;
const VENDOR_SPECIFIC_CLASS: u8 = 0xFF;
const NO_TIMEOUT: Duration = Duration::ZERO;

/// Wallets reachable through libusb.
pub struct WebUsbBus {
    context: Context,
}

impl WebUsbBus {
    /// Initialize a libusb context.
    pub fn new() -> Result<Self> {
        let context = Context::new()
            .map_err(|err| Error::TransportInit { bus: "webusb", source: err.into() })?;
        Ok(Self { context })
    }
}

fn path_of(device: &rusb::Device<Context>) -> String {
    format!("{WEBUSB_PREFIX}{:03}:{:03}", device.bus_number(), device.address())
}

fn has_vendor_interface(device: &rusb::Device<Context>) -> bool {
    let Ok(config) = device.active_config_descriptor() else {
        return false;
    };
    for iface in config.interfaces() {
        for desc in iface.descriptors() {
            if desc.interface_number() == INTERFACE && desc.class_code() == VENDOR_SPECIFIC_CLASS {
                return true;
            }
        }
    }
    false
}

impl Bus for WebUsbBus {
    fn name(&self) -> &'static str {
        "webusb"
    }

    fn enumerate(&mut self, vendor_id: u16, product_id: u16) -> Result<Vec<DeviceInfo>> {
        let devices = self
            .context
            .devices()
            .map_err(|err| Error::Enumerate { bus: "webusb", source: err.into() })?;

        let mut infos = Vec::new();
        for device in devices.iter() {
            let Ok(descriptor) = device.device_descriptor() else {
                continue;
            };
            let (vid, pid) = (descriptor.vendor_id(), descriptor.product_id());
            let Some(info) = wallet_info(path_of(&device), vid, pid, vendor_id, product_id) else {
                continue;
            };
            if has_vendor_interface(&device) {
                trace!(path = %info.path, "webusb wallet");
                infos.push(info);
            }
        }
        Ok(infos)
    }

    fn has(&self, path: &str) -> bool {
        path.starts_with(WEBUSB_PREFIX)
    }

    fn connect(&mut self, path: &str) -> Result<Box<dyn Device>> {
        let connect_err = |err: rusb::Error| Error::Connect { path: path.to_string(), source: usb_io(err) };

        let devices = self.context.devices().map_err(connect_err)?;
        let Some(device) = devices.iter().find(|d| path_of(d) == path) else {
            return Err(Error::NotFound { path: path.to_string() });
        };

        let mut handle = device.open().map_err(connect_err)?;
        handle.claim_interface(INTERFACE).map_err(connect_err)?;

        debug!(path, "webusb interface claimed");
        Ok(Box::new(WebUsbStream { handle }))
    }
}

/// An open WebUSB device with interface 0 claimed.
pub struct WebUsbStream {
    handle: DeviceHandle<Context>,
}

impl Read for WebUsbStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.handle.read_interrupt(ENDPOINT_IN, buf, NO_TIMEOUT).map_err(usb_io)
    }
}

impl Write for WebUsbStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.handle.write_interrupt(ENDPOINT_OUT, buf, NO_TIMEOUT).map_err(usb_io)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Device for WebUsbStream {
    fn close(mut self: Box<Self>) -> io::Result<()> {
        self.handle.release_interface(INTERFACE).map_err(usb_io)
    }
}

fn usb_io(err: rusb::Error) -> io::Error {
    let kind = match err {
        rusb::Error::Timeout => io::ErrorKind::TimedOut,
        rusb::Error::NoDevice => io::ErrorKind::NotConnected,
        rusb::Error::Access => io::ErrorKind::PermissionDenied,
        rusb::Error::NotFound => io::ErrorKind::NotFound,
        rusb::Error::Interrupted => io::ErrorKind::Interrupted,
        _ => io::ErrorKind::Other,
    };
    io::Error::new(kind, err)
}
