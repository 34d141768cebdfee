//! Simulated transport provider.

use std::{collections::VecDeque, io, net::SocketAddr, sync::Mutex};

use hwframe_core::{Bus, Device, Error, Platform, Result};

use crate::{lock, sim_bus::SimBus, sim_device::SimDevice};

/// Platform backed by [`SimBus`]es and queued emulator devices.
///
/// A bus that was never installed fails to initialize. With no emulator
/// device queued, dialing the emulator is refused. Every platform call is
/// logged and available through [`SimPlatform::calls`].
#[derive(Debug, Default)]
pub struct SimPlatform {
    webusb: Option<SimBus>,
    hid: Option<SimBus>,
    emulator: Mutex<VecDeque<SimDevice>>,
    calls: Mutex<Vec<String>>,
}

impl SimPlatform {
    /// Platform on which nothing initializes and the emulator refuses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform whose WebUSB and HID buses both initialize, empty.
    pub fn with_empty_usb() -> Self {
        Self::new().with_webusb(SimBus::webusb()).with_hid(SimBus::hid())
    }

    /// Install the WebUSB bus.
    #[must_use]
    pub fn with_webusb(mut self, bus: SimBus) -> Self {
        self.webusb = Some(bus);
        self
    }

    /// Install the HID bus.
    #[must_use]
    pub fn with_hid(mut self, bus: SimBus) -> Self {
        self.hid = Some(bus);
        self
    }

    /// Queue a device for the next emulator dial.
    #[must_use]
    pub fn with_emulator(self, device: SimDevice) -> Self {
        lock(&self.emulator).push_back(device);
        self
    }

    /// Calls made so far: `dial <addr>`, `webusb` or `hid`.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: String) {
        lock(&self.calls).push(call);
    }

    fn init(bus: Option<&SimBus>, name: &'static str) -> Result<Box<dyn Bus>> {
        match bus {
            Some(bus) => Ok(Box::new(bus.clone())),
            None => Err(Error::TransportInit { bus: name, source: "not installed".into() }),
        }
    }
}

impl Platform for SimPlatform {
    fn dial_emulator(&self, addr: SocketAddr) -> Result<Box<dyn Device>> {
        self.record(format!("dial {addr}"));

        match lock(&self.emulator).pop_front() {
            Some(device) => Ok(Box::new(device)),
            None => {
                let source = io::Error::from(io::ErrorKind::ConnectionRefused);
                Err(Error::Connect { path: addr.to_string(), source })
            },
        }
    }

    fn webusb(&self) -> Result<Box<dyn Bus>> {
        self.record("webusb".into());
        Self::init(self.webusb.as_ref(), "webusb")
    }

    fn hid(&self) -> Result<Box<dyn Bus>> {
        self.record("hid".into());
        Self::init(self.hid.as_ref(), "hidapi")
    }
}
