//! Simulated bus with scripted devices and connect failures.

use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex},
};

use hwframe_core::{Bus, Device, DeviceInfo, Error, Result};
use tracing::trace;

use crate::{lock, sim_device::SimDevice};

#[derive(Debug, Default)]
struct BusState {
    devices: Vec<DeviceInfo>,
    streams: VecDeque<SimDevice>,
    fail_connects: usize,
    fail_enumerate: bool,
    connects: Vec<String>,
}

/// In-memory bus whose paths all start with a fixed prefix.
///
/// Clones share state, so a test can give one handle to a
/// [`SimPlatform`](crate::SimPlatform) and inspect the other.
#[derive(Debug, Clone)]
pub struct SimBus {
    name: &'static str,
    prefix: &'static str,
    state: Arc<Mutex<BusState>>,
}

impl SimBus {
    /// Empty bus claiming paths that start with `prefix`.
    pub fn new(name: &'static str, prefix: &'static str) -> Self {
        Self { name, prefix, state: Arc::new(Mutex::new(BusState::default())) }
    }

    /// Bus claiming `webusb:` paths.
    pub fn webusb() -> Self {
        Self::new("webusb", "webusb:")
    }

    /// Bus claiming `hid:` paths.
    pub fn hid() -> Self {
        Self::new("hidapi", "hid:")
    }

    /// Add a device. Its path is the prefix followed by its index on the bus.
    #[must_use]
    pub fn with_device(self, vendor_id: u16, product_id: u16) -> Self {
        {
            let mut state = lock(&self.state);
            let path = format!("{}{}", self.prefix, state.devices.len());
            state.devices.push(DeviceInfo::new(path, vendor_id, product_id));
        }
        self
    }

    /// Hand out `device` on the next successful connect. Without a queued
    /// stream, connects return a fresh silent [`SimDevice`].
    #[must_use]
    pub fn with_stream(self, device: SimDevice) -> Self {
        lock(&self.state).streams.push_back(device);
        self
    }

    /// Fail the next `count` connect attempts as if the device were busy.
    #[must_use]
    pub fn failing_connects(self, count: usize) -> Self {
        lock(&self.state).fail_connects = count;
        self
    }

    /// Fail every enumeration.
    #[must_use]
    pub fn failing_enumerate(self) -> Self {
        lock(&self.state).fail_enumerate = true;
        self
    }

    /// Path of the `index`th device.
    pub fn path(&self, index: usize) -> String {
        format!("{}{index}", self.prefix)
    }

    /// Paths passed to `connect`, successful or not, in order.
    pub fn connects(&self) -> Vec<String> {
        lock(&self.state).connects.clone()
    }
}

impl Bus for SimBus {
    fn name(&self) -> &'static str {
        self.name
    }

    fn enumerate(&mut self, vendor_id: u16, product_id: u16) -> Result<Vec<DeviceInfo>> {
        let state = lock(&self.state);
        if state.fail_enumerate {
            return Err(Error::Enumerate { bus: self.name, source: "simulated failure".into() });
        }

        Ok(state.devices.iter().filter(|info| info.matches(vendor_id, product_id)).cloned().collect())
    }

    fn has(&self, path: &str) -> bool {
        path.starts_with(self.prefix)
    }

    fn connect(&mut self, path: &str) -> Result<Box<dyn Device>> {
        let mut state = lock(&self.state);
        state.connects.push(path.to_string());

        if state.fail_connects > 0 {
            state.fail_connects -= 1;
            trace!(bus = self.name, path, remaining = state.fail_connects, "simulated busy device");
            let source = io::Error::new(io::ErrorKind::ResourceBusy, "simulated busy device");
            return Err(Error::Connect { path: path.to_string(), source });
        }

        if !state.devices.iter().any(|info| info.path == path) {
            return Err(Error::NotFound { path: path.to_string() });
        }

        let device = match state.streams.pop_front() {
            Some(device) => device,
            None => SimDevice::new().0,
        };
        Ok(Box::new(device))
    }
}
