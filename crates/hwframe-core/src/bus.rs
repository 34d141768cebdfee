//! Bus abstraction and aggregation.
//!
//! A [`Bus`] is one physical transport's discovery and connect logic. Buses
//! claim device paths by prefix, which lets a [`BusSet`] route a path back to
//! the bus that listed it without remembering enumeration results.

use tracing::{debug, trace};

use crate::{
    device::{Device, DeviceInfo},
    error::{Error, Result},
};

/// One transport's device discovery and connection.
pub trait Bus {
    /// Short name for logs and errors.
    fn name(&self) -> &'static str;

    /// List devices accessible through this bus.
    ///
    /// - If `vendor_id` is 0, any vendor matches.
    /// - If `product_id` is 0, any product matches.
    /// - If both are 0, every device the bus handles is returned.
    fn enumerate(&mut self, vendor_id: u16, product_id: u16) -> Result<Vec<DeviceInfo>>;

    /// Whether `path` belongs to this bus.
    fn has(&self, path: &str) -> bool;

    /// Open the device at `path`.
    fn connect(&mut self, path: &str) -> Result<Box<dyn Device>>;
}

/// Several buses presented as one.
///
/// Buses are consulted in registration order. Enumeration concatenates every
/// bus's results without deduplication; connecting goes to the first bus
/// whose [`Bus::has`] claims the path.
#[derive(Default)]
pub struct BusSet {
    buses: Vec<Box<dyn Bus>>,
}

impl BusSet {
    /// Aggregate `buses` in the given order.
    pub fn new(buses: Vec<Box<dyn Bus>>) -> Self {
        Self { buses }
    }

    /// Register another bus after the existing ones.
    pub fn push(&mut self, bus: Box<dyn Bus>) {
        self.buses.push(bus);
    }

    /// Number of registered buses.
    pub fn len(&self) -> usize {
        self.buses.len()
    }

    /// Whether no bus is registered.
    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }
}

impl Bus for BusSet {
    fn name(&self) -> &'static str {
        "bus-set"
    }

    /// Union of every bus's results. The first failing bus aborts the listing.
    fn enumerate(&mut self, vendor_id: u16, product_id: u16) -> Result<Vec<DeviceInfo>> {
        let mut infos = Vec::new();
        for bus in &mut self.buses {
            let found = bus.enumerate(vendor_id, product_id)?;
            trace!(bus = bus.name(), count = found.len(), "enumerated");
            infos.extend(found);
        }
        Ok(infos)
    }

    fn has(&self, path: &str) -> bool {
        self.buses.iter().any(|bus| bus.has(path))
    }

    fn connect(&mut self, path: &str) -> Result<Box<dyn Device>> {
        let Some(bus) = self.buses.iter_mut().find(|bus| bus.has(path)) else {
            return Err(Error::NotFound { path: path.to_string() });
        };

        debug!(bus = bus.name(), path, "connecting");
        bus.connect(path)
    }
}
