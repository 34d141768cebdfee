//! Complete exchanges: acquire, encode, send, optionally receive, release.
//!
//! Every exchange opens its own device and releases it before returning,
//! whether the exchange succeeded or not. A failure to close is logged and
//! never replaces the exchange result.
//!
//! [`initialize`] is the handshake that resets the device's protocol state.
//! It sends an empty Initialize message and leaves any reply unread.

use hwframe_proto::{Message, Report};
use tracing::{debug, warn};

use crate::{
    acquire::{Acquirer, Platform},
    device::{Device, DeviceClass},
    driver::{DeviceDriver, Driver},
    env::{Environment, SystemEnv},
    error::Result,
};

/// Send the Initialize handshake to a freshly acquired device.
pub fn initialize<P, E, D>(acquirer: &Acquirer<P, E>, driver: &D, class: DeviceClass) -> Result<()>
where
    P: Platform,
    E: Environment,
    D: Driver,
{
    notify(acquirer, driver, class, &Message::initialize())
}

/// Send `message` and return the device's reply.
pub fn call<P, E, D>(
    acquirer: &Acquirer<P, E>,
    driver: &D,
    class: DeviceClass,
    message: &Message,
) -> Result<Message>
where
    P: Platform,
    E: Environment,
    D: Driver,
{
    exchange(acquirer, class, message, |device, reports| driver.send_and_receive(device, reports))
}

/// Send `message` without reading a reply.
pub fn notify<P, E, D>(
    acquirer: &Acquirer<P, E>,
    driver: &D,
    class: DeviceClass,
    message: &Message,
) -> Result<()>
where
    P: Platform,
    E: Environment,
    D: Driver,
{
    exchange(acquirer, class, message, |device, reports| driver.send_only(device, reports))
}

fn exchange<P, E, T>(
    acquirer: &Acquirer<P, E>,
    class: DeviceClass,
    message: &Message,
    op: impl FnOnce(&mut dyn Device, &[Report]) -> Result<T>,
) -> Result<T>
where
    P: Platform,
    E: Environment,
{
    let mut device = acquirer.acquire(class)?;

    let reports = message.to_reports();
    debug!(%class, kind = message.kind, reports = reports.len(), "exchange started");

    let result = op(device.as_mut(), &reports);
    release(device);
    result
}

fn release(device: Box<dyn Device>) {
    if let Err(err) = device.close() {
        warn!(error = %err, "closing device failed");
    }
}

/// An acquirer, a driver and a device class bundled for repeated exchanges.
pub struct Client<P, E = SystemEnv, D = DeviceDriver> {
    acquirer: Acquirer<P, E>,
    driver: D,
    class: DeviceClass,
}

impl<P: Platform> Client<P> {
    /// Client using the default acquisition settings and driver.
    pub fn new(platform: P, class: DeviceClass) -> Self {
        Self::from_parts(Acquirer::new(platform), DeviceDriver, class)
    }
}

impl<P: Platform, E: Environment, D: Driver> Client<P, E, D> {
    /// Assemble a client from its parts.
    pub fn from_parts(acquirer: Acquirer<P, E>, driver: D, class: DeviceClass) -> Self {
        Self { acquirer, driver, class }
    }

    /// Device class every exchange acquires.
    pub fn class(&self) -> DeviceClass {
        self.class
    }

    /// The underlying acquirer.
    pub fn acquirer(&self) -> &Acquirer<P, E> {
        &self.acquirer
    }

    /// See [`initialize`].
    pub fn initialize(&self) -> Result<()> {
        initialize(&self.acquirer, &self.driver, self.class)
    }

    /// See [`call`].
    pub fn call(&self, message: &Message) -> Result<Message> {
        call(&self.acquirer, &self.driver, self.class, message)
    }

    /// See [`notify`].
    pub fn notify(&self, message: &Message) -> Result<()> {
        notify(&self.acquirer, &self.driver, self.class, message)
    }
}
