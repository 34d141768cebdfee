//! Concrete transports for hwframe.
//!
//! - [`emulator`]: UDP socket to the software emulator (always available)
//! - `hid`: hidapi bus (`usb` feature)
//! - `webusb`: libusb bus (`usb` feature)
//! - [`platform`]: [`SystemPlatform`], wiring the above into an acquirer
//!
//! # Features
//!
//! - `usb`: Enable the HID and WebUSB buses (requires hidapi's and libusb's
//!   system dependencies)

use hwframe_core::{AcquireConfig, Acquirer, Client, DeviceClass, DeviceDriver};

pub mod emulator;
#[cfg(feature = "usb")]
pub mod hid;
pub mod platform;
#[cfg(feature = "usb")]
pub mod webusb;

pub use emulator::{EMULATOR_PREFIX, EmulatorBus, EmulatorDevice};
#[cfg(feature = "usb")]
pub use hid::{HID_PREFIX, HidBus};
pub use platform::SystemPlatform;
#[cfg(feature = "usb")]
pub use webusb::{WEBUSB_PREFIX, WebUsbBus};

/// Acquirer over the host's transports.
pub fn system_acquirer(config: AcquireConfig) -> Acquirer<SystemPlatform> {
    Acquirer::new(SystemPlatform).with_config(config)
}

/// Client over the host's transports.
pub fn system_client(class: DeviceClass, config: AcquireConfig) -> Client<SystemPlatform> {
    Client::from_parts(system_acquirer(config), DeviceDriver, class)
}
