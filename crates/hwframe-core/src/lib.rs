//! Host-side device access for hardware wallets.
//!
//! Everything between "the caller has a message" and "bytes move over a
//! bus", minus the bus drivers themselves.
//!
//! # Architecture
//!
//! Physical transports plug in through the [`Bus`] trait. A [`BusSet`]
//! presents several buses as one: enumeration is the union of every bus and
//! connecting routes to whichever bus claims the path.
//!
//! The [`Acquirer`] turns a [`DeviceClass`] into one open [`Device`]. It
//! asks a [`Platform`] for the emulator socket or for the WebUSB and HID
//! buses, and waits between connect retries through an [`Environment`], so
//! tests can swap in simulated buses and a recording clock.
//!
//! A [`Driver`] writes reports and reads back one reply. The [`session`]
//! functions wrap acquisition, encoding, the driver call and closing the
//! device into a single exchange.
//!
//! # Components
//!
//! - [`device`]: Device stream trait, discovery records, device classes
//! - [`bus`]: Bus trait and the aggregating [`BusSet`]
//! - [`mod@env`]: Environment abstraction (time, sleeping)
//! - [`acquire`]: Device acquisition with bounded connect retry
//! - [`driver`]: Report write loop and reply decoding
//! - [`session`]: Complete exchanges, including the Initialize handshake
//! - [`error`]: Error taxonomy

pub mod acquire;
pub mod bus;
pub mod device;
pub mod driver;
pub mod env;
pub mod error;
pub mod session;

pub use acquire::{AcquireConfig, Acquirer, Platform};
pub use bus::{Bus, BusSet};
pub use device::{Device, DeviceClass, DeviceInfo};
pub use driver::{DeviceDriver, Driver};
pub use env::{Environment, SystemEnv};
pub use error::{BusError, Error, Result};
pub use hwframe_proto::{Message, MessageType, Report};
pub use session::Client;
