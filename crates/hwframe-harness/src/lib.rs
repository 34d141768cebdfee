//! Deterministic simulation harness for hwframe.
//!
//! In-memory implementations of the [`hwframe_core::Platform`],
//! [`hwframe_core::Bus`], [`hwframe_core::Device`] and
//! [`hwframe_core::Environment`] seams. Every simulated object shares its
//! state with the handle the test keeps, so a test can hand a bus or device
//! to the code under test and still inspect what happened to it afterwards.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod sim_bus;
pub mod sim_device;
pub mod sim_env;
pub mod sim_platform;

pub use sim_bus::SimBus;
pub use sim_device::{DeviceProbe, SimDevice};
pub use sim_env::SimEnv;
pub use sim_platform::SimPlatform;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock shared simulation state, ignoring poisoning from a panicked test.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
