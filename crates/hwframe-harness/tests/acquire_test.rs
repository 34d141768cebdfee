//! Device acquisition against simulated buses.
//!
//! Covers the three device classes:
//! - Emulator: one dial of the configured endpoint, never retried
//! - USB: WebUSB then HID initialization, first enumerated device, bounded
//!   connect retry with a fixed delay
//! - Invalid: no I/O at all

use std::time::Duration;

use hwframe_core::{AcquireConfig, Acquirer, DeviceClass, Error};
use hwframe_harness::{SimBus, SimDevice, SimEnv, SimPlatform};
use proptest::prelude::*;

const RETRY_DELAY: Duration = Duration::from_millis(100);

fn acquirer(platform: SimPlatform) -> (Acquirer<SimPlatform, SimEnv>, SimEnv) {
    let env = SimEnv::new();
    (Acquirer::with_env(platform, env.clone(), AcquireConfig::default()), env)
}

#[test]
fn emulator_dials_configured_address_once() {
    let (device, _probe) = SimDevice::new();
    let platform = SimPlatform::new().with_emulator(device);
    let addr = "127.0.0.1:21999".parse().unwrap();
    let config = AcquireConfig { emulator_addr: addr, ..AcquireConfig::default() };
    let acquirer = Acquirer::with_env(platform, SimEnv::new(), config);

    assert!(acquirer.acquire(DeviceClass::Emulator).is_ok());
    assert_eq!(acquirer.platform().calls(), ["dial 127.0.0.1:21999"]);
}

#[test]
fn emulator_dial_failure_is_not_retried() {
    let (acquirer, env) = acquirer(SimPlatform::new());

    let result = acquirer.acquire(DeviceClass::Emulator);

    assert!(matches!(result, Err(Error::Connect { .. })));
    assert_eq!(acquirer.platform().calls(), ["dial 127.0.0.1:21324"]);
    assert!(env.sleeps().is_empty());
}

#[test]
fn invalid_class_touches_nothing() {
    let (acquirer, env) = acquirer(SimPlatform::with_empty_usb());

    let result = acquirer.acquire(DeviceClass::Invalid);

    assert!(matches!(result, Err(Error::NoDevice)));
    assert!(acquirer.platform().calls().is_empty());
    assert!(env.sleeps().is_empty());
}

#[test]
fn usb_initializes_webusb_before_hid() {
    let webusb = SimBus::webusb().with_device(0x1209, 0x53C1);
    let platform = SimPlatform::new().with_webusb(webusb).with_hid(SimBus::hid());
    let (acquirer, _env) = acquirer(platform);

    assert!(acquirer.acquire(DeviceClass::Usb).is_ok());
    assert_eq!(acquirer.platform().calls(), ["webusb", "hid"]);
}

#[test]
fn hid_init_failure_aborts_usb_acquisition() {
    let webusb = SimBus::webusb().with_device(0x1209, 0x53C1);
    let platform = SimPlatform::new().with_webusb(webusb.clone());
    let (acquirer, _env) = acquirer(platform);

    let result = acquirer.acquire(DeviceClass::Usb);

    assert!(matches!(result, Err(Error::TransportInit { bus: "hidapi", .. })));
    assert!(webusb.connects().is_empty());
}

#[test]
fn no_enumerated_device_is_no_device() {
    let (acquirer, env) = acquirer(SimPlatform::with_empty_usb());

    let result = acquirer.acquire(DeviceClass::Usb);

    assert!(matches!(result, Err(Error::NoDevice)));
    assert!(env.sleeps().is_empty());
}

#[test]
fn enumeration_failure_propagates() {
    let hid = SimBus::hid().with_device(0x313a, 0x0001).failing_enumerate();
    let platform = SimPlatform::new().with_webusb(SimBus::webusb()).with_hid(hid.clone());
    let (acquirer, _env) = acquirer(platform);

    let result = acquirer.acquire(DeviceClass::Usb);

    assert!(matches!(result, Err(Error::Enumerate { bus: "hidapi", .. })));
    assert!(hid.connects().is_empty());
}

#[test]
fn connects_to_first_enumerated_device() {
    let webusb = SimBus::webusb().with_device(0x1209, 0x53C1).with_device(0x1209, 0x53C0);
    let hid = SimBus::hid().with_device(0x313a, 0x0001);
    let platform = SimPlatform::new().with_webusb(webusb.clone()).with_hid(hid.clone());
    let (acquirer, _env) = acquirer(platform);

    assert!(acquirer.acquire(DeviceClass::Usb).is_ok());

    assert_eq!(webusb.connects(), ["webusb:0"]);
    assert!(hid.connects().is_empty());
}

#[test]
fn hid_device_is_used_when_webusb_is_empty() {
    let hid = SimBus::hid().with_device(0x313a, 0x0001);
    let platform = SimPlatform::new().with_webusb(SimBus::webusb()).with_hid(hid.clone());
    let (acquirer, _env) = acquirer(platform);

    assert!(acquirer.acquire(DeviceClass::Usb).is_ok());
    assert_eq!(hid.connects(), ["hid:0"]);
}

#[test]
fn connect_succeeds_on_third_attempt() {
    let webusb = SimBus::webusb().with_device(0x1209, 0x53C1).failing_connects(2);
    let platform = SimPlatform::new().with_webusb(webusb.clone()).with_hid(SimBus::hid());
    let (acquirer, env) = acquirer(platform);

    assert!(acquirer.acquire(DeviceClass::Usb).is_ok());

    assert_eq!(webusb.connects().len(), 3);
    assert_eq!(env.sleeps(), [RETRY_DELAY, RETRY_DELAY]);
    assert_eq!(env.elapsed(), Duration::from_millis(200));
}

#[test]
fn connect_gives_up_with_last_error() {
    let webusb = SimBus::webusb().with_device(0x1209, 0x53C1).failing_connects(5);
    let platform = SimPlatform::new().with_webusb(webusb.clone()).with_hid(SimBus::hid());
    let (acquirer, env) = acquirer(platform);

    let result = acquirer.acquire(DeviceClass::Usb);

    match result {
        Err(Error::Connect { path, source }) => {
            assert_eq!(path, "webusb:0");
            assert_eq!(source.kind(), std::io::ErrorKind::ResourceBusy);
        },
        Err(other) => panic!("expected connect error, got {other}"),
        Ok(_) => panic!("expected connect error, got a device"),
    }
    assert_eq!(webusb.connects().len(), 3);
    // no sleep after the final attempt
    assert_eq!(env.sleeps(), [RETRY_DELAY, RETRY_DELAY]);
}

#[test]
fn retry_policy_follows_config() {
    let webusb = SimBus::webusb().with_device(0x1209, 0x53C1).failing_connects(4);
    let platform = SimPlatform::new().with_webusb(webusb.clone()).with_hid(SimBus::hid());
    let env = SimEnv::new();
    let config = AcquireConfig {
        connect_attempts: 5,
        retry_delay: Duration::from_millis(250),
        ..AcquireConfig::default()
    };
    let acquirer = Acquirer::with_env(platform, env.clone(), config);
    assert_eq!(acquirer.config().connect_attempts, 5);

    assert!(acquirer.acquire(DeviceClass::Usb).is_ok());
    assert_eq!(webusb.connects().len(), 5);
    assert_eq!(env.elapsed(), Duration::from_secs(1));
}

#[test]
fn zero_attempts_still_tries_once() {
    let webusb = SimBus::webusb().with_device(0x1209, 0x53C1);
    let platform = SimPlatform::new().with_webusb(webusb.clone()).with_hid(SimBus::hid());
    let env = SimEnv::new();
    let config = AcquireConfig { connect_attempts: 0, ..AcquireConfig::default() };
    let acquirer = Acquirer::with_env(platform, env.clone(), config);

    assert!(acquirer.acquire(DeviceClass::Usb).is_ok());
    assert_eq!(webusb.connects().len(), 1);
    assert!(env.sleeps().is_empty());
}

#[test]
fn buses_are_initialized_on_every_acquisition() {
    let webusb = SimBus::webusb().with_device(0x1209, 0x53C1);
    let platform = SimPlatform::new().with_webusb(webusb).with_hid(SimBus::hid());
    let (acquirer, _env) = acquirer(platform);

    assert!(acquirer.acquire(DeviceClass::Usb).is_ok());
    assert!(acquirer.acquire(DeviceClass::Usb).is_ok());

    assert_eq!(acquirer.platform().calls(), ["webusb", "hid", "webusb", "hid"]);
}

proptest! {
    #[test]
    fn attempts_are_bounded(failures in 0usize..8) {
        let webusb = SimBus::webusb().with_device(0x1209, 0x53C1).failing_connects(failures);
        let platform = SimPlatform::new().with_webusb(webusb.clone()).with_hid(SimBus::hid());
        let (acquirer, env) = acquirer(platform);

        let result = acquirer.acquire(DeviceClass::Usb);

        let attempts = (failures + 1).min(3);
        prop_assert_eq!(result.is_ok(), failures < 3);
        prop_assert_eq!(webusb.connects().len(), attempts);
        prop_assert_eq!(env.sleeps().len(), attempts - 1);
    }
}
