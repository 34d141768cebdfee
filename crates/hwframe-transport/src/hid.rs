//! HID transport via hidapi.

use std::{
    ffi::CString,
    io::{self, Read, Write},
};

use hidapi::{HidApi, HidDevice, HidError};
use hwframe_core::{
    Bus, Device, DeviceInfo, Error, Report, Result,
    device::wallet_info,
};
use tracing::debug;

/// Path prefix claimed by [`HidBus`].
pub const HID_PREFIX: &str = "hid:";

/// hidapi expects a leading report ID; wallets use a single unnumbered report.
const REPORT_ID: u8 = 0x00;

/// Wallets reachable through hidapi.
pub struct HidBus {
    api: HidApi,
}

impl HidBus {
    /// Initialize hidapi.
    pub fn new() -> Result<Self> {
        let api = HidApi::new()
            .map_err(|err| Error::TransportInit { bus: "hidapi", source: err.into() })?;
        Ok(Self { api })
    }
}

impl Bus for HidBus {
    fn name(&self) -> &'static str {
        "hidapi"
    }

    fn enumerate(&mut self, vendor_id: u16, product_id: u16) -> Result<Vec<DeviceInfo>> {
        self.api
            .refresh_devices()
            .map_err(|err| Error::Enumerate { bus: "hidapi", source: err.into() })?;

        // Interface 0 is the wallet; -1 where the platform reports no interface.
        let infos = self
            .api
            .device_list()
            .filter(|d| d.interface_number() <= 0)
            .filter_map(|d| {
                let path = format!("{HID_PREFIX}{}", d.path().to_string_lossy());
                wallet_info(path, d.vendor_id(), d.product_id(), vendor_id, product_id)
            })
            .collect();
        Ok(infos)
    }

    fn has(&self, path: &str) -> bool {
        path.starts_with(HID_PREFIX)
    }

    fn connect(&mut self, path: &str) -> Result<Box<dyn Device>> {
        let raw = path
            .strip_prefix(HID_PREFIX)
            .ok_or_else(|| Error::NotFound { path: path.to_string() })?;
        let raw = CString::new(raw).map_err(|err| Error::Connect {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidInput, err),
        })?;

        let device = self
            .api
            .open_path(&raw)
            .map_err(|err| Error::Connect { path: path.to_string(), source: hid_io(&err) })?;

        debug!(path, "hid device opened");
        Ok(Box::new(HidStream { device }))
    }
}

/// An open HID device.
pub struct HidStream {
    device: HidDevice,
}

impl Read for HidStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.device.read(buf).map_err(|err| hid_io(&err))
    }
}

impl Write for HidStream {
    /// Writes at most one report, prefixed with the report ID.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len().min(Report::SIZE);
        let mut out = [0u8; Report::SIZE + 1];
        out[0] = REPORT_ID;
        out[1..=len].copy_from_slice(&buf[..len]);

        self.device.write(&out).map_err(|err| hid_io(&err))?;
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Device for HidStream {}

fn hid_io(err: &HidError) -> io::Error {
    io::Error::other(err.to_string())
}
