//! Open device streams and discovery records.

use std::{
    fmt,
    io::{self, Read, Write},
};

/// Vendor ID of first-generation devices.
pub const VENDOR_T1: u16 = 0x313a;
/// First-generation bootloader product ID.
pub const PRODUCT_T1_BOOTLOADER: u16 = 0x0000;
/// First-generation firmware product ID.
pub const PRODUCT_T1_FIRMWARE: u16 = 0x0001;
/// Vendor ID of second-generation devices.
pub const VENDOR_T2: u16 = 0x1209;
/// Second-generation bootloader product ID.
pub const PRODUCT_T2_BOOTLOADER: u16 = 0x53C0;
/// Second-generation firmware product ID.
pub const PRODUCT_T2_FIRMWARE: u16 = 0x53C1;

/// Whether a vendor/product pair identifies a supported wallet.
pub fn is_wallet(vendor_id: u16, product_id: u16) -> bool {
    matches!(
        (vendor_id, product_id),
        (VENDOR_T1, PRODUCT_T1_BOOTLOADER | PRODUCT_T1_FIRMWARE)
            | (VENDOR_T2, PRODUCT_T2_BOOTLOADER | PRODUCT_T2_FIRMWARE)
    )
}

/// Discovery record for a device a physical bus may list.
///
/// Unrecognized devices are dropped whatever the filter; recognized ones must
/// then pass the caller's filter, where 0 matches anything.
pub fn wallet_info(
    path: impl Into<String>,
    vendor_id: u16,
    product_id: u16,
    vendor_filter: u16,
    product_filter: u16,
) -> Option<DeviceInfo> {
    if !is_wallet(vendor_id, product_id) {
        return None;
    }
    let info = DeviceInfo::new(path, vendor_id, product_id);
    info.matches(vendor_filter, product_filter).then_some(info)
}

/// An open, bidirectional byte stream to exactly one device.
///
/// Owned by a single exchange. Reports are written with [`Write`] and the
/// reply is read with [`Read`], one report per read on packet-oriented
/// transports.
pub trait Device: Read + Write {
    /// Release the device.
    ///
    /// Dropping a device also releases it; `close` exists so transports can
    /// report failures that a drop would swallow.
    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}

/// A device found during enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceInfo {
    /// Transport-specific identifier. Its prefix names the owning bus.
    pub path: String,
    /// USB vendor ID.
    pub vendor_id: u16,
    /// USB product ID.
    pub product_id: u16,
}

impl DeviceInfo {
    /// Create a discovery record.
    pub fn new(path: impl Into<String>, vendor_id: u16, product_id: u16) -> Self {
        Self { path: path.into(), vendor_id, product_id }
    }

    /// Apply an enumeration filter. Zero matches any value for that field.
    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        (vendor_id == 0 || vendor_id == self.vendor_id)
            && (product_id == 0 || product_id == self.product_id)
    }
}

/// Which kind of device the caller wants. Chosen explicitly, never detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeviceClass {
    /// Software emulator reached over UDP.
    Emulator = 1,
    /// Physical device on WebUSB or HID.
    Usb = 2,
    /// No usable device class.
    Invalid = 3,
}

impl From<u8> for DeviceClass {
    /// Unrecognized selectors map to [`DeviceClass::Invalid`].
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Emulator,
            2 => Self::Usb,
            _ => Self::Invalid,
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Emulator => f.write_str("emulator"),
            Self::Usb => f.write_str("usb"),
            Self::Invalid => f.write_str("invalid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_filter_matches_anything() {
        let info = DeviceInfo::new("hid:0001", VENDOR_T2, PRODUCT_T2_FIRMWARE);

        assert!(info.matches(0, 0));
        assert!(info.matches(VENDOR_T2, 0));
        assert!(info.matches(0, PRODUCT_T2_FIRMWARE));
        assert!(info.matches(VENDOR_T2, PRODUCT_T2_FIRMWARE));
    }

    #[test]
    fn nonzero_filter_must_match() {
        let info = DeviceInfo::new("hid:0001", VENDOR_T2, PRODUCT_T2_FIRMWARE);

        assert!(!info.matches(VENDOR_T1, 0));
        assert!(!info.matches(0, PRODUCT_T2_BOOTLOADER));
    }

    #[test]
    fn recognizes_wallet_identifiers() {
        assert!(is_wallet(0x313a, 0x0000));
        assert!(is_wallet(0x313a, 0x0001));
        assert!(is_wallet(0x1209, 0x53C0));
        assert!(is_wallet(0x1209, 0x53C1));

        assert!(!is_wallet(0x313a, 0x53C1));
        assert!(!is_wallet(0x1209, 0x0001));
        assert!(!is_wallet(0x046d, 0xc52b));
    }

    #[test]
    fn wallet_info_drops_unrecognized_devices() {
        assert_eq!(wallet_info("hid:mouse", 0x046d, 0xc52b, 0, 0), None);
        assert_eq!(wallet_info("hid:mouse", 0x046d, 0xc52b, 0x046d, 0xc52b), None);
    }

    #[test]
    fn wallet_info_applies_caller_filter() {
        let listed = wallet_info("webusb:001:004", VENDOR_T2, PRODUCT_T2_FIRMWARE, 0, 0);
        assert_eq!(listed, Some(DeviceInfo::new("webusb:001:004", VENDOR_T2, PRODUCT_T2_FIRMWARE)));

        assert!(wallet_info("hid:1", VENDOR_T1, PRODUCT_T1_FIRMWARE, VENDOR_T1, 0).is_some());
        assert!(wallet_info("hid:1", VENDOR_T1, PRODUCT_T1_FIRMWARE, VENDOR_T2, 0).is_none());
        assert!(wallet_info("hid:1", VENDOR_T1, PRODUCT_T1_FIRMWARE, 0, PRODUCT_T1_BOOTLOADER).is_none());
    }

    #[test]
    fn device_class_selectors() {
        assert_eq!(DeviceClass::from(1), DeviceClass::Emulator);
        assert_eq!(DeviceClass::from(2), DeviceClass::Usb);
        assert_eq!(DeviceClass::from(3), DeviceClass::Invalid);
        assert_eq!(DeviceClass::from(0), DeviceClass::Invalid);
        assert_eq!(DeviceClass::from(42), DeviceClass::Invalid);
        assert_eq!(DeviceClass::Usb as u8, 2);
    }
}
