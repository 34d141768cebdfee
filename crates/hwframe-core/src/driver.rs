//! Writing reports to a device and reading back the reply.


use hwframe_proto::{Message, Report};
use tracing::{debug, trace};

use crate::{
    device::Device,
    error::{Error, Result},
};

/// Performs the I/O half of an exchange on a device the caller owns.
///
/// Neither method closes the device.
pub trait Driver {
    /// Write every report in order, then decode exactly one reply.
    ///
    /// A failed write aborts the exchange before anything is read.
    fn send_and_receive(&self, device: &mut dyn Device, reports: &[Report]) -> Result<Message>;

    /// Write every report in order without waiting for a reply.
    fn send_only(&self, device: &mut dyn Device, reports: &[Report]) -> Result<()>;
}

/// Blocking driver writing one report per `write` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceDriver;

impl DeviceDriver {
    fn write_reports(device: &mut dyn Device, reports: &[Report]) -> Result<()> {
        for (index, report) in reports.iter().enumerate() {
            trace!(index, "writing report");
            device.write_all(report.as_bytes()).map_err(Error::Write)?;
        }
        device.flush().map_err(Error::Write)?;

        debug!(reports = reports.len(), "reports written");
        Ok(())
    }
}

impl Driver for DeviceDriver {
    fn send_and_receive(&self, device: &mut dyn Device, reports: &[Report]) -> Result<Message> {
        Self::write_reports(device, reports)?;

        let reply = Message::read_from(device)?;
        debug!(kind = reply.kind, size = reply.payload.len(), "reply received");
        Ok(reply)
    }

    fn send_only(&self, device: &mut dyn Device, reports: &[Report]) -> Result<()> {
        Self::write_reports(device, reports)
    }
}
