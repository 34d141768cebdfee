//! UDP transport to the software emulator.
//!
//! The emulator exchanges one report per datagram, so every `read` returns
//! exactly one report and every `write` sends exactly one.

use std::{
    io::{self, Read, Write},
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket},
};

use hwframe_core::{Bus, Device, DeviceInfo, Error, Result};
use tracing::debug;

/// Path prefix claimed by [`EmulatorBus`].
pub const EMULATOR_PREFIX: &str = "emulator:";

/// A connected UDP socket to the emulator.
#[derive(Debug)]
pub struct EmulatorDevice {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl EmulatorDevice {
    /// Bind an ephemeral local port and connect it to `peer`.
    ///
    /// UDP has no handshake, so this succeeds whether or not the emulator is
    /// running; a missing emulator shows up as a failed read or write.
    pub fn dial(peer: SocketAddr) -> io::Result<Self> {
        let local = match peer {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        };

        let socket = UdpSocket::bind(local)?;
        socket.connect(peer)?;
        debug!(%peer, local = %socket.local_addr()?, "emulator socket connected");

        Ok(Self { socket, peer })
    }

    /// Emulator address.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Local address of the socket.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl Read for EmulatorDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.socket.recv(buf)
    }
}

impl Write for EmulatorDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.socket.send(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Device for EmulatorDevice {}

/// The emulator endpoint exposed through the [`Bus`] contract.
///
/// Lists a single entry, `emulator:<addr>`, with vendor and product 0.
#[derive(Debug, Clone)]
pub struct EmulatorBus {
    addr: SocketAddr,
}

impl EmulatorBus {
    /// Bus for the emulator at `addr`.
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    fn path(&self) -> String {
        format!("{EMULATOR_PREFIX}{}", self.addr)
    }
}

impl Bus for EmulatorBus {
    fn name(&self) -> &'static str {
        "emulator"
    }

    fn enumerate(&mut self, vendor_id: u16, product_id: u16) -> Result<Vec<DeviceInfo>> {
        let info = DeviceInfo::new(self.path(), 0, 0);
        Ok(if info.matches(vendor_id, product_id) { vec![info] } else { Vec::new() })
    }

    fn has(&self, path: &str) -> bool {
        path.starts_with(EMULATOR_PREFIX)
    }

    fn connect(&mut self, path: &str) -> Result<Box<dyn Device>> {
        let addr: SocketAddr = path
            .strip_prefix(EMULATOR_PREFIX)
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| Error::NotFound { path: path.to_string() })?;

        let device = EmulatorDevice::dial(addr)
            .map_err(|source| Error::Connect { path: path.to_string(), source })?;
        Ok(Box::new(device))
    }
}
