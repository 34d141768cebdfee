//! Fixed-size low-level reports.

use std::fmt;

/// One 64-byte report as written to or read from a device.
///
/// Byte 0 is the `'?'` marker, bytes 1..64 carry a slice of the message
/// stream. Reports are zero-initialized, so a short final chunk leaves the
/// rest of its report zero-filled.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Report([u8; Report::SIZE]);

impl Report {
    /// Size of every report.
    pub const SIZE: usize = 64;

    /// Stream bytes carried per report.
    pub const CHUNK_SIZE: usize = Self::SIZE - 1;

    /// Marker stored in byte 0.
    pub const MARKER: u8 = b'?';

    /// Build a report carrying `chunk` after the marker.
    ///
    /// Chunks longer than [`Report::CHUNK_SIZE`] are cut to fit.
    pub fn from_chunk(chunk: &[u8]) -> Self {
        let len = chunk.len().min(Self::CHUNK_SIZE);
        let mut buf = [0u8; Self::SIZE];
        buf[0] = Self::MARKER;
        buf[1..=len].copy_from_slice(&chunk[..len]);
        Self(buf)
    }

    /// Wrap raw bytes read from a device.
    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        Self(bytes)
    }

    /// Marker byte as received.
    pub fn marker(&self) -> u8 {
        self.0[0]
    }

    /// Stream bytes carried by this report.
    pub fn chunk(&self) -> &[u8] {
        &self.0[1..]
    }

    /// All 64 bytes.
    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for Report {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self.0.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        f.debug_struct("Report").field("marker", &(self.0[0] as char)).field("used", &used).finish()
    }
}
