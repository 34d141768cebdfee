//! Message header (9 bytes, big-endian).
//!
//! ```text
//! ┌───────┬──────┬────────────┬───────────┐
//! │ magic │ kind │   length   │ delimiter │
//! │ "##"  │ u16  │    u32     │   '\n'    │
//! └───────┴──────┴────────────┴───────────┘
//!   0..2    2..4     4..8          8
//! ```
//!
//! The header is the first thing in the report stream, so it always lands in
//! the first report right after the marker byte.

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{BigEndian, U16, U32},
};

use crate::errors::{ProtocolError, Result};

/// Fixed message header, laid out exactly as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct WireHeader {
    magic: [u8; 2],
    kind: U16<BigEndian>,
    length: U32<BigEndian>,
    delimiter: u8,
}

impl WireHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 9;

    /// Magic bytes opening every message.
    pub const MAGIC: [u8; 2] = *b"##";

    /// Byte separating the header from the payload.
    pub const DELIMITER: u8 = b'\n';

    /// Build a header for a message of `kind` declaring `length` payload bytes.
    pub fn new(kind: u16, length: u32) -> Self {
        Self {
            magic: Self::MAGIC,
            kind: U16::new(kind),
            length: U32::new(length),
            delimiter: Self::DELIMITER,
        }
    }

    /// Parse a header, validating the magic.
    ///
    /// The delimiter byte is not checked; it is read and discarded.
    pub fn parse(bytes: &[u8; Self::SIZE]) -> Result<Self> {
        let header = Self::read_from_bytes(bytes).map_err(|_| ProtocolError::Truncated {
            needed: Self::SIZE,
            received: bytes.len(),
        })?;

        if header.magic != Self::MAGIC {
            return Err(ProtocolError::InvalidMagic { found: header.magic });
        }

        Ok(header)
    }

    /// Message kind.
    pub fn kind(&self) -> u16 {
        self.kind.get()
    }

    /// Declared payload length.
    pub fn length(&self) -> u32 {
        self.length.get()
    }

    /// Raw header bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }
}
