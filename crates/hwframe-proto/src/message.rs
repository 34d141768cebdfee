//! Application-level message.

use std::io::Read;

use crate::{MessageType, Report, codec, errors::Result};

/// A message kind plus its opaque serialized payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    /// Numeric message kind.
    pub kind: u16,
    /// Serialized payload, produced and consumed outside this crate.
    pub payload: Vec<u8>,
}

impl Message {
    /// Largest payload [`codec::decode`] accepts (16 MB).
    pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

    /// Create a message.
    pub fn new(kind: impl Into<u16>, payload: impl Into<Vec<u8>>) -> Self {
        Self { kind: kind.into(), payload: payload.into() }
    }

    /// The empty-payload handshake that resets device protocol state.
    pub fn initialize() -> Self {
        Self { kind: MessageType::Initialize.into(), payload: Vec::new() }
    }

    /// Named kind, if this is one of the well-known ones.
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_u16(self.kind)
    }

    /// Split this message into reports.
    pub fn to_reports(&self) -> Vec<Report> {
        codec::encode(&self.payload, self.kind)
    }

    /// Read one message from a report stream.
    pub fn read_from<R: Read>(source: R) -> Result<Self> {
        codec::decode(source)
    }
}
