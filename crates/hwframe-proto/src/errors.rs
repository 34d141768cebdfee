//! Framing errors.

use std::io;

use thiserror::Error;

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while decoding a message from a report stream.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The stream did not start with `"##"`.
    #[error("invalid magic: expected 2323, found {found:02x?}")]
    InvalidMagic {
        /// The two bytes found where the magic was expected.
        found: [u8; 2],
    },

    /// The source ended before the header or declared payload was complete.
    #[error("stream ended after {received} of {needed} bytes")]
    Truncated {
        /// Bytes required by the current read.
        needed: usize,
        /// Bytes obtained before the source ended.
        received: usize,
    },

    /// The header declares a payload larger than [`crate::Message::MAX_PAYLOAD_SIZE`].
    #[error("declared payload of {size} bytes exceeds limit of {max}")]
    PayloadTooLarge {
        /// Declared size.
        size: usize,
        /// Accepted maximum.
        max: usize,
    },

    /// The underlying source failed.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}
