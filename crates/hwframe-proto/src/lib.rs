//! Wire format for hardware wallet messages.
//!
//! A message is a `(kind, payload)` pair. On the wire it becomes a short
//! binary header followed by the payload bytes, and that stream is cut into
//! fixed 64-byte reports, each carrying a `'?'` marker byte and up to 63
//! bytes of stream.
//!
//! ```text
//! stream:  "##" | kind (u16 BE) | length (u32 BE) | "\n" | payload[1..]
//! report:  '?'  | 63 bytes of stream (last report zero-padded)
//! ```
//!
//! The declared length is the length of the whole payload while only
//! `payload[1..]` follows the delimiter. Devices in the field decode this
//! shifted layout, so the encoder reproduces it byte for byte and the decoder
//! reads exactly the declared number of bytes back.
//!
//! Payload contents are opaque here. Serializing and interpreting them is the
//! job of a higher layer.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod errors;
pub mod header;
pub mod message;
pub mod message_type;
pub mod report;

pub use codec::{ReportReader, decode, encode};
pub use errors::{ProtocolError, Result};
pub use header::WireHeader;
pub use message::Message;
pub use message_type::MessageType;
pub use report::Report;
