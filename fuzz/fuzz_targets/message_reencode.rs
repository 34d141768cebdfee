//! Encode arbitrary payloads and decode them again.
//!
//! The delimiter takes the place of the first payload byte, so a decoded
//! message carries the tail of the original payload followed by one padding
//! byte. Streams that end exactly on a report boundary have no padding and
//! must fail as truncated.

#![no_main]

use hwframe_proto::{ProtocolError, Report, WireHeader, decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u16, Vec<u8>)| {
    let (kind, payload) = input;
    if payload.is_empty() {
        return;
    }

    let reports = encode(&payload, kind);
    let stream: Vec<u8> = reports.iter().flat_map(|report| report.as_bytes().to_vec()).collect();
    let carried = WireHeader::SIZE + payload.len() - 1;

    match decode(stream.as_slice()) {
        Ok(message) => {
            assert_ne!(carried % Report::CHUNK_SIZE, 0);
            assert_eq!(message.kind, kind);
            assert_eq!(&message.payload[..payload.len() - 1], &payload[1..]);
            assert_eq!(message.payload[payload.len() - 1], 0);
        },
        Err(ProtocolError::Truncated { .. }) => assert_eq!(carried % Report::CHUNK_SIZE, 0),
        Err(err) => panic!("unexpected decode error: {err}"),
    }
});
