//! Decode arbitrary bytes as a report stream.
//!
//! Decoding must never panic, and a successful decode must yield exactly the
//! declared number of payload bytes.

#![no_main]

use hwframe_proto::{Message, Report, WireHeader, decode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(message) = decode(data) else {
        return;
    };

    assert!(data.len() >= Report::SIZE);
    assert!(message.payload.len() <= Message::MAX_PAYLOAD_SIZE);

    let mut header = [0u8; WireHeader::SIZE];
    header.copy_from_slice(&data[1..=WireHeader::SIZE]);
    if let Ok(parsed) = WireHeader::parse(&header) {
        assert_eq!(parsed.kind(), message.kind);
        assert_eq!(parsed.length() as usize, message.payload.len());
    }
});
