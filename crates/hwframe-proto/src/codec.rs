//! Splitting messages into reports and reassembling them.

use std::io::{self, Read};

use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use crate::{
    errors::{ProtocolError, Result},
    header::WireHeader,
    message::Message,
    report::Report,
};

/// Encode `payload` of the given `kind` into a sequence of reports.
///
/// The header declares `payload.len()` while the stream carries
/// `payload[1..]`. This matches what deployed devices expect and must not be
/// changed independently of them.
pub fn encode(payload: &[u8], kind: u16) -> Vec<Report> {
    let body = payload.get(1..).unwrap_or_default();
    let header = WireHeader::new(kind, payload.len() as u32);

    let mut stream = BytesMut::with_capacity(WireHeader::SIZE + body.len());
    stream.put_slice(&header.to_bytes());
    stream.put_slice(body);

    let reports: Vec<Report> = stream.chunks(Report::CHUNK_SIZE).map(Report::from_chunk).collect();

    trace!(kind, declared = payload.len(), reports = reports.len(), "encoded message");
    reports
}

/// Decode exactly one message from a report stream.
///
/// Reads whole 64-byte reports from `source` and stops after the report
/// holding the last declared payload byte, so a following message on the same
/// source stays unread.
pub fn decode<R: Read>(source: R) -> Result<Message> {
    let mut reader = ReportReader::new(source);

    let mut raw = [0u8; WireHeader::SIZE];
    reader.read_stream(&mut raw)?;
    let header = WireHeader::parse(&raw)?;

    let size = header.length() as usize;
    if size > Message::MAX_PAYLOAD_SIZE {
        return Err(ProtocolError::PayloadTooLarge { size, max: Message::MAX_PAYLOAD_SIZE });
    }

    let mut payload = vec![0u8; size];
    reader.read_stream(&mut payload)?;

    debug!(kind = header.kind(), size, reports = reader.reports_read(), "decoded message");
    Ok(Message { kind: header.kind(), payload })
}

/// Reads the message stream out of consecutive reports, dropping each
/// report's marker byte.
#[derive(Debug)]
pub struct ReportReader<R> {
    inner: R,
    report: [u8; Report::SIZE],
    pos: usize,
    reports_read: usize,
}

impl<R: Read> ReportReader<R> {
    /// Wrap a source positioned at a report boundary.
    pub fn new(inner: R) -> Self {
        Self { inner, report: [0u8; Report::SIZE], pos: Report::SIZE, reports_read: 0 }
    }

    /// Number of reports pulled from the source so far.
    pub fn reports_read(&self) -> usize {
        self.reports_read
    }

    /// Fill `buf` with stream bytes, pulling reports as needed.
    pub fn read_stream(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            if self.pos == Report::SIZE && !self.next_report()? {
                return Err(ProtocolError::Truncated { needed: buf.len(), received: filled });
            }

            let n = (Report::SIZE - self.pos).min(buf.len() - filled);
            buf[filled..filled + n].copy_from_slice(&self.report[self.pos..self.pos + n]);
            self.pos += n;
            filled += n;
        }
        Ok(())
    }

    /// Returns `false` when the source ends before a full report.
    fn next_report(&mut self) -> Result<bool> {
        let mut filled = 0;
        while filled < Report::SIZE {
            match self.inner.read(&mut self.report[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {},
                Err(e) => return Err(ProtocolError::Io(e)),
            }
        }

        if filled < Report::SIZE {
            if filled > 0 {
                debug!(filled, "source ended inside a report");
            }
            return Ok(false);
        }

        if self.report[0] != Report::MARKER {
            trace!(marker = self.report[0], index = self.reports_read, "unexpected report marker");
        }

        self.pos = 1;
        self.reports_read += 1;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use proptest::{collection::vec, prelude::*};

    use super::*;
    use crate::MessageType;

    fn wire(reports: &[Report]) -> Vec<u8> {
        reports.iter().flat_map(|r| r.as_bytes().iter().copied()).collect()
    }

    #[test]
    fn initialize_fits_one_report() {
        let reports = encode(&[], MessageType::Initialize.to_u16());

        assert_eq!(reports.len(), 1);
        insta::assert_snapshot!(hex::encode(&reports[0].as_bytes()[..16]), @"3f23230000000000000a000000000000");
    }

    #[test]
    fn ten_zero_bytes_produce_eighteen_byte_stream() {
        let reports = encode(&[0u8; 10], 0x0001);

        assert_eq!(reports.len(), 1);
        insta::assert_snapshot!(hex::encode(&reports[0].as_bytes()[..20]), @"3f232300010000000a0a00000000000000000000");
        // header (9) + payload[1..] (9) occupy bytes 1..=18
        assert!(reports[0].as_bytes()[19..].iter().all(|&b| b == 0));
    }

    #[test]
    fn long_payload_continues_in_next_report() {
        let payload: Vec<u8> = (0..100).collect();
        let reports = encode(&payload, 0x1234);

        assert_eq!(reports.len(), 2);
        insta::assert_snapshot!(hex::encode(&reports[0].as_bytes()[..16]), @"3f23231234000000640a010203040506");
        insta::assert_snapshot!(hex::encode(&reports[1].as_bytes()[..16]), @"3f3738393a3b3c3d3e3f404142434445");
    }

    #[test]
    fn encoding_is_deterministic() {
        let payload = b"\x0a\x05hello";
        assert_eq!(encode(payload, 7), encode(payload, 7));
    }

    #[test]
    fn decode_reads_declared_length_after_delimiter() {
        let bytes = wire(&encode(&[1, 2, 3, 4], 2));

        let message = decode(bytes.as_slice()).unwrap();
        assert_eq!(message.kind, 2);
        // declared 4, carried [2, 3, 4], the fourth byte is report padding
        assert_eq!(message.payload, vec![2, 3, 4, 0]);
    }

    #[test]
    fn decode_empty_payload() {
        let bytes = wire(&encode(&[], 0));

        let message = decode(bytes.as_slice()).unwrap();
        assert_eq!(message, Message::initialize());
    }

    #[test]
    fn decode_fails_when_stream_fills_last_report_exactly() {
        // 9 header bytes + 54 carried bytes = 63, no padding left to satisfy
        // the declared 55
        let payload = vec![0x55; 55];
        let bytes = wire(&encode(&payload, 1));
        assert_eq!(bytes.len(), Report::SIZE);

        let result = decode(bytes.as_slice());
        assert!(matches!(result, Err(ProtocolError::Truncated { needed: 55, received: 54 })));
    }

    #[test]
    fn decode_rejects_bad_magic() {
        let mut bytes = wire(&encode(&[], 0));
        bytes[1] = b'$';

        let result = decode(bytes.as_slice());
        assert!(matches!(result, Err(ProtocolError::InvalidMagic { found: [b'$', b'#'] })));
    }

    #[test]
    fn decode_empty_source_is_truncated() {
        let result = decode(&[][..]);
        assert!(matches!(result, Err(ProtocolError::Truncated { needed: 9, received: 0 })));
    }

    #[test]
    fn decode_partial_report_is_truncated() {
        let bytes = wire(&encode(&[0; 4], 3));

        let result = decode(&bytes[..40]);
        assert!(matches!(result, Err(ProtocolError::Truncated { needed: 9, received: 0 })));
    }

    #[test]
    fn decode_rejects_oversized_declaration() {
        let mut report = [0u8; Report::SIZE];
        report[0] = Report::MARKER;
        report[1..10].copy_from_slice(&WireHeader::new(3, u32::MAX).to_bytes());

        let result = decode(&report[..]);
        assert!(matches!(result, Err(ProtocolError::PayloadTooLarge { .. })));
    }

    #[test]
    fn decode_surfaces_source_errors() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "unplugged"))
            }
        }

        let result = decode(Broken);
        assert!(matches!(result, Err(ProtocolError::Io(e)) if e.kind() == io::ErrorKind::ConnectionReset));
    }

    #[test]
    fn decode_leaves_following_message_unread() {
        let mut bytes = wire(&encode(&[9, 8, 7], 2));
        bytes.extend(wire(&encode(&[], 3)));
        let mut source = bytes.as_slice();

        let first = decode(&mut source).unwrap();
        let second = decode(&mut source).unwrap();

        assert_eq!(first.kind, 2);
        assert_eq!(second.kind, 3);
        assert!(source.is_empty());
    }

    #[test]
    fn decode_accepts_reports_delivered_in_pieces() {
        struct Trickle<'a>(&'a [u8]);

        impl Read for Trickle<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                let n = buf.len().min(7).min(self.0.len());
                buf[..n].copy_from_slice(&self.0[..n]);
                self.0 = &self.0[n..];
                Ok(n)
            }
        }

        let payload: Vec<u8> = (0..200).map(|i| i as u8).collect();
        let bytes = wire(&encode(&payload, 17));

        let message = decode(Trickle(&bytes)).unwrap();
        assert_eq!(message.kind, 17);
        assert_eq!(&message.payload[..199], &payload[1..]);
    }

    proptest! {
        #[test]
        fn report_count_follows_stream_length(payload in vec(any::<u8>(), 0..600), kind in any::<u16>()) {
            let reports = encode(&payload, kind);
            let stream_len = WireHeader::SIZE + payload.len().saturating_sub(1);

            prop_assert_eq!(reports.len(), stream_len.div_ceil(Report::CHUNK_SIZE));
            for report in &reports {
                prop_assert_eq!(report.as_bytes().len(), Report::SIZE);
                prop_assert_eq!(report.marker(), Report::MARKER);
            }
        }

        #[test]
        fn decode_recovers_kind_and_shifted_payload(payload in vec(any::<u8>(), 1..600), kind in any::<u16>()) {
            let stream_len = WireHeader::SIZE + payload.len() - 1;
            prop_assume!(stream_len % Report::CHUNK_SIZE != 0);

            let bytes = wire(&encode(&payload, kind));
            let message = decode(bytes.as_slice()).unwrap();

            let mut expected = payload[1..].to_vec();
            expected.push(0);
            prop_assert_eq!(message.kind, kind);
            prop_assert_eq!(message.payload, expected);
        }
    }
}
