//! Scripted in-memory device.

use std::{
    collections::VecDeque,
    io::{self, Read, Write},
    sync::{Arc, Mutex},
};

use hwframe_core::{Device, Message, Report};

use crate::lock;

#[derive(Debug, Default)]
struct DeviceState {
    written: Vec<u8>,
    writes: usize,
    fail_write_at: Option<usize>,
    reply: VecDeque<u8>,
    reads: usize,
    fail_close: bool,
    closed: bool,
}

/// Device that records writes and replays scripted reply bytes.
///
/// Reads drain the scripted reply and return end of stream once it is
/// exhausted. The paired [`DeviceProbe`] observes the same state after the
/// device has been moved into the code under test.
#[derive(Debug)]
pub struct SimDevice {
    state: Arc<Mutex<DeviceState>>,
}

/// Observer for a [`SimDevice`].
#[derive(Debug, Clone)]
pub struct DeviceProbe {
    state: Arc<Mutex<DeviceState>>,
}

impl SimDevice {
    /// Device with no scripted reply, plus its probe.
    pub fn new() -> (Self, DeviceProbe) {
        let state = Arc::new(Mutex::new(DeviceState::default()));
        (Self { state: Arc::clone(&state) }, DeviceProbe { state })
    }

    /// Queue `message` as the device's reply, encoded into reports.
    #[must_use]
    pub fn with_reply(self, message: &Message) -> Self {
        {
            let mut state = lock(&self.state);
            for report in message.to_reports() {
                state.reply.extend(report.as_bytes());
            }
        }
        self
    }

    /// Queue raw bytes as the device's reply.
    #[must_use]
    pub fn with_raw_reply(self, bytes: &[u8]) -> Self {
        lock(&self.state).reply.extend(bytes);
        self
    }

    /// Fail the `index`th write call (zero-based) and every one after it.
    #[must_use]
    pub fn failing_write_at(self, index: usize) -> Self {
        lock(&self.state).fail_write_at = Some(index);
        self
    }

    /// Make `close` return an error. The device still counts as closed.
    #[must_use]
    pub fn failing_close(self) -> Self {
        lock(&self.state).fail_close = true;
        self
    }
}

impl Read for SimDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = lock(&self.state);
        state.reads += 1;

        let n = buf.len().min(state.reply.len());
        for (slot, byte) in buf.iter_mut().zip(state.reply.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for SimDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = lock(&self.state);
        if state.fail_write_at.is_some_and(|at| state.writes >= at) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "simulated write failure"));
        }

        state.writes += 1;
        state.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Device for SimDevice {
    fn close(self: Box<Self>) -> io::Result<()> {
        let mut state = lock(&self.state);
        state.closed = true;
        if state.fail_close {
            return Err(io::Error::other("simulated close failure"));
        }
        Ok(())
    }
}

impl DeviceProbe {
    /// Every byte written so far.
    pub fn written(&self) -> Vec<u8> {
        lock(&self.state).written.clone()
    }

    /// Written bytes split into reports. A trailing partial report is dropped.
    pub fn reports(&self) -> Vec<Report> {
        let state = lock(&self.state);
        state
            .written
            .chunks_exact(Report::SIZE)
            .filter_map(|chunk| <[u8; Report::SIZE]>::try_from(chunk).ok())
            .map(Report::from_bytes)
            .collect()
    }

    /// Number of successful write calls.
    pub fn writes(&self) -> usize {
        lock(&self.state).writes
    }

    /// Number of read calls, including ones that hit end of stream.
    pub fn reads(&self) -> usize {
        lock(&self.state).reads
    }

    /// Scripted reply bytes not yet read.
    pub fn unread(&self) -> usize {
        lock(&self.state).reply.len()
    }

    /// Whether `close` was called.
    pub fn closed(&self) -> bool {
        lock(&self.state).closed
    }
}
