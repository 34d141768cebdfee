//! Virtual clock.

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use hwframe_core::Environment;

use crate::lock;

#[derive(Debug)]
struct Clock {
    start: Instant,
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

/// Environment whose `sleep` advances virtual time instantly and records the
/// requested duration.
#[derive(Debug, Clone)]
pub struct SimEnv {
    clock: Arc<Mutex<Clock>>,
}

impl SimEnv {
    /// Clock starting now with nothing slept.
    pub fn new() -> Self {
        let clock = Clock { start: Instant::now(), elapsed: Duration::ZERO, sleeps: Vec::new() };
        Self { clock: Arc::new(Mutex::new(clock)) }
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        lock(&self.clock).sleeps.clone()
    }

    /// Total virtual time slept.
    pub fn elapsed(&self) -> Duration {
        lock(&self.clock).elapsed
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SimEnv {
    fn now(&self) -> Instant {
        let clock = lock(&self.clock);
        clock.start + clock.elapsed
    }

    fn sleep(&self, duration: Duration) {
        let mut clock = lock(&self.clock);
        clock.elapsed += duration;
        clock.sleeps.push(duration);
    }
}
