//! Environment abstraction.
//!
//! Retry backoff goes through [`Environment::sleep`] instead of calling
//! `std::thread::sleep` directly, so tests can record the delays without
//! waiting for them.

use std::time::{Duration, Instant};

/// Source of time for blocking device operations.
pub trait Environment {
    /// Current time.
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Real clock and real sleeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}
