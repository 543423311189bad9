//! Monotonic time and blocking pauses for the cooperative loop.

use std::time::{Duration, Instant};

pub trait Clock {
    /// Microseconds since an arbitrary, fixed origin.
    fn now_us(&self) -> u64;

    /// Block the caller for roughly `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);

    fn elapsed_ms_since(&self, start_us: u64) -> u64 {
        self.now_us().saturating_sub(start_us) / 1000
    }
}

/// Wall clock backed by `std`, which ESP-IDF maps onto the high-resolution
/// timer and FreeRTOS delays.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}
