//! Injectable monotonic clock.
//!
//! The dispatch loop (`dispatch.rs`) and the scheduler (`scheduler.rs`) never
//! call `Instant::now()` or `thread::sleep` directly — they go through a
//! [`Clock`] so that tests can replace wall-clock time with a [`MockClock`]
//! that advances deterministically. Modelled on the `Clock`/`MockClock` split
//! in `spark-core`'s `time/clock.rs`, simplified to the synchronous,
//! thread-blocking style this crate uses instead of async futures.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A source of monotonic time and a blocking sleep primitive.
///
/// Implementations must guarantee `now_nanos` is monotonically
/// non-decreasing and that `sleep_nanos` blocks the calling thread for at
/// least the requested duration.
pub trait Clock: Send + Sync {
    /// Current time in nanoseconds, relative to an arbitrary but fixed origin.
    fn now_nanos(&self) -> i64;

    /// Blocks the calling thread for approximately `nanos` nanoseconds.
    fn sleep_nanos(&self, nanos: i64);
}

/// Real monotonic clock, backed by [`std::time::Instant`].
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is the current instant.
    #[must_use]
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
    fn now_nanos(&self) -> i64 {
        i64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(i64::MAX)
    }

    fn sleep_nanos(&self, nanos: i64) {
        if nanos > 0 {
            std::thread::sleep(Duration::from_nanos(nanos.unsigned_abs()));
        }
    }
}

/// Deterministic clock for tests: time only moves when [`MockClock::advance`]
/// is called, and `sleep_nanos` does not block the calling thread at all (the
/// test drives time itself, so a real sleep would just slow the test down
/// without adding coverage).
#[derive(Debug, Default)]
pub struct MockClock {
    now: Mutex<i64>,
}

impl MockClock {
    /// Creates a clock starting at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self { now: Mutex::new(0) }
    }

    /// Advances the clock by `nanos` (must be non-negative).
    pub fn advance(&self, nanos: i64) {
        let mut guard = self.now.lock().expect("mock clock lock poisoned");
        *guard += nanos;
    }

    /// Sets the clock to an absolute nanosecond value.
    pub fn set(&self, nanos: i64) {
        let mut guard = self.now.lock().expect("mock clock lock poisoned");
        *guard = nanos;
    }
}

impl Clock for MockClock {
    fn now_nanos(&self) -> i64 {
        *self.now.lock().expect("mock clock lock poisoned")
    }

    fn sleep_nanos(&self, _nanos: i64) {
        // Tests advance the mock clock explicitly; a real sleep here would
        // only add wall-clock latency without changing observed behavior.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now_nanos();
        std::thread::sleep(Duration::from_millis(1));
        let second = clock.now_nanos();
        assert!(second >= first);
    }

    #[test]
    fn mock_clock_advances_deterministically() {
        let clock = MockClock::new();
        assert_eq!(clock.now_nanos(), 0);
        clock.advance(1_000);
        assert_eq!(clock.now_nanos(), 1_000);
        clock.advance(500);
        assert_eq!(clock.now_nanos(), 1_500);
    }

    #[test]
    fn mock_clock_sleep_does_not_advance_time() {
        let clock = MockClock::new();
        clock.sleep_nanos(1_000_000);
        assert_eq!(clock.now_nanos(), 0);
    }
}
