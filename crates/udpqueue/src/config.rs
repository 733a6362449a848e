use std::time::Duration;

/// Default minimum actionable sleep. Waits shorter than this are busy-skipped
/// rather than handed to the OS scheduler, since sleep jitter on most hosts
/// dwarfs anything under a couple of milliseconds.
pub const DEFAULT_SLEEP_THRESHOLD: Duration = Duration::from_micros(1_500);

/// Largest payload a single UDP datagram can carry.
pub const MAX_PAYLOAD_LEN: usize = 65_507;

/// Configuration for a [`Manager`](crate::Manager).
#[derive(Debug, Clone, Copy)]
pub struct ManagerConfig {
    /// Ring buffer size per stream (typical 500-4000).
    pub ring_capacity: usize,
    /// Target inter-packet spacing per stream.
    pub packet_interval: Duration,
    /// Minimum wait the dispatch loop will actually sleep for; shorter waits
    /// are busy-skipped to the next iteration instead.
    pub sleep_threshold: Duration,
}

impl ManagerConfig {
    /// Creates a configuration with the default sleep threshold.
    ///
    /// # Panics
    ///
    /// Panics if `ring_capacity` is zero.
    pub fn new(ring_capacity: usize, packet_interval: Duration) -> Self {
        assert!(ring_capacity > 0, "ring_capacity must be greater than zero");

        Self {
            ring_capacity,
            packet_interval,
            sleep_threshold: DEFAULT_SLEEP_THRESHOLD,
        }
    }

    /// Overrides the sleep-skip threshold.
    #[must_use]
    pub fn with_sleep_threshold(mut self, sleep_threshold: Duration) -> Self {
        self.sleep_threshold = sleep_threshold;
        self
    }
}

/// Configuration tuned for real-time audio: 2000-slot rings, 20ms pacing.
pub fn realtime_audio_config() -> ManagerConfig {
    ManagerConfig::new(2000, Duration::from_millis(20))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sleep_threshold_is_one_and_a_half_millis() {
        let config = ManagerConfig::new(10, Duration::from_millis(20));
        assert_eq!(config.sleep_threshold, Duration::from_micros(1_500));
    }

    #[test]
    #[should_panic(expected = "ring_capacity must be greater than zero")]
    fn zero_capacity_panics() {
        ManagerConfig::new(0, Duration::from_millis(20));
    }

    #[test]
    fn with_sleep_threshold_overrides_default() {
        let config = ManagerConfig::new(10, Duration::from_millis(20))
            .with_sleep_threshold(Duration::from_micros(500));
        assert_eq!(config.sleep_threshold, Duration::from_micros(500));
    }
}
