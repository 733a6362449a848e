//! Property-based tests for the invariants called out in the design
//! document: backpressure never exceeds configured capacity, and
//! `remaining()` is always `capacity - queued`.

use proptest::prelude::*;
use std::time::Duration;
use udpqueue::{Manager, ManagerConfig};

proptest! {
    /// INV-RING-01: a single stream's queued count never exceeds its
    /// configured ring capacity, no matter how many enqueues are attempted.
    #[test]
    fn prop_single_stream_never_exceeds_capacity(
        capacity in 1usize..64,
        attempts in 0usize..200,
    ) {
        let config = ManagerConfig::new(capacity, Duration::from_secs(3600));
        let manager = Manager::new(config);

        let mut accepted = 0usize;
        for i in 0..attempts {
            if manager.enqueue(1, "127.0.0.1", 9000, &[i as u8]) {
                accepted += 1;
            }
        }

        prop_assert!(accepted <= capacity,
            "accepted {} packets into a ring of capacity {}", accepted, capacity);
        prop_assert_eq!(manager.remaining(1), capacity - accepted);

        manager.shutdown();
    }
}

proptest! {
    /// Each distinct stream key gets its own independently-bounded ring;
    /// filling one stream never affects another's remaining capacity.
    #[test]
    fn prop_streams_are_independently_bounded(
        capacity in 1usize..32,
        fill_a in 0usize..40,
        fill_b in 0usize..40,
    ) {
        let config = ManagerConfig::new(capacity, Duration::from_secs(3600));
        let manager = Manager::new(config);

        let mut accepted_a = 0usize;
        for i in 0..fill_a {
            if manager.enqueue(1, "127.0.0.1", 9001, &[i as u8]) {
                accepted_a += 1;
            }
        }
        let mut accepted_b = 0usize;
        for i in 0..fill_b {
            if manager.enqueue(2, "127.0.0.1", 9002, &[i as u8]) {
                accepted_b += 1;
            }
        }

        prop_assert_eq!(manager.remaining(1), capacity - accepted_a);
        prop_assert_eq!(manager.remaining(2), capacity - accepted_b);

        manager.shutdown();
    }
}

proptest! {
    /// A payload over the UDP size limit is always rejected, and never
    /// consumes ring capacity, regardless of which stream it targets.
    #[test]
    fn prop_oversized_payload_never_consumes_capacity(
        capacity in 1usize..16,
        payload_len in 65_508usize..70_000,
    ) {
        let config = ManagerConfig::new(capacity, Duration::from_secs(3600));
        let manager = Manager::new(config);
        let payload = vec![0u8; payload_len];

        let ok = manager.enqueue(1, "127.0.0.1", 9000, &payload);

        prop_assert!(!ok);
        prop_assert_eq!(manager.remaining(1), capacity);

        manager.shutdown();
    }
}
