//! Core scheduling algorithm: picks the next packet to send and the next
//! wake-up time, advancing per-stream deadlines as it goes.
//!
//! Invoked once per dispatch-loop iteration, while the caller holds the
//! manager's state lock. Pure with respect to everything except the passed
//! `&mut ManagerState` and the clock (no sockets, no sleeping) so it's
//! straightforward to unit-test with a [`MockClock`](crate::clock::MockClock).

use std::net::SocketAddr;

use crate::clock::Clock;
use crate::invariants::debug_assert_due_time_monotonic;
use crate::manager::ManagerState;

/// A packet ready to go out, paired with its destination.
pub(crate) type ScheduledPacket = (Vec<u8>, SocketAddr);

/// One pass of the scheduler: returns the packet to send (if any) and the
/// nanosecond time the dispatch loop should next wake up at.
///
/// Peeks the front of the list, drops it if its ring just drained, waits
/// without rotating if it's more than `sleep_threshold` early, otherwise
/// pops a packet, rotates the stream to the back, and advances (or
/// resyncs) its deadline.
pub(crate) fn schedule_locked(
    state: &mut ManagerState,
    clock: &dyn Clock,
    now: i64,
    packet_interval: i64,
    sleep_threshold: i64,
) -> (Option<ScheduledPacket>, i64) {
    loop {
        let Some(front) = state.list.peek_front() else {
            return (None, now + packet_interval);
        };

        if state.arena[front].ring.is_empty() {
            let key = state.arena[front].key;
            state.list.remove(&mut state.arena, front);
            state.table.remove(&key);
            state.arena.remove(front);
            continue;
        }

        let due_time = state.arena[front].next_due_time;
        if due_time == 0 {
            state.arena[front].next_due_time = now;
        } else if due_time - now >= sleep_threshold {
            return (None, due_time);
        }

        let packet = state.arena[front]
            .ring
            .pop()
            .expect("ring was just confirmed non-empty");
        let addr = state.arena[front].addr;

        state.list.move_to_back(&mut state.arena, front);

        let resync_point = clock.now_nanos();
        let old_due = state.arena[front].next_due_time;
        let new_due = if resync_point - old_due >= 2 * packet_interval {
            resync_point + packet_interval
        } else {
            old_due + packet_interval
        };
        debug_assert_due_time_monotonic!(old_due, new_due);
        state.arena[front].next_due_time = new_due;

        let target = next_target_time(state, resync_point, packet_interval);
        return (Some((packet, addr)), target);
    }
}

/// Re-peeks the front of the list and returns either its deadline or
/// `now + packet_interval` if the list is empty.
fn next_target_time(state: &ManagerState, now: i64, packet_interval: i64) -> i64 {
    match state.list.peek_front() {
        Some(idx) => state.arena[idx].next_due_time,
        None => now + packet_interval,
    }
}
