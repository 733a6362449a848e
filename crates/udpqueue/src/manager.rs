use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use slab::Slab;
use tracing::trace;

use crate::clock::{Clock, SystemClock};
use crate::config::{ManagerConfig, MAX_PAYLOAD_LEN};
use crate::dispatch;
use crate::error::EnqueueError;
use crate::invariants::debug_assert_table_list_parity;
use crate::list::IntrusiveList;
use crate::scheduler::schedule_locked;
use crate::stream::StreamRecord;
use crate::table::StreamTable;
use crate::StreamKey;

/// Everything mutated while holding [`Manager`]'s state lock: the stream
/// arena, the key -> index table, the round-robin list, and the shutdown
/// flag. Grouped into one struct so a single `Mutex` guards all of it —
/// every mutation of streams, list, table, or the shutdown flag happens
/// while holding that lock.
pub(crate) struct ManagerState {
    pub(crate) arena: Slab<StreamRecord>,
    pub(crate) table: StreamTable,
    pub(crate) list: IntrusiveList,
    pub(crate) shutting_down: bool,
}

impl ManagerState {
    pub(crate) fn new() -> Self {
        Self {
            arena: Slab::new(),
            table: StreamTable::default(),
            list: IntrusiveList::new(),
            shutting_down: false,
        }
    }

    /// Creates a stream record, inserts it into the arena and table, and
    /// links it at the front of the round-robin list. Used both by
    /// `try_enqueue` and directly by scheduler unit tests.
    pub(crate) fn insert_stream(&mut self, key: StreamKey, addr: SocketAddr, ring_capacity: usize) -> usize {
        let idx = self.arena.insert(StreamRecord::new(key, addr, ring_capacity));
        self.table.insert(key, idx);
        self.list.push_front(&mut self.arena, idx);
        debug_assert_table_list_parity!(self.table.len(), self.arena.len());
        idx
    }

    /// Tears down every stream, releasing all queued packet bytes.
    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.table.clear();
        self.list = IntrusiveList::new();
    }
}

/// Owns every stream, the shared pacing configuration, and two coordination
/// locks: `state` (guards all stream bookkeeping) and `process_lock`
/// (enforces "one driver thread at a time" and gives `shutdown` a join
/// point).
pub struct Manager {
    pub(crate) state: Mutex<ManagerState>,
    pub(crate) process_lock: Mutex<()>,
    pub(crate) config: ManagerConfig,
    pub(crate) clock: Arc<dyn Clock>,
    shutdown_started: AtomicBool,
}

impl Manager {
    /// Creates a manager with a real monotonic clock. Allocates no sockets
    /// and starts no thread.
    #[must_use]
    pub fn new(config: ManagerConfig) -> Arc<Manager> {
        Self::new_with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Creates a manager with an injected [`Clock`], for deterministic
    /// tests that need to control pacing without real wall-clock waits.
    #[must_use]
    pub fn new_with_clock(config: ManagerConfig, clock: Arc<dyn Clock>) -> Arc<Manager> {
        Arc::new(Self {
            state: Mutex::new(ManagerState::new()),
            process_lock: Mutex::new(()),
            config,
            clock,
            shutdown_started: AtomicBool::new(false),
        })
    }

    /// Returns how many more packets `key`'s ring can accept right now.
    /// Returns the full configured capacity if the stream doesn't exist
    /// yet — it hasn't used any of its (not yet allocated) capacity.
    #[must_use]
    pub fn remaining(&self, key: StreamKey) -> usize {
        let state = self.state.lock().expect("manager state lock poisoned");
        match state.table.get(&key) {
            Some(&idx) => state.arena[idx].ring.remaining(),
            None => self.config.ring_capacity,
        }
    }

    /// Enqueues `bytes` for delivery to `host:port` under `key`, copying the
    /// payload. Returns `true` on success; see [`try_enqueue`](Self::try_enqueue)
    /// for the specific failure reason.
    pub fn enqueue(&self, key: StreamKey, host: &str, port: u16, bytes: &[u8]) -> bool {
        self.try_enqueue(key, host, port, bytes).is_ok()
    }

    /// Enqueues `bytes` for delivery to `host:port` under `key`, copying the
    /// payload into an owned buffer the manager now owns.
    ///
    /// `host` must be a numeric IP address literal — no DNS lookup is ever
    /// performed, matching the `AI_NUMERICHOST` hint the engine this crate
    /// descends from always passed to its resolver.
    pub fn try_enqueue(
        &self,
        key: StreamKey,
        host: &str,
        port: u16,
        bytes: &[u8],
    ) -> Result<(), EnqueueError> {
        if bytes.len() > MAX_PAYLOAD_LEN {
            return Err(EnqueueError::PayloadTooLarge { len: bytes.len() });
        }

        let mut state = self.state.lock().expect("manager state lock poisoned");

        if state.shutting_down {
            return Err(EnqueueError::ShuttingDown);
        }

        let idx = match state.table.get(&key).copied() {
            Some(idx) => idx,
            None => {
                let ip = IpAddr::from_str(host).map_err(|_| EnqueueError::UnresolvedAddress)?;
                state.insert_stream(key, SocketAddr::new(ip, port), self.config.ring_capacity)
            },
        };

        match state.arena[idx].ring.push(bytes.to_vec()) {
            Ok(()) => Ok(()),
            Err(_rejected) => Err(EnqueueError::RingFull),
        }
    }

    /// Runs the dispatch loop until [`shutdown`](Self::shutdown) is called.
    /// Opens its own IPv4 and IPv6 sockets. Blocks a second concurrent call
    /// until this one returns — callers normally invoke this from a
    /// dedicated thread via [`spawn`](Self::spawn) instead of directly.
    pub fn run(&self) {
        dispatch::run(self);
    }

    /// Convenience: spawns a dedicated OS thread running [`run`](Self::run) —
    /// the "driver thread" the rest of this crate's docs refer to.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        std::thread::spawn(move || manager.run())
    }

    /// Signals shutdown and blocks until any in-progress [`run`](Self::run)
    /// call has exited, then frees every stream and queued packet.
    ///
    /// Idempotent: safe to call more than once, and safe to race with
    /// another thread's call (only the first has any effect; the rest
    /// observe the same join point).
    pub fn shutdown(&self) {
        if self.shutdown_started.swap(true, Ordering::AcqRel) {
            // A previous call already requested shutdown; still join the
            // driver thread so this call has the same "returns only after
            // run() has exited" guarantee.
            let _joined = self.process_lock.lock().expect("process lock poisoned");
            return;
        }

        {
            let mut state = self.state.lock().expect("manager state lock poisoned");
            state.shutting_down = true;
        }

        trace!("udpqueue manager shutdown requested, waiting for driver thread");
        let _guard = self.process_lock.lock().expect("process lock poisoned");

        let mut state = self.state.lock().expect("manager state lock poisoned");
        state.clear();
        drop(state);
        // `_guard` drops here, releasing process_lock for any later,
        // racing shutdown() call to acquire (a no-op at that point).
        trace!("udpqueue manager shutdown complete");
    }

    pub(crate) fn schedule(&self, state: &mut ManagerState, now: i64) -> (Option<(Vec<u8>, SocketAddr)>, i64) {
        let interval = i64::try_from(self.config.packet_interval.as_nanos()).unwrap_or(i64::MAX);
        let threshold = i64::try_from(self.config.sleep_threshold.as_nanos()).unwrap_or(i64::MAX);
        schedule_locked(state, &*self.clock, now, interval, threshold)
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> ManagerConfig {
        ManagerConfig::new(2, Duration::from_millis(20))
    }

    #[test]
    fn remaining_returns_full_capacity_for_unknown_stream() {
        let manager = Manager::new(config());
        assert_eq!(manager.remaining(42), 2);
    }

    #[test]
    fn enqueue_then_remaining_reflects_one_fewer_slot() {
        let manager = Manager::new(config());
        assert!(manager.enqueue(1, "127.0.0.1", 9000, b"hello"));
        assert_eq!(manager.remaining(1), 1);
    }

    #[test]
    fn backpressure_rejects_beyond_capacity() {
        let manager = Manager::new(config());
        assert!(manager.enqueue(1, "127.0.0.1", 9000, b"a"));
        assert!(manager.enqueue(1, "127.0.0.1", 9000, b"b"));
        assert!(!manager.enqueue(1, "127.0.0.1", 9000, b"c"));
        assert_eq!(manager.remaining(1), 0);
    }

    #[test]
    fn non_numeric_host_fails_and_does_not_create_a_stream() {
        let manager = Manager::new(config());
        assert_eq!(
            manager.try_enqueue(7, "not-a-number", 9000, b"x"),
            Err(EnqueueError::UnresolvedAddress)
        );
        assert_eq!(manager.remaining(7), 2);
    }

    #[test]
    fn payload_over_udp_limit_is_rejected() {
        let manager = Manager::new(config());
        let huge = vec![0u8; MAX_PAYLOAD_LEN + 1];
        assert_eq!(
            manager.try_enqueue(1, "127.0.0.1", 9000, &huge),
            Err(EnqueueError::PayloadTooLarge { len: MAX_PAYLOAD_LEN + 1 })
        );
    }

    #[test]
    fn shutdown_on_fresh_manager_does_not_block() {
        let manager = Manager::new(config());
        manager.shutdown();
    }

    #[test]
    fn shutdown_is_idempotent() {
        let manager = Manager::new(config());
        manager.shutdown();
        manager.shutdown();
    }

    #[test]
    fn enqueue_after_shutdown_fails() {
        let manager = Manager::new(config());
        manager.shutdown();
        assert_eq!(
            manager.try_enqueue(1, "127.0.0.1", 9000, b"x"),
            Err(EnqueueError::ShuttingDown)
        );
    }
}
