//! The background dispatch loop: clock-synchronised send/sleep cycle plus
//! shutdown coordination via `process_lock`.
//!
//! Grounded on `serenity-rs-songbird`'s `src/driver/tasks/udp_tx.rs` — the
//! pack's closest analog to "a background thread pacing outbound UDP sends"
//! — for the logging density (one `trace!` at start/stop, one on a
//! discarded send error) even though that crate is async and this one is
//! synchronous.

use std::net::{SocketAddr, UdpSocket};

use tracing::{instrument, trace};

use crate::manager::Manager;

#[instrument(skip(manager))]
pub(crate) fn run(manager: &Manager) {
    let socket_v4 = match UdpSocket::bind("0.0.0.0:0") {
        Ok(socket) => socket,
        Err(e) => {
            trace!("udpqueue failed to open IPv4 dispatch socket: {e}");
            return;
        },
    };
    let socket_v6 = match UdpSocket::bind("[::]:0") {
        Ok(socket) => socket,
        Err(e) => {
            trace!("udpqueue failed to open IPv6 dispatch socket: {e}");
            return;
        },
    };

    // Enforces "at most one driver thread per manager"; a second concurrent
    // call blocks here until the first releases the lock by returning.
    let _process_guard = manager.process_lock.lock().expect("process lock poisoned");

    trace!("udpqueue dispatch loop started");

    loop {
        let mut state = manager.state.lock().expect("manager state lock poisoned");
        if state.shutting_down {
            break;
        }

        let now = manager.clock.now_nanos();
        let (packet, target) = manager.schedule(&mut *state, now);
        drop(state);

        let mut now = now;
        if let Some((bytes, addr)) = packet {
            let socket = match addr {
                SocketAddr::V4(_) => &socket_v4,
                SocketAddr::V6(_) => &socket_v6,
            };
            // Best-effort by design: UDP send failures are not retried and
            // must not stall the pacing loop.
            if let Err(e) = socket.send_to(&bytes, addr) {
                trace!("udpqueue discarded a send failure to {addr}: {e}");
            }
            now = manager.clock.now_nanos();
        }

        let wait = target - now;
        let threshold = i64::try_from(manager.config.sleep_threshold.as_nanos()).unwrap_or(i64::MAX);
        if wait >= threshold {
            manager.clock.sleep_nanos(wait);
        }
    }

    trace!("udpqueue dispatch loop stopped");
}
