use thiserror::Error;

use crate::config::MAX_PAYLOAD_LEN;

/// Failure reasons for [`Manager::try_enqueue`](crate::Manager::try_enqueue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnqueueError {
    /// The stream's ring buffer is already at capacity.
    #[error("ring buffer is full")]
    RingFull,
    /// `host` did not parse as a numeric IP address (no DNS lookup is ever
    /// performed).
    #[error("host did not resolve to a numeric address")]
    UnresolvedAddress,
    /// `bytes.len()` exceeded the maximum UDP payload size.
    #[error("payload of {len} bytes exceeds the {MAX_PAYLOAD_LEN}-byte UDP limit")]
    PayloadTooLarge {
        /// The rejected payload's length.
        len: usize,
    },
    /// `shutdown` has already been requested on this manager.
    #[error("manager is shutting down")]
    ShuttingDown,
}
