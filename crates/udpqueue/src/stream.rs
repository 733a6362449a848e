use std::net::SocketAddr;

use crate::ring::PacketRing;
use crate::StreamKey;

/// One logical outbound flow: a destination address, its packet ring, and
/// the round-robin scheduling state.
///
/// `prev`/`next` are slab indices rather than pointers (see the crate's
/// design notes on why an arena of stable indices replaces the original's
/// intrusive pointer list).
#[derive(Debug)]
pub struct StreamRecord {
    pub key: StreamKey,
    pub addr: SocketAddr,
    pub ring: PacketRing,
    /// Nanosecond deadline for this stream's next send. Zero means "not yet
    /// scheduled".
    pub next_due_time: i64,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

impl StreamRecord {
    pub fn new(key: StreamKey, addr: SocketAddr, ring_capacity: usize) -> Self {
        Self {
            key,
            addr,
            ring: PacketRing::new(ring_capacity),
            next_due_time: 0,
            prev: None,
            next: None,
        }
    }
}
