//! Fixed-capacity per-stream packet ring.
//!
//! Unlike `crates/ringmpsc`'s lock-free SPSC ring this one is protected
//! externally by the manager's mutex, so there's no atomics here at all —
//! just a plain circular buffer over `Box<[Option<Vec<u8>>]>`. Capacity is
//! fixed at construction and never grows; a full ring rejects new pushes
//! instead of reallocating.

use crate::invariants::debug_assert_ring_bounded;

/// A fixed-capacity FIFO of owned packet payloads.
#[derive(Debug)]
pub struct PacketRing {
    slots: Box<[Option<Vec<u8>>]>,
    head: usize,
    size: usize,
}

impl PacketRing {
    /// Creates a ring able to hold `capacity` packets.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be greater than zero");
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            size: 0,
        }
    }

    /// Total capacity, fixed at construction.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of packets currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// True if no packets are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Free slots remaining.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.size
    }

    /// Appends `packet` to the back of the ring.
    ///
    /// Returns `Ok(())` on success. On failure, the ring is full and the
    /// packet is handed back to the caller inside `Err` instead of being
    /// silently dropped.
    pub fn push(&mut self, packet: Vec<u8>) -> Result<(), Vec<u8>> {
        if self.size >= self.capacity() {
            return Err(packet);
        }

        let index = (self.head + self.size) % self.capacity();
        self.slots[index] = Some(packet);
        self.size += 1;
        debug_assert_ring_bounded!(self.size, self.capacity());
        Ok(())
    }

    /// Removes and returns the packet at the front of the ring, if any.
    pub fn pop(&mut self) -> Option<Vec<u8>> {
        if self.size == 0 {
            return None;
        }

        let packet = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.size -= 1;
        debug_assert_ring_bounded!(self.size, self.capacity());
        packet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_preserves_fifo_order() {
        let mut ring = PacketRing::new(4);
        assert!(ring.push(vec![1]).is_ok());
        assert!(ring.push(vec![2]).is_ok());
        assert!(ring.push(vec![3]).is_ok());

        assert_eq!(ring.pop(), Some(vec![1]));
        assert_eq!(ring.pop(), Some(vec![2]));
        assert_eq!(ring.pop(), Some(vec![3]));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn push_fails_when_full_and_returns_the_packet() {
        let mut ring = PacketRing::new(2);
        assert!(ring.push(vec![1]).is_ok());
        assert!(ring.push(vec![2]).is_ok());

        let rejected = ring.push(vec![3]);
        assert_eq!(rejected, Err(vec![3]));
        assert_eq!(ring.remaining(), 0);
    }

    #[test]
    fn wraps_around_after_pops_and_pushes() {
        let mut ring = PacketRing::new(2);
        assert!(ring.push(vec![1]).is_ok());
        assert!(ring.push(vec![2]).is_ok());
        assert_eq!(ring.pop(), Some(vec![1]));
        assert!(ring.push(vec![3]).is_ok());

        assert_eq!(ring.pop(), Some(vec![2]));
        assert_eq!(ring.pop(), Some(vec![3]));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn remaining_tracks_capacity_minus_size() {
        let mut ring = PacketRing::new(3);
        assert_eq!(ring.remaining(), 3);
        ring.push(vec![1]).unwrap();
        assert_eq!(ring.remaining(), 2);
        ring.pop();
        assert_eq!(ring.remaining(), 3);
    }

    #[test]
    #[should_panic(expected = "ring capacity must be greater than zero")]
    fn zero_capacity_panics() {
        PacketRing::new(0);
    }
}
