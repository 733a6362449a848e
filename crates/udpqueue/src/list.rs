//! Intrusive doubly-linked list over arena indices.
//!
//! The original C implementation embeds `prev`/`next` pointers directly in
//! each stream record and requires those records to live at a stable
//! address for as long as they're linked. This port keeps the "intrusive"
//! part — the links live inside [`StreamRecord`] itself, not in a separate
//! collection — but replaces pointers with `slab` indices, which stay valid
//! across insertions without any unsafe code or pinning.

use slab::Slab;

use crate::stream::StreamRecord;

/// Head/tail of the round-robin ordering. The list itself holds no data;
/// all linkage lives in the `prev`/`next` fields of the addressed
/// [`StreamRecord`]s.
#[derive(Debug, Default)]
pub struct IntrusiveList {
    head: Option<usize>,
    tail: Option<usize>,
}

impl IntrusiveList {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next candidate for scheduling, if any stream is linked.
    pub fn peek_front(&self) -> Option<usize> {
        self.head
    }

    /// Links `idx` at the front of the list (new streams are tried first).
    pub fn push_front(&mut self, arena: &mut Slab<StreamRecord>, idx: usize) {
        arena[idx].prev = None;
        arena[idx].next = self.head;

        if let Some(old_head) = self.head {
            arena[old_head].prev = Some(idx);
        } else {
            self.tail = Some(idx);
        }

        self.head = Some(idx);
    }

    /// Links `idx` at the back of the list.
    pub fn push_back(&mut self, arena: &mut Slab<StreamRecord>, idx: usize) {
        arena[idx].next = None;
        arena[idx].prev = self.tail;

        if let Some(old_tail) = self.tail {
            arena[old_tail].next = Some(idx);
        } else {
            self.head = Some(idx);
        }

        self.tail = Some(idx);
    }

    /// Unlinks `idx` from wherever it currently sits. Does not touch the
    /// arena slot itself, only its `prev`/`next` fields and the head/tail
    /// pointers.
    pub fn remove(&mut self, arena: &mut Slab<StreamRecord>, idx: usize) {
        let (prev, next) = {
            let record = &arena[idx];
            (record.prev, record.next)
        };

        match prev {
            Some(p) => arena[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => arena[n].prev = prev,
            None => self.tail = prev,
        }

        arena[idx].prev = None;
        arena[idx].next = None;
    }

    /// Removes `idx` from its current position and re-links it at the back
    /// in one step — the "rotate after a successful dispatch" operation.
    pub fn move_to_back(&mut self, arena: &mut Slab<StreamRecord>, idx: usize) {
        self.remove(arena, idx);
        self.push_back(arena, idx);
    }
}
