//! Stream key -> arena index lookup.
//!
//! The original C hashmap mixes keys with `key ^ (key >> 32)` before
//! bucketing. Rather than hand-rolling a chained hashmap with its own
//! resize policy, this keeps `std::collections::HashMap` (whose
//! open-addressing scheme already gives amortised O(1) insert/lookup/remove)
//! and plugs the original's exact mixing function in as a custom
//! [`std::hash::Hasher`], via `BuildHasherDefault`.

use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hasher};

use crate::StreamKey;

/// Implements the original's `key ^ (key >> 32)` mixing as a `Hasher`.
///
/// `StreamKey` is always hashed as a single `write_u64` call (`HashMap<u64,
/// _>`'s `Hash` impl for `u64` calls `write_u64` directly), so only that
/// method needs a real implementation; the generic `write` is unreachable in
/// practice but still mixes its bytes for safety.
#[derive(Default)]
pub struct KeyMixHasher(u64);

impl Hasher for KeyMixHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            self.write_u64(u64::from_ne_bytes(buf));
        }
    }

    fn write_u64(&mut self, key: u64) {
        self.0 ^= key ^ (key >> 32);
    }
}

pub type StreamTable = HashMap<StreamKey, usize, BuildHasherDefault<KeyMixHasher>>;
