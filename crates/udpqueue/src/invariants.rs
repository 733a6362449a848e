//! Debug assertion macros for manager invariants.
//!
//! These are only active in debug builds (`#[cfg(debug_assertions)]`), so
//! there is zero overhead in release. Mirrors the macro style of
//! `crates/ringmpsc/src/invariants.rs` in the crate this one is descended
//! from, retargeted at this crate's scheduler/ring/list invariants instead
//! of lock-free sequence numbers.

// =============================================================================
// INV-RING-01: Bounded Count
// =============================================================================

/// Assert that a ring's live count never exceeds its capacity.
///
/// **Invariant**: `0 <= size <= capacity`
macro_rules! debug_assert_ring_bounded {
    ($size:expr, $capacity:expr) => {
        debug_assert!(
            $size <= $capacity,
            "INV-RING-01 violated: ring size {} exceeds capacity {}",
            $size,
            $capacity
        )
    };
}

// =============================================================================
// INV-LIST-01: Table/list cardinality match
// =============================================================================

/// Assert that the stream table and stream list agree on how many streams
/// are live.
///
/// **Invariant**: every key in the table has exactly one node in the list.
macro_rules! debug_assert_table_list_parity {
    ($table_len:expr, $list_len:expr) => {
        debug_assert_eq!(
            $table_len, $list_len,
            "INV-LIST-01 violated: table has {} entries but list has {}",
            $table_len, $list_len
        )
    };
}

// =============================================================================
// INV-SCHED-01: Monotonic next_due_time advancement
// =============================================================================

/// Assert that a stream's `next_due_time` only moves forward across a
/// dispatch.
///
/// **Invariant**: `new_due_time >= old_due_time` once a stream has been
/// scheduled at least once (`old_due_time != 0`).
macro_rules! debug_assert_due_time_monotonic {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $old == 0 || $new >= $old,
            "INV-SCHED-01 violated: next_due_time went from {} to {}",
            $old,
            $new
        )
    };
}

pub(crate) use debug_assert_due_time_monotonic;
pub(crate) use debug_assert_ring_bounded;
pub(crate) use debug_assert_table_list_parity;
