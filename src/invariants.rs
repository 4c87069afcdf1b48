//! Debug assertion macros for ring buffer invariants.
//!
//! These macros provide runtime checks for the ring's core invariants: bounded
//! used space, entry size bounds, 4-byte header alignment, and monotonic read
//! progress. They are only active in debug builds
//! (`#[cfg(debug_assertions)]`), so there is zero overhead in release builds.

// =============================================================================
// INV-SEQ-01: Bounded Used Space
// =============================================================================

/// Assert that used space never exceeds `capacity - 1`.
///
/// **Invariant**: `write_pos - read_pos (mod C) <= C - 1`. One byte is
/// permanently unused so `write_pos == read_pos` unambiguously means empty.
///
/// Used in: `Ring::try_reserve()` after computing the prospective new used space.
macro_rules! debug_assert_bounded_used {
    ($used:expr, $capacity:expr) => {
        debug_assert!(
            $used <= $capacity - 1,
            "INV-SEQ-01 violated: used {} exceeds capacity-1 {}",
            $used,
            $capacity - 1
        )
    };
}

// =============================================================================
// INV-ENTRY-01: Entry Size Bounds
// =============================================================================

/// Assert a total entry size (header + payload) respects the `C/2` cap and
/// the 12-byte header minimum.
///
/// Used in: `Ring::try_reserve()` before reserving, `Ring::read()` after
/// loading a stored length.
macro_rules! debug_assert_entry_size {
    ($total:expr, $capacity:expr) => {
        debug_assert!(
            $total >= 12 && $total <= $capacity / 2,
            "INV-ENTRY-01 violated: total size {} outside [12, {}]",
            $total,
            $capacity / 2
        )
    };
}

// =============================================================================
// INV-ENTRY-02: 4-byte Alignment
// =============================================================================

/// Assert a reservation advance is 4-byte aligned, which keeps every future
/// entry's length word naturally aligned for atomic access and guarantees it
/// never straddles the wrap boundary.
///
/// Used in: `Ring::try_reserve()` after computing `advance`.
macro_rules! debug_assert_aligned4 {
    ($value:expr) => {
        debug_assert!(
            $value % 4 == 0,
            "INV-ENTRY-02 violated: {} is not 4-byte aligned",
            $value
        )
    };
}

// =============================================================================
// INV-SEQ-02: Monotonic Progress
// =============================================================================

/// Assert that `read_pos` never advances past `write_pos` within one lap.
///
/// Used in: `Ring::read()` before storing the new `read_pos`.
macro_rules! debug_assert_read_not_past_write {
    ($new_read:expr, $write:expr, $used_before:expr) => {
        debug_assert!(
            $used_before > 0,
            "INV-SEQ-02 violated: advancing read_pos to {} with nothing published (write_pos {})",
            $new_read,
            $write
        )
    };
}

pub(crate) use debug_assert_aligned4;
pub(crate) use debug_assert_bounded_used;
pub(crate) use debug_assert_entry_size;
pub(crate) use debug_assert_read_not_past_write;
