//! Atomic counters tracked alongside the ring, gated behind the `metrics`
//! feature so a build that doesn't want the extra stores can drop them for
//! free.
//!
//! A plain struct of relaxed atomics updated inline on the hot path, with a
//! `snapshot()` that materializes a plain-data view for reporting.

use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for a [`crate::Logger`], updated with `Ordering::Relaxed`
/// stores on the hot path. Counters, not a ledger: they never block a writer
/// or reader and carry no correctness meaning of their own.
#[derive(Debug, Default)]
pub(crate) struct Metrics {
    writes_accepted: AtomicU64,
    writes_dropped_full: AtomicU64,
    writes_dropped_level: AtomicU64,
    writes_rejected: AtomicU64,
    reads_ok: AtomicU64,
    reads_busy: AtomicU64,
    reads_empty: AtomicU64,
    reserve_retries: AtomicU64,
}

impl Metrics {
    pub(crate) const fn new() -> Self {
        Self {
            writes_accepted: AtomicU64::new(0),
            writes_dropped_full: AtomicU64::new(0),
            writes_dropped_level: AtomicU64::new(0),
            writes_rejected: AtomicU64::new(0),
            reads_ok: AtomicU64::new(0),
            reads_busy: AtomicU64::new(0),
            reads_empty: AtomicU64::new(0),
            reserve_retries: AtomicU64::new(0),
        }
    }

    #[cfg(feature = "metrics")]
    #[inline]
    pub(crate) fn inc_writes_accepted(&self) {
        self.writes_accepted.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(not(feature = "metrics"))]
    #[inline]
    pub(crate) fn inc_writes_accepted(&self) {}

    #[cfg(feature = "metrics")]
    #[inline]
    pub(crate) fn inc_writes_dropped_full(&self) {
        self.writes_dropped_full.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(not(feature = "metrics"))]
    #[inline]
    pub(crate) fn inc_writes_dropped_full(&self) {}

    #[cfg(feature = "metrics")]
    #[inline]
    pub(crate) fn inc_writes_dropped_level(&self) {
        self.writes_dropped_level.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(not(feature = "metrics"))]
    #[inline]
    pub(crate) fn inc_writes_dropped_level(&self) {}

    #[cfg(feature = "metrics")]
    #[inline]
    pub(crate) fn inc_writes_rejected(&self) {
        self.writes_rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(not(feature = "metrics"))]
    #[inline]
    pub(crate) fn inc_writes_rejected(&self) {}

    #[cfg(feature = "metrics")]
    #[inline]
    pub(crate) fn inc_reads_ok(&self) {
        self.reads_ok.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(not(feature = "metrics"))]
    #[inline]
    pub(crate) fn inc_reads_ok(&self) {}

    #[cfg(feature = "metrics")]
    #[inline]
    pub(crate) fn inc_reads_busy(&self) {
        self.reads_busy.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(not(feature = "metrics"))]
    #[inline]
    pub(crate) fn inc_reads_busy(&self) {}

    #[cfg(feature = "metrics")]
    #[inline]
    pub(crate) fn inc_reads_empty(&self) {
        self.reads_empty.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(not(feature = "metrics"))]
    #[inline]
    pub(crate) fn inc_reads_empty(&self) {}

    #[cfg(feature = "metrics")]
    #[inline]
    pub(crate) fn add_reserve_retries(&self, n: u64) {
        self.reserve_retries.fetch_add(n, Ordering::Relaxed);
    }

    #[cfg(not(feature = "metrics"))]
    #[inline]
    pub(crate) fn add_reserve_retries(&self, _n: u64) {}

    /// Snapshot the current counter values. Each load is independent and
    /// `Relaxed`; the result is a best-effort point-in-time view, not a
    /// consistent transaction.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            writes_accepted: self.writes_accepted.load(Ordering::Relaxed),
            writes_dropped_full: self.writes_dropped_full.load(Ordering::Relaxed),
            writes_dropped_level: self.writes_dropped_level.load(Ordering::Relaxed),
            writes_rejected: self.writes_rejected.load(Ordering::Relaxed),
            reads_ok: self.reads_ok.load(Ordering::Relaxed),
            reads_busy: self.reads_busy.load(Ordering::Relaxed),
            reads_empty: self.reads_empty.load(Ordering::Relaxed),
            reserve_retries: self.reserve_retries.load(Ordering::Relaxed),
        }
    }
}

/// Plain-data snapshot returned by [`Metrics::snapshot`] / [`crate::Logger::metrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub writes_accepted: u64,
    pub writes_dropped_full: u64,
    pub writes_dropped_level: u64,
    pub writes_rejected: u64,
    pub reads_ok: u64,
    pub reads_busy: u64,
    pub reads_empty: u64,
    pub reserve_retries: u64,
}
