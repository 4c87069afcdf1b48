//! Public façade over [`crate::ring::Ring`].
//!
//! A thin handle type wrapping the real concurrency primitive. There is only
//! one handle type because every producer shares the same ring and the same
//! entry point, rather than each registering its own dedicated sub-channel.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::LogError;
use crate::level::Level;
use crate::metrics::MetricsSnapshot;
use crate::ring::Ring;
use crate::scratch::ScratchBuffer;

/// One decoded entry returned by [`Logger::read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadEntry {
    /// Raw level value as stored by the producer. Decode with
    /// [`crate::Level::from_u32`] or format with [`crate::level_name`].
    pub level: u32,
    /// Timestamp as passed to the write call that produced this entry.
    pub timestamp: u32,
    /// Number of payload bytes copied into the caller's buffer.
    pub len: usize,
}

/// A fixed-memory, lock-free MPSC log buffer.
///
/// `Logger` borrows its backing memory for its entire lifetime: there is no
/// allocation, not at construction and not on the write or read path, which
/// is what makes it safe to call from a signal or interrupt handler (via
/// [`Logger::write_raw`] / [`Logger::write_cstring`] specifically —
/// [`Logger::write_formatted`] is not signal-safe, see its docs).
pub struct Logger<'a> {
    ring: Ring,
    min_level: AtomicU32,
    _backing: PhantomData<&'a mut [u8]>,
}

// `Ring` is `Send + Sync` and `min_level` is a plain atomic, so `Logger` is
// auto-derived as `Send + Sync` with no unsafe impl of its own needed.

impl<'a> Logger<'a> {
    /// Builds a logger over `backing`. `backing.len()` must be a power of
    /// two and at least 16 bytes. The memory is zeroed.
    pub fn new(backing: &'a mut [u8]) -> Result<Self, LogError> {
        Ok(Self {
            ring: Ring::new(backing)?,
            min_level: AtomicU32::new(Level::Trace as u32),
            _backing: PhantomData,
        })
    }

    /// Sets the minimum level that will be recorded. Pass [`Level::None`]
    /// to disable logging entirely.
    pub fn set_level(&self, level: Level) {
        self.min_level.store(level as u32, Ordering::Relaxed);
    }

    /// Current minimum level. Decodes to [`Level::Trace`] if the stored
    /// value is somehow not a known level (it always is in safe usage).
    #[must_use]
    pub fn get_level(&self) -> Level {
        Level::from_u32(self.min_level.load(Ordering::Relaxed)).unwrap_or(Level::Trace)
    }

    /// Writes a formatted message.
    ///
    /// Renders `args` into a 256-byte stack scratch buffer (truncating if
    /// it doesn't fit) before copying into the ring, exactly like the
    /// original's `vsnprintf`-into-stack-buffer strategy. Because rendering
    /// a `fmt::Arguments` can call arbitrary `Display`/`Debug` impls, this
    /// is **not** async-signal-safe; call [`Self::write_raw`] instead from
    /// a signal or interrupt handler.
    pub fn write_formatted(
        &self,
        level: Level,
        timestamp: u32,
        args: fmt::Arguments<'_>,
    ) -> Result<(), LogError> {
        if (level as u32) < self.min_level.load(Ordering::Relaxed) {
            self.ring.metrics.inc_writes_dropped_level();
            return Ok(());
        }

        let mut scratch = ScratchBuffer::new();
        fmt::Write::write_fmt(&mut scratch, args).map_err(|_| LogError::Invalid("formatting failed"))?;
        self.ring.write(level as u32, timestamp, scratch.as_bytes())
    }

    /// Writes a raw byte payload without formatting. Interrupt-safe and
    /// lock-free: performs only atomic loads/stores and byte copies.
    pub fn write_raw(&self, level: Level, timestamp: u32, payload: &[u8]) -> Result<(), LogError> {
        if (level as u32) < self.min_level.load(Ordering::Relaxed) {
            self.ring.metrics.inc_writes_dropped_level();
            return Ok(());
        }
        self.ring.write(level as u32, timestamp, payload)
    }

    /// Writes a NUL-terminated byte string, determining its length the way
    /// `strlen` would (up to, but excluding, the first `0x00` byte — or the
    /// whole slice if none is found). Interrupt-safe and lock-free.
    pub fn write_cstring(
        &self,
        level: Level,
        timestamp: u32,
        message: &[u8],
    ) -> Result<(), LogError> {
        let len = message.iter().position(|&b| b == 0).unwrap_or(message.len());
        self.write_raw(level, timestamp, &message[..len])
    }

    /// Reads the oldest unread entry's payload into `out`, returning its
    /// level, timestamp, and the number of bytes copied. If `out` is
    /// shorter than the stored payload, the payload is truncated to fit.
    pub fn read(&self, out: &mut [u8]) -> Result<ReadEntry, LogError> {
        let decoded = self.ring.read(out)?;
        Ok(ReadEntry {
            level: decoded.level,
            timestamp: decoded.timestamp,
            len: decoded.copied,
        })
    }

    /// Reads the oldest unread entry like [`Self::read`], but additionally
    /// NUL-terminates the copied payload within `out`, the way the original
    /// C API does for callers that expect a C string back. `out` must have
    /// room for at least one byte (the terminator); the payload itself is
    /// truncated to `out.len() - 1` if needed, so `out[entry.len]` is always
    /// the terminator.
    pub fn read_cstring(&self, out: &mut [u8]) -> Result<ReadEntry, LogError> {
        if out.is_empty() {
            return Err(LogError::Invalid(
                "output buffer must have room for a NUL terminator",
            ));
        }
        let last = out.len() - 1;
        let entry = self.read(&mut out[..last])?;
        out[entry.len] = 0;
        Ok(entry)
    }

    /// Number of bytes currently occupied by unread entries (including
    /// their headers and padding).
    #[must_use]
    pub fn available(&self) -> u32 {
        self.ring.available()
    }

    /// `true` if there are no unread entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Snapshot of the accumulated write/read/retry counters. Always
    /// available; the counters themselves only increment when the
    /// `metrics` feature is enabled.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.ring.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_writes_are_silently_dropped() {
        let mut backing = [0u8; 64];
        let logger = Logger::new(&mut backing).unwrap();
        logger.set_level(Level::Warn);
        logger.write_raw(Level::Info, 0, b"ignored").unwrap();
        assert!(logger.is_empty());
    }

    #[test]
    fn formatted_write_round_trips() {
        let mut backing = [0u8; 128];
        let logger = Logger::new(&mut backing).unwrap();
        logger
            .write_formatted(Level::Error, 7, format_args!("x = {}", 42))
            .unwrap();
        let mut out = [0u8; 64];
        let entry = logger.read(&mut out).unwrap();
        assert_eq!(entry.timestamp, 7);
        assert_eq!(&out[..entry.len], b"x = 42");
    }

    #[test]
    fn cstring_write_stops_at_nul() {
        let mut backing = [0u8; 64];
        let logger = Logger::new(&mut backing).unwrap();
        logger
            .write_cstring(Level::Info, 0, b"hello\0garbage")
            .unwrap();
        let mut out = [0u8; 64];
        let entry = logger.read(&mut out).unwrap();
        assert_eq!(&out[..entry.len], b"hello");
    }

    #[test]
    fn level_filter_can_be_read_back() {
        let mut backing = [0u8; 64];
        let logger = Logger::new(&mut backing).unwrap();
        logger.set_level(Level::Error);
        assert_eq!(logger.get_level(), Level::Error);
    }

    #[test]
    fn read_cstring_null_terminates() {
        let mut backing = [0u8; 64];
        let logger = Logger::new(&mut backing).unwrap();
        logger.write_raw(Level::Info, 0, b"hi").unwrap();
        let mut out = [0xffu8; 8];
        let entry = logger.read_cstring(&mut out).unwrap();
        assert_eq!(&out[..entry.len], b"hi");
        assert_eq!(out[entry.len], 0);
    }

    #[test]
    fn read_cstring_rejects_empty_buffer() {
        let mut backing = [0u8; 64];
        let logger = Logger::new(&mut backing).unwrap();
        logger.write_raw(Level::Info, 0, b"hi").unwrap();
        let mut out: [u8; 0] = [];
        assert!(logger.read_cstring(&mut out).is_err());
    }
}
