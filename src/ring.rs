//! The byte-oriented, lock-free MPSC ring buffer underlying [`crate::Logger`].
//!
//! The reservation/publish protocol mirrors a classic single-producer ring
//! (cached-position fast path, `Backoff`-driven CAS retry, contiguous-length
//! bookkeeping for wraparound), adapted from a per-producer SPSC-decomposition
//! design that hands each producer its own dedicated ring and so never needs
//! a shared-cursor CAS at all. This ring is genuinely contended instead: every
//! producer races to reserve space via `compare_exchange_weak` on one shared
//! `write_pos`.
//!
//! # Wire layout
//!
//! Each entry is a 12-byte header followed by its payload, padded up to a
//! 4-byte boundary:
//!
//! ```text
//! offset 0..4   total length (header + payload + padding), native-endian u32
//! offset 4..8   level, little-endian u32
//! offset 8..12  timestamp, little-endian u32
//! offset 12..   payload bytes, then zero padding to the next 4-byte boundary
//! ```
//!
//! The length word keeps the platform's native representation (it is only
//! ever read back by the same process, via an atomic load/store cast), but
//! `level` and `timestamp` are fixed little-endian so the ring's wire format
//! is interoperable across implementations on different architectures that
//! share the same backing memory.
//!
//! The length word is written *last*, with `Release` ordering, and is the
//! publication marker: a consumer that loads `0` there knows the slot is
//! reserved but not yet fully written (`LogError::Busy`). Because `capacity`
//! is a power of two `>= 16` and every reservation's advance is rounded up to
//! a multiple of 4, `write_pos` is always 4-byte aligned, so the length word
//! itself never straddles the wrap boundary — only the level/timestamp
//! fields and the payload can.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::backoff::Backoff;
use crate::error::LogError;
use crate::invariants::{
    debug_assert_aligned4, debug_assert_bounded_used, debug_assert_entry_size,
    debug_assert_read_not_past_write,
};
use crate::metrics::Metrics;

/// Size of the on-ring header: length (u32) + level (u32) + timestamp (u32).
pub(crate) const HEADER_SIZE: u32 = 12;

/// Smallest capacity this ring accepts. Below this, even a zero-length
/// payload entry (12-byte header, capacity/2 cap) cannot fit alongside the
/// one permanently-reserved byte that disambiguates full from empty.
pub(crate) const MIN_CAPACITY: u32 = 16;

/// A decoded entry returned by [`Ring::read`].
pub(crate) struct DecodedEntry {
    pub(crate) level: u32,
    pub(crate) timestamp: u32,
    /// Number of payload bytes copied into the caller's buffer. May be less
    /// than the original payload length if the caller's buffer was smaller.
    pub(crate) copied: usize,
}

/// The shared ring state. Lives behind a pointer into caller-owned memory;
/// `Ring` itself never allocates. Lifetime is enforced by `Logger<'a>`, which
/// is the only way to construct one.
pub(crate) struct Ring {
    write_pos: AtomicU32,
    read_pos: AtomicU32,
    capacity: u32,
    mask: u32,
    buffer: *mut u8,
    pub(crate) metrics: Metrics,
}

// SAFETY: all access to `buffer` goes through the atomic `write_pos`/`read_pos`
// protocol below, which partitions the buffer into regions no two callers
// ever touch concurrently without the required acquire/release pairing.
unsafe impl Send for Ring {}
unsafe impl Sync for Ring {}

impl Ring {
    /// Builds a ring over caller-provided memory. The slice length must be a
    /// power of two, at least [`MIN_CAPACITY`]. The backing memory is
    /// zeroed.
    pub(crate) fn new(backing: &mut [u8]) -> Result<Self, LogError> {
        let capacity = backing.len();
        if capacity > u32::MAX as usize {
            return Err(LogError::Invalid("backing buffer too large"));
        }
        let capacity = capacity as u32;
        if capacity < MIN_CAPACITY || !capacity.is_power_of_two() {
            return Err(LogError::Invalid(
                "backing buffer length must be a power of two, at least 16 bytes",
            ));
        }

        backing.fill(0);

        Ok(Self {
            write_pos: AtomicU32::new(0),
            read_pos: AtomicU32::new(0),
            capacity,
            mask: capacity - 1,
            buffer: backing.as_mut_ptr(),
            metrics: Metrics::new(),
        })
    }

    #[inline]
    pub(crate) fn available(&self) -> u32 {
        let read_pos = self.read_pos.load(Ordering::Acquire);
        let write_pos = self.write_pos.load(Ordering::Acquire);
        (write_pos.wrapping_sub(read_pos)) & self.mask
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.read_pos.load(Ordering::Acquire) == self.write_pos.load(Ordering::Acquire)
    }

    /// Reserves, writes and publishes one entry. `level` and `timestamp` are
    /// stored verbatim; `payload` is copied byte for byte.
    ///
    /// Returns [`LogError::Invalid`] if `HEADER_SIZE + payload.len()` exceeds
    /// `capacity / 2`, matching the original's `total_size > capacity / 2`
    /// guard (see `DESIGN.md` for why this cap is kept rather than relaxed).
    pub(crate) fn write(&self, level: u32, timestamp: u32, payload: &[u8]) -> Result<(), LogError> {
        let total_size = match HEADER_SIZE.checked_add(payload.len() as u32) {
            Some(total) => total,
            None => {
                self.metrics.inc_writes_rejected();
                return Err(LogError::Invalid("payload too large"));
            }
        };
        if total_size > self.capacity / 2 {
            self.metrics.inc_writes_rejected();
            return Err(LogError::Invalid("entry exceeds capacity/2"));
        }
        debug_assert_entry_size!(total_size, self.capacity);

        let advance_by = align_up4(total_size);
        debug_assert_aligned4!(advance_by);

        let write_pos = self.try_reserve(advance_by)?;

        // SAFETY: `try_reserve` gave us exclusive ownership of the byte
        // range `[write_pos, write_pos + advance_by)` (mod capacity) until
        // we publish by storing the length word.
        unsafe {
            self.fill_entry(write_pos, total_size, level, timestamp, payload, advance_by);
        }

        self.metrics.inc_writes_accepted();
        Ok(())
    }

    /// CAS loop over the shared `write_pos`, mirroring
    /// `unilog_write_internal`'s reservation loop. Returns the start offset
    /// of the reserved region on success.
    fn try_reserve(&self, advance_by: u32) -> Result<u32, LogError> {
        let mut backoff = Backoff::new();
        let mut write_pos = self.write_pos.load(Ordering::Acquire);
        loop {
            let read_pos = self.read_pos.load(Ordering::Acquire);
            let used = write_pos.wrapping_sub(read_pos) & self.mask;
            debug_assert_bounded_used!(used, self.capacity);
            let available_space = self.capacity - used - 1;

            if advance_by > available_space {
                self.metrics.inc_writes_dropped_full();
                return Err(LogError::Full);
            }

            let new_write_pos = (write_pos.wrapping_add(advance_by)) & self.mask;

            match self.write_pos.compare_exchange_weak(
                write_pos,
                new_write_pos,
                Ordering::Release,
                Ordering::Acquire,
            ) {
                Ok(reserved) => return Ok(reserved),
                Err(observed) => {
                    write_pos = observed;
                    self.metrics.add_reserve_retries(1);
                    backoff.spin();
                }
            }
        }
    }

    /// Writes the header and payload into the previously reserved region and
    /// publishes it by storing the length word last, with `Release`
    /// ordering.
    ///
    /// # Safety
    /// The caller must hold an exclusive reservation over
    /// `[write_pos, write_pos + advance_by)` (mod capacity), as returned by
    /// [`Self::try_reserve`].
    unsafe fn fill_entry(
        &self,
        write_pos: u32,
        total_size: u32,
        level: u32,
        timestamp: u32,
        payload: &[u8],
        advance_by: u32,
    ) {
        let mask = self.mask;
        let mut pos = (write_pos.wrapping_add(4)) & mask;
        pos = self.write_wrapping(pos, &level.to_le_bytes());
        pos = self.write_wrapping(pos, &timestamp.to_le_bytes());
        pos = self.write_wrapping(pos, payload);

        let new_write_pos = (write_pos.wrapping_add(advance_by)) & mask;
        while pos != new_write_pos {
            self.store_byte(pos, 0);
            pos = (pos.wrapping_add(1)) & mask;
        }

        // Publish: the length word is the last thing written, with Release
        // ordering, so a consumer that observes a non-zero length here is
        // guaranteed to observe every byte written above.
        self.store_length(write_pos, total_size);
    }

    /// Reads the oldest unread entry into `out`, returning its level,
    /// timestamp and the number of payload bytes copied.
    ///
    /// `out.len() == 0` truncates the payload entirely (only the header is
    /// consumed) rather than failing, generalizing the original's
    /// `buffer_size - 1` truncation logic to a zero-length buffer having no
    /// room for a trailing NUL either.
    pub(crate) fn read(&self, out: &mut [u8]) -> Result<DecodedEntry, LogError> {
        let read_pos = self.read_pos.load(Ordering::Acquire);
        let write_pos = self.write_pos.load(Ordering::Acquire);

        if read_pos == write_pos {
            self.metrics.inc_reads_empty();
            return Err(LogError::Empty);
        }

        // SAFETY: `read_pos` always points at the start of either a
        // published or in-flight reservation; the length word there is
        // always initialized (the ring is zeroed at construction and every
        // reclaimed length word is zeroed again before `read_pos` advances
        // past it).
        let total_size = self.load_length(read_pos);
        if total_size == 0 {
            self.metrics.inc_reads_busy();
            return Err(LogError::Busy);
        }
        if total_size > self.capacity / 2 || total_size < HEADER_SIZE {
            return Err(LogError::Invalid("corrupted length word"));
        }

        // Relaxed: this only needs to restore the publication-marker
        // invariant (zero means unpublished) before `read_pos` advances past
        // it; the data this slot holds has already been observed via the
        // Acquire load above, so no further ordering is needed here.
        //
        // SAFETY: see `store_length`'s alignment note; `read_pos` is always
        // 4-byte aligned.
        unsafe {
            let ptr = self.buffer.add(read_pos as usize).cast::<u32>();
            AtomicU32::from_ptr(ptr).store(0, Ordering::Relaxed);
        }

        let mask = self.mask;
        let mut pos = (read_pos.wrapping_add(4)) & mask;
        let level = self.take_wrapping_u32(&mut pos);
        let timestamp = self.take_wrapping_u32(&mut pos);

        let payload_len = (total_size - HEADER_SIZE) as usize;
        let copy_len = payload_len.min(out.len());
        for slot in out.iter_mut().take(copy_len) {
            // SAFETY: `pos` walks only within the reserved, already-decoded
            // entry this call owns exclusively as the sole consumer.
            *slot = unsafe { self.load_byte(pos) };
            self.store_byte(pos, 0);
            pos = (pos.wrapping_add(1)) & mask;
        }
        // Drain and zero any payload bytes that didn't fit in `out`.
        for _ in copy_len..payload_len {
            self.store_byte(pos, 0);
            pos = (pos.wrapping_add(1)) & mask;
        }

        let advance_by = align_up4(total_size);
        let new_read_pos = (read_pos.wrapping_add(advance_by)) & mask;
        debug_assert_read_not_past_write!(new_read_pos, write_pos, total_size);

        while pos != new_read_pos {
            self.store_byte(pos, 0);
            pos = (pos.wrapping_add(1)) & mask;
        }

        self.read_pos.store(new_read_pos, Ordering::Release);
        self.metrics.inc_reads_ok();

        Ok(DecodedEntry {
            level,
            timestamp,
            copied: copy_len,
        })
    }

    /// Writes `data` starting at `pos` (mod capacity), wrapping as needed,
    /// and returns the position one past the last byte written.
    fn write_wrapping(&self, mut pos: u32, data: &[u8]) -> u32 {
        for &byte in data {
            self.store_byte(pos, byte);
            pos = (pos.wrapping_add(1)) & self.mask;
        }
        pos
    }

    /// Reads a little-endian `u32` starting at `*pos` (mod capacity),
    /// advancing `*pos` past it and zeroing the bytes it consumes.
    fn take_wrapping_u32(&self, pos: &mut u32) -> u32 {
        let mut bytes = [0u8; 4];
        for b in &mut bytes {
            // SAFETY: see `read`'s safety note; these positions lie within
            // an entry this call exclusively owns as the sole consumer.
            *b = unsafe { self.load_byte(*pos) };
            self.store_byte(*pos, 0);
            *pos = (pos.wrapping_add(1)) & self.mask;
        }
        u32::from_le_bytes(bytes)
    }

    #[inline]
    fn store_byte(&self, pos: u32, value: u8) {
        // SAFETY: `pos < capacity` always holds (masked by `self.mask`), and
        // `buffer` points at `capacity` valid, writable bytes for the
        // lifetime of `self`.
        unsafe { self.buffer.add(pos as usize).write(value) }
    }

    /// # Safety
    /// `pos` must be `< capacity` and must not be concurrently written by
    /// another call while this read observes it.
    #[inline]
    unsafe fn load_byte(&self, pos: u32) -> u8 {
        self.buffer.add(pos as usize).read()
    }

    #[inline]
    fn store_length(&self, write_pos: u32, value: u32) {
        // SAFETY: `write_pos` is always 4-byte aligned (every reservation
        // advances by a multiple of 4 from a previously-aligned position,
        // starting at 0), so this cast is a valid `*mut u32` for a
        // same-alignment atomic access.
        unsafe {
            let ptr = self.buffer.add(write_pos as usize).cast::<u32>();
            AtomicU32::from_ptr(ptr).store(value, Ordering::Release);
        }
    }

    #[inline]
    fn load_length(&self, read_pos: u32) -> u32 {
        // SAFETY: see `store_length`.
        unsafe {
            let ptr = self.buffer.add(read_pos as usize).cast::<u32>();
            AtomicU32::from_ptr(ptr).load(Ordering::Acquire)
        }
    }
}

/// Rounds `size` up to the next multiple of 4.
#[inline]
const fn align_up4(size: u32) -> u32 {
    (size + 3) & !3
}
