//! Fixed-size stack formatter used only by [`crate::Logger::write_formatted`].
//!
//! This renders printf-style formatting into a scratch area: a 256-byte stack
//! buffer that a `fmt::Arguments` is rendered into, truncating silently to
//! 255 usable bytes (one byte of headroom mirrors `vsnprintf`'s reserved NUL
//! slot) if the formatted text doesn't fit. Unlike
//! `write_raw`/`write_cstring`, rendering through `fmt::Write` can call
//! arbitrary `Display`/`Debug` impls, so this path is **not** async-signal-safe
//! and must not be used from a signal or interrupt handler.

use std::fmt;

const SCRATCH_CAPACITY: usize = 256;

/// A `fmt::Write` sink over a fixed-size, stack-allocated byte array.
///
/// Writes past the buffer's capacity are silently truncated rather than
/// reported as an error — matching the C source's `vsnprintf`-style
/// truncation-and-continue behavior rather than aborting the format call.
pub(crate) struct ScratchBuffer {
    bytes: [u8; SCRATCH_CAPACITY],
    len: usize,
}

impl ScratchBuffer {
    pub(crate) fn new() -> Self {
        Self {
            bytes: [0u8; SCRATCH_CAPACITY],
            len: 0,
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl fmt::Write for ScratchBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let remaining = (SCRATCH_CAPACITY - 1).saturating_sub(self.len);
        let take = remaining.min(s.len());
        self.bytes[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    #[test]
    fn renders_short_message() {
        let mut scratch = ScratchBuffer::new();
        write!(scratch, "hello {}", 42).unwrap();
        assert_eq!(scratch.as_bytes(), b"hello 42");
    }

    #[test]
    fn truncates_when_oversized() {
        let mut scratch = ScratchBuffer::new();
        let long = "x".repeat(500);
        write!(scratch, "{long}").unwrap();
        assert_eq!(scratch.as_bytes().len(), SCRATCH_CAPACITY - 1);
    }
}
