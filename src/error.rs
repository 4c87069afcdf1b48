use thiserror::Error;

/// Error taxonomy for ring operations.
///
/// `Ok` is not a variant here — success is `Result::Ok(())` / `Result::Ok(n)`
/// from the operation itself. A write below the configured level threshold
/// is the one case that is *not* surfaced as an error: it returns
/// `Ok(())` without touching the ring (see [`crate::Logger::write_raw`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LogError {
    /// The producer could not reserve space for the entry. The caller
    /// decides whether to drop, retry later, or escalate; this is never
    /// silent.
    #[error("ring is full")]
    Full,
    /// A precondition was violated: non-power-of-two or too-small capacity,
    /// an oversized payload, a zero-capacity output buffer, or a corrupted
    /// on-ring length word.
    #[error("invalid argument: {0}")]
    Invalid(&'static str),
    /// The consumer found nothing to read.
    #[error("ring is empty")]
    Empty,
    /// The consumer found a reserved-but-unpublished slot at the read head.
    /// The entry exists but its producer hasn't finished writing it yet;
    /// retry after a short delay.
    #[error("oldest entry not yet published")]
    Busy,
}
