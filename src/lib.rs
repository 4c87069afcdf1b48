//! A fixed-memory, lock-free MPSC logging buffer safe for signal and
//! interrupt contexts.
//!
//! Any number of producers can call [`Logger::write_raw`] / [`Logger::write_cstring`]
//! / [`Logger::write_formatted`] concurrently, including from a signal
//! handler (for the first two — see their docs on why formatted writes are
//! the exception). Exactly one consumer calls [`Logger::read`]. No heap
//! allocation happens on either path; the backing storage is supplied by the
//! caller up front.
//!
//! This is a Rust port of the reservation/publish protocol used by
//! [unilog](https://github.com/dasisdormax/unilog), restructured around a
//! genuinely shared, contended ring rather than unilog's C structure.
//!
//! # Example
//!
//! ```
//! use ringlog::{Level, Logger};
//!
//! let mut backing = [0u8; 4096];
//! let logger = Logger::new(&mut backing).unwrap();
//!
//! logger.write_raw(Level::Info, 0, b"started up").unwrap();
//! logger
//!     .write_formatted(Level::Warn, 1, format_args!("retry {} of {}", 1, 3))
//!     .unwrap();
//!
//! let mut out = [0u8; 256];
//! let entry = logger.read(&mut out).unwrap();
//! assert_eq!(&out[..entry.len], b"started up");
//! ```

mod backoff;
mod error;
mod invariants;
mod level;
mod logger;
mod metrics;
mod ring;
mod scratch;

pub use error::LogError;
pub use level::{level_name, Level};
pub use logger::{Logger, ReadEntry};
pub use metrics::MetricsSnapshot;

/// Writes a formatted entry to `$logger` at `$level`, stamped with
/// `$timestamp`, using the same `format!`-style argument syntax as
/// `println!`.
///
/// ```
/// use ringlog::{log, Level, Logger};
///
/// let mut backing = [0u8; 256];
/// let logger = Logger::new(&mut backing).unwrap();
/// log!(logger, Level::Info, 0, "value = {}", 7).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $timestamp:expr, $($arg:tt)*) => {
        $logger.write_formatted($level, $timestamp, ::core::format_args!($($arg)*))
    };
}
