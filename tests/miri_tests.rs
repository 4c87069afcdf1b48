//! Miri-compatible tests for the unsafe byte-level code in `src/ring.rs`.
//!
//! Run with: `cargo +nightly miri test --test miri_tests`
//!
//! Exercises the raw-pointer reads/writes, the length-word atomic cast, and
//! the wrap-around copy paths for undefined behavior: out-of-bounds access,
//! invalid alignment, and use of uninitialized memory.

use ringlog::{Level, Logger};

#[test]
fn miri_basic_write_read() {
    let mut backing = [0u8; 32];
    let logger = Logger::new(&mut backing).unwrap();
    logger.write_raw(Level::Info, 1, b"hi").unwrap();
    let mut out = [0u8; 16];
    let entry = logger.read(&mut out).unwrap();
    assert_eq!(&out[..entry.len], b"hi");
}

#[test]
fn miri_wrap_around_exercises_boundary_copy() {
    let mut backing = [0u8; 32];
    let logger = Logger::new(&mut backing).unwrap();
    let mut out = [0u8; 16];

    for round in 0u32..5 {
        let mut sent = 0;
        loop {
            match logger.write_raw(Level::Info, round, b"abcd") {
                Ok(()) => sent += 1,
                Err(_) => break,
            }
        }
        for _ in 0..sent {
            let entry = logger.read(&mut out).unwrap();
            assert_eq!(&out[..entry.len], b"abcd");
        }
    }
}

#[test]
fn miri_zero_length_output_buffer() {
    let mut backing = [0u8; 32];
    let logger = Logger::new(&mut backing).unwrap();
    logger.write_raw(Level::Info, 0, b"payload").unwrap();
    let mut out: [u8; 0] = [];
    let entry = logger.read(&mut out).unwrap();
    assert_eq!(entry.len, 0);
    assert!(logger.is_empty());
}

#[test]
fn miri_full_width_payload_at_capacity_half() {
    let mut backing = [0u8; 32];
    let logger = Logger::new(&mut backing).unwrap();
    // capacity/2 == 16, header is 12, so 4 payload bytes is the largest
    // single entry this ring accepts.
    logger.write_raw(Level::Info, 0, b"4444").unwrap();
    let mut out = [0u8; 8];
    let entry = logger.read(&mut out).unwrap();
    assert_eq!(&out[..entry.len], b"4444");
}
