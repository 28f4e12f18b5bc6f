//! Fuzz target for the streaming decryptor with arbitrary byte input.
//!
//! This target exercises the version dispatch, header parsing, and engine
//! plumbing with potentially malformed or adversarial input. The goal is
//! to find panics, hangs, or memory issues; errors are the expected
//! outcome for almost every input.
//!
//! Run with: cargo +nightly fuzz run decrypt_stream

#![no_main]

use libfuzzer_sys::fuzz_target;
use rncrypt::Decryptor;

fuzz_target!(|data: &[u8]| {
    // One-shot: all bytes in a single update.
    let mut decryptor = Decryptor::with_password("fuzz");
    if decryptor.update(data).is_ok() {
        let _ = decryptor.finish();
    }

    // Streamed: the first byte doubles as a chunk size so the fuzzer can
    // explore boundary placements.
    let chunk = data.first().map_or(1, |&b| usize::from(b) + 1);
    let mut decryptor = Decryptor::with_keys(&[0u8; 32], &[0u8; 32]);
    for piece in data.chunks(chunk) {
        if decryptor.update(piece).is_err() {
            return;
        }
    }
    let _ = decryptor.finish();
});
