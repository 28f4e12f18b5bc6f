//! Fuzz target for the encrypt/corrupt/decrypt cycle.
//!
//! Encrypts the input, then decrypts a copy with one byte rewritten at a
//! fuzzer-chosen position. An intact copy must round-trip; a corrupted one
//! must fail without panicking.
//!
//! Run with: cargo +nightly fuzz run envelope_roundtrip

#![no_main]

use libfuzzer_sys::fuzz_target;
use rncrypt::{decrypt_with_keys, encrypt_with_keys};

fuzz_target!(|input: (Vec<u8>, u8, u8)| {
    let (data, position, value) = input;

    let encryption_key = [0x42u8; 32];
    let hmac_key = [0x24u8; 32];

    let envelope = encrypt_with_keys(&data, &encryption_key, &hmac_key);
    let plaintext =
        decrypt_with_keys(&envelope, &encryption_key, &hmac_key).expect("intact envelope");
    assert_eq!(plaintext, data);

    let mut corrupted = envelope.clone();
    let index = usize::from(position) % corrupted.len();
    corrupted[index] = value;
    if corrupted != envelope {
        assert!(decrypt_with_keys(&corrupted, &encryption_key, &hmac_key).is_err());
    }
});
