//! Property-based tests using proptest.
//!
//! These tests verify invariants of the envelope codec and the overflowing
//! buffer using randomly generated inputs.

use proptest::prelude::*;

use rncrypt::buffer::OverflowingBuffer;
use rncrypt::{Decryptor, Encryptor, Error, decrypt, encrypt};

/// Strategy for a non-empty printable password.
fn password_strategy() -> impl Strategy<Value = String> {
    "[ -~]{1,24}"
}

proptest! {
    /// Feeding any chunk sequence into an overflowing buffer conserves
    /// bytes: overflows plus the retained tail reconstruct the input, and
    /// the retained length tracks min(total, capacity) at every step.
    #[test]
    fn buffer_conserves_bytes(
        chunks in proptest::collection::vec(
            proptest::collection::vec(any::<u8>(), 0..100),
            0..20,
        ),
        capacity in 0usize..64,
    ) {
        let mut buffer = OverflowingBuffer::new(capacity);
        let mut total = 0usize;
        let mut reconstructed = Vec::new();

        for chunk in &chunks {
            reconstructed.extend(buffer.update(chunk));
            total += chunk.len();
            prop_assert_eq!(buffer.len(), total.min(capacity));
        }
        reconstructed.extend(buffer.finish());

        let input: Vec<u8> = chunks.concat();
        prop_assert_eq!(reconstructed, input);
    }

    /// Every message round-trips under every password.
    #[test]
    fn roundtrip_any_message(
        data in proptest::collection::vec(any::<u8>(), 0..512),
        password in password_strategy(),
    ) {
        let envelope = encrypt(&data, password.as_str());
        let plaintext = decrypt(&envelope, password.as_str()).unwrap();
        prop_assert_eq!(plaintext, data);
    }

    /// Chunk boundaries are invisible to both directions: a streamed
    /// decryptor fed arbitrary splits agrees with the one-shot result.
    #[test]
    fn decryption_ignores_chunking(
        data in proptest::collection::vec(any::<u8>(), 0..256),
        splits in proptest::collection::vec(0usize..400, 0..8),
    ) {
        let envelope = encrypt(&data, "chunking");

        let mut boundaries: Vec<usize> =
            splits.iter().map(|s| s % (envelope.len() + 1)).collect();
        boundaries.sort_unstable();

        let mut decryptor = Decryptor::with_password("chunking");
        let mut plaintext = Vec::new();
        let mut start = 0usize;
        for &end in &boundaries {
            plaintext.extend(decryptor.update(&envelope[start..end]).unwrap());
            start = end;
        }
        plaintext.extend(decryptor.update(&envelope[start..]).unwrap());
        plaintext.extend(decryptor.finish().unwrap());

        prop_assert_eq!(plaintext, data);
    }

    /// Flipping any single bit anywhere in the envelope is detected; a
    /// flip past the header is always an HMAC mismatch.
    #[test]
    fn any_bit_flip_is_detected(
        data in proptest::collection::vec(any::<u8>(), 0..128),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut envelope = encrypt(&data, "tamper");
        let index = position.index(envelope.len());
        envelope[index] ^= 1 << bit;

        let result = decrypt(&envelope, "tamper");
        prop_assert!(result.is_err());
        if index >= 2 {
            prop_assert_eq!(result, Err(Error::HmacMismatch));
        }
    }

    /// Removing any non-empty suffix never yields a spurious success.
    #[test]
    fn any_truncation_is_detected(
        data in proptest::collection::vec(any::<u8>(), 0..128),
        cut in any::<prop::sample::Index>(),
    ) {
        let envelope = encrypt(&data, "truncate");
        let keep = cut.index(envelope.len());

        let result = decrypt(&envelope[..keep], "truncate");
        prop_assert!(
            matches!(result, Err(Error::HmacMismatch) | Err(Error::MessageTooShort)),
            "truncation to {} bytes produced {:?}",
            keep,
            result
        );
    }

    /// A different password never opens the envelope, and always fails as
    /// an HMAC mismatch.
    #[test]
    fn wrong_password_rejected(
        data in proptest::collection::vec(any::<u8>(), 0..128),
        password in password_strategy(),
        wrong in password_strategy(),
    ) {
        prop_assume!(password != wrong);

        let envelope = encrypt(&data, password.as_str());
        prop_assert_eq!(
            decrypt(&envelope, wrong.as_str()),
            Err(Error::HmacMismatch)
        );
    }

    /// Deterministic construction is a function of its inputs: streaming
    /// with any chunk size reproduces the one-shot envelope bytes.
    #[test]
    fn encryption_ignores_chunking(
        data in proptest::collection::vec(any::<u8>(), 0..256),
        chunk in 1usize..64,
    ) {
        let enc_salt = [0x11u8; 8];
        let hmac_salt = [0x22u8; 8];
        let iv = [0x33u8; 16];

        let mut one = Encryptor::with_password_and_nonces("pw", &enc_salt, &hmac_salt, &iv);
        let mut reference = one.update(&data);
        reference.extend(one.finish());

        let mut chunked = Encryptor::with_password_and_nonces("pw", &enc_salt, &hmac_salt, &iv);
        let mut envelope = Vec::new();
        for piece in data.chunks(chunk) {
            envelope.extend(chunked.update(piece));
        }
        envelope.extend(chunked.finish());

        prop_assert_eq!(envelope, reference);
    }
}
