//! Cryptographic engines for the v3 envelope.
//!
//! This module wraps the RustCrypto primitives behind small stateful
//! engines with an explicit `update`/`finish` lifecycle:
//!
//! - [`CbcEncryptor`] / [`CbcDecryptor`]: streaming AES-256-CBC with PKCS#7
//!   padding applied (and stripped) by the engine itself
//! - [`HmacEngine`]: streaming HMAC-SHA-256
//!
//! Every engine is created, updated zero or more times, and finished
//! exactly once; `finish` takes the engine by value so reuse is a compile
//! error rather than a runtime state to check.
//!
//! The wrappers exist to localize the primitive-library choice: nothing
//! outside this module and [`crate::format`] names an algorithm crate.

mod password;

use aes::Aes256;
use cbc::cipher::generic_array::GenericArray;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub use password::Password;

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// AES block size in bytes.
pub(crate) const BLOCK_SIZE: usize = 16;

/// The ciphertext handed to [`CbcDecryptor::finish`] was not a whole
/// number of blocks, or its final block carried malformed PKCS#7 padding.
///
/// Internal only. Callers map this to [`crate::Error::HmacMismatch`] so the
/// failure is not distinguishable from an authentication failure.
#[derive(Debug)]
pub(crate) struct InvalidCiphertext;

/// Streaming AES-256-CBC encryptor with PKCS#7 padding.
///
/// `update` emits ciphertext for every complete block accumulated so far;
/// `finish` pads whatever remains (an empty remainder becomes a full
/// padding block) and emits the final block.
pub(crate) struct CbcEncryptor {
    cipher: Aes256CbcEnc,
    partial: Vec<u8>,
}

impl CbcEncryptor {
    pub(crate) fn new(key: &[u8; 32], iv: &[u8; 16]) -> Self {
        Self {
            cipher: Aes256CbcEnc::new(key.into(), iv.into()),
            partial: Vec::with_capacity(BLOCK_SIZE),
        }
    }

    /// Absorbs plaintext and returns ciphertext for the complete blocks.
    pub(crate) fn update(&mut self, data: &[u8]) -> Vec<u8> {
        self.partial.extend_from_slice(data);

        let complete = self.partial.len() / BLOCK_SIZE * BLOCK_SIZE;
        if complete == 0 {
            return Vec::new();
        }

        let mut out: Vec<u8> = self.partial.drain(..complete).collect();
        for block in out.chunks_exact_mut(BLOCK_SIZE) {
            self.cipher
                .encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        out
    }

    /// Pads and encrypts the final block. Encryption cannot fail.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        // partial is always shorter than a block here, so pad is 1..=16.
        let pad = BLOCK_SIZE - self.partial.len();
        self.partial.extend(std::iter::repeat_n(pad as u8, pad));

        let mut block = self.partial;
        self.cipher
            .encrypt_block_mut(GenericArray::from_mut_slice(&mut block));
        block
    }
}

impl std::fmt::Debug for CbcEncryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CbcEncryptor").finish_non_exhaustive()
    }
}

/// Streaming AES-256-CBC decryptor with PKCS#7 padding.
///
/// The final ciphertext block is held back until `finish` so the padding
/// can be stripped without knowing the stream length in advance: `update`
/// decrypts only down to the last complete block boundary minus one block.
pub(crate) struct CbcDecryptor {
    cipher: Aes256CbcDec,
    pending: Vec<u8>,
}

impl CbcDecryptor {
    pub(crate) fn new(key: &[u8; 32], iv: &[u8; 16]) -> Self {
        Self {
            cipher: Aes256CbcDec::new(key.into(), iv.into()),
            pending: Vec::with_capacity(2 * BLOCK_SIZE),
        }
    }

    /// Absorbs ciphertext and returns plaintext for every block that can no
    /// longer be the final one.
    pub(crate) fn update(&mut self, data: &[u8]) -> Vec<u8> {
        self.pending.extend_from_slice(data);

        let decryptable = self.pending.len().saturating_sub(BLOCK_SIZE) / BLOCK_SIZE * BLOCK_SIZE;
        if decryptable == 0 {
            return Vec::new();
        }

        let mut out: Vec<u8> = self.pending.drain(..decryptable).collect();
        for block in out.chunks_exact_mut(BLOCK_SIZE) {
            self.cipher
                .decrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        out
    }

    /// Decrypts the held-back final block and strips its padding.
    pub(crate) fn finish(self) -> Result<Vec<u8>, InvalidCiphertext> {
        let mut block = self.pending;
        if block.len() != BLOCK_SIZE {
            // Empty, short, or misaligned ciphertext.
            return Err(InvalidCiphertext);
        }

        let mut cipher = self.cipher;
        cipher.decrypt_block_mut(GenericArray::from_mut_slice(&mut block));

        let pad = block[BLOCK_SIZE - 1] as usize;
        if pad == 0 || pad > BLOCK_SIZE {
            return Err(InvalidCiphertext);
        }
        if block[BLOCK_SIZE - pad..].iter().any(|&b| b != pad as u8) {
            return Err(InvalidCiphertext);
        }

        block.truncate(BLOCK_SIZE - pad);
        Ok(block)
    }
}

impl std::fmt::Debug for CbcDecryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CbcDecryptor").finish_non_exhaustive()
    }
}

/// Streaming HMAC-SHA-256.
pub(crate) struct HmacEngine {
    mac: HmacSha256,
}

impl HmacEngine {
    pub(crate) fn new(key: &[u8; 32]) -> Self {
        Self {
            mac: HmacSha256::new_from_slice(key).expect("HMAC-SHA-256 accepts any key length"),
        }
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        self.mac.update(data);
    }

    pub(crate) fn finish(self) -> [u8; 32] {
        self.mac.finalize().into_bytes().into()
    }
}

impl std::fmt::Debug for HmacEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacEngine").finish_non_exhaustive()
    }
}

/// Compares two byte strings in constant time.
///
/// The comparison duration is independent of where the inputs differ. A
/// length mismatch returns `false` immediately; lengths are not secret.
pub(crate) fn constant_time_equal(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Returns `len` bytes from the operating system's CSPRNG.
///
/// # Panics
///
/// Panics if the OS entropy source is unavailable. That is an environment
/// failure no caller can meaningfully recover from, so it is not part of
/// the error taxonomy.
pub fn random_data(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    getrandom::getrandom(&mut bytes).expect("OS CSPRNG is unavailable");
    bytes
}

/// Fixed-size counterpart of [`random_data`].
pub(crate) fn random_array<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes).expect("OS CSPRNG is unavailable");
    bytes
}
