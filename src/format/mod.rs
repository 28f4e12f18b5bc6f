//! RNCryptor v3 format constants, version detection, and key derivation.
//!
//! This module contains the magic numbers and sizes defined by the
//! RNCryptor v3 data format, the preamble-based version probe used by the
//! dispatching decryptor, and the PBKDF2 password key derivation.

pub mod header;

use sha1::Sha1;
use zeroize::Zeroizing;

use crate::crypto::Password;

/// The format version byte every v3 envelope starts with.
pub const VERSION: u8 = 3;

/// Options byte for key-based envelopes.
pub const OPTIONS_KEY: u8 = 0x00;

/// Options byte for password-based envelopes.
pub const OPTIONS_PASSWORD: u8 = 0x01;

/// Size of each key-derivation salt in bytes.
pub const SALT_SIZE: usize = 8;

/// Size of the AES-CBC initialization vector in bytes.
pub const IV_SIZE: usize = 16;

/// Size of an AES-256 or HMAC key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of the trailing HMAC-SHA-256 tag in bytes.
pub const HMAC_SIZE: usize = 32;

/// Header size for key-based envelopes: version, options, IV.
pub const KEY_HEADER_SIZE: usize = 2 + IV_SIZE;

/// Header size for password-based envelopes: version, options, two salts, IV.
pub const PASSWORD_HEADER_SIZE: usize = 2 + 2 * SALT_SIZE + IV_SIZE;

/// PBKDF2-HMAC-SHA1 iteration count fixed by the v3 format.
pub const PBKDF2_ITERATIONS: u32 = 10_000;

/// An envelope format version the dispatching decryptor can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormatVersion {
    /// RNCryptor v3, the only version this crate reads or writes.
    V3,
}

/// A candidate entry in the version registry: how many leading bytes the
/// probe needs, and the predicate over them.
pub(crate) struct FormatCandidate {
    pub version: FormatVersion,
    pub preamble_size: usize,
    pub can_decrypt: fn(&[u8]) -> bool,
}

/// Registry of recognizable formats, probed in order. Future versions are
/// added here with their own preamble predicate.
pub(crate) const CANDIDATES: &[FormatCandidate] = &[FormatCandidate {
    version: FormatVersion::V3,
    preamble_size: 1,
    can_decrypt: |preamble| preamble[0] == VERSION,
}];

/// The longest preamble any registered candidate needs.
///
/// Once this many bytes have arrived without a match, the data cannot be a
/// recognized envelope.
pub(crate) fn max_preamble_size() -> usize {
    CANDIDATES
        .iter()
        .map(|c| c.preamble_size)
        .max()
        .unwrap_or(0)
}

/// Probes the registry against the leading bytes of a stream.
///
/// Returns the first candidate whose preamble is fully available and whose
/// predicate accepts it, or `None` if no satisfied candidate matches.
pub(crate) fn detect_version(preamble: &[u8]) -> Option<FormatVersion> {
    CANDIDATES
        .iter()
        .filter(|c| preamble.len() >= c.preamble_size)
        .find(|c| (c.can_decrypt)(&preamble[..c.preamble_size]))
        .map(|c| c.version)
}

/// Derives a 32-byte AES or HMAC key from a password and salt.
///
/// RNCryptor v3 fixes the KDF as PBKDF2-HMAC-SHA1 with 10,000 iterations;
/// the encryption key and the HMAC key are derived independently, each from
/// its own 8-byte salt. The returned key is zeroed on drop.
pub fn key_for_password(password: &Password, salt: &[u8; SALT_SIZE]) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2::pbkdf2_hmac::<Sha1>(password.as_bytes(), salt, PBKDF2_ITERATIONS, key.as_mut());
    key
}
