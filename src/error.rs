//! Error types for envelope encryption and decryption.
//!
//! This module provides the [`Error`] enum which represents all failure
//! modes of decrypting an RNCryptor v3 envelope, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. You can
//! handle errors using pattern matching or the `?` operator:
//!
//! ```rust
//! use rncrypt::{decrypt, Error};
//!
//! fn open_message(envelope: &[u8], password: &str) -> rncrypt::Result<Vec<u8>> {
//!     match decrypt(envelope, password) {
//!         Ok(plaintext) => Ok(plaintext),
//!         Err(Error::HmacMismatch) => {
//!             eprintln!("Wrong password, or the data was tampered with.");
//!             Err(Error::HmacMismatch)
//!         }
//!         Err(Error::UnknownHeader) => {
//!             eprintln!("This is not RNCryptor v3 data.");
//!             Err(Error::UnknownHeader)
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```
//!
//! # Indistinguishability
//!
//! By design, [`Error::HmacMismatch`] is the *only* error surfaced for any
//! authenticity or integrity defect inside a well-formed v3 envelope. A
//! wrong password, a flipped ciphertext bit, a truncated MAC, and malformed
//! block padding all produce the same error, so callers (and network peers
//! observing a caller) cannot use the error as a padding oracle.

/// The main error type for envelope operations.
///
/// Encryption never fails on valid inputs, so this enum describes the ways
/// *decryption* can reject data. Each variant corresponds to a distinct,
/// deliberately coarse failure class:
///
/// | Category | Variant | Typical cause |
/// |----------|---------|---------------|
/// | Authenticity | [`HmacMismatch`][Self::HmacMismatch] | Wrong password, tampering, truncation inside the MAC |
/// | Format | [`UnknownHeader`][Self::UnknownHeader] | Data is not an RNCryptor v3 envelope |
/// | Framing | [`MessageTooShort`][Self::MessageTooShort] | Stream ended before a complete envelope arrived |
/// | Usage | [`InvalidCredentialType`][Self::InvalidCredentialType] | Password supplied for a key-mode envelope, or vice versa |
/// | Resources | [`MemoryFailure`][Self::MemoryFailure] | Allocation failure (reserved) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The envelope failed authentication.
    ///
    /// This error is returned when the trailing HMAC-SHA-256 tag does not
    /// match the received header and ciphertext. It covers, without
    /// distinction:
    ///
    /// - a wrong password (password-mode envelopes),
    /// - any modification of the header, ciphertext, or MAC,
    /// - truncation that removed part of the MAC,
    /// - malformed PKCS#7 padding in the final block.
    ///
    /// The lack of detail is intentional; see the module docs.
    #[error("HMAC mismatch: wrong password or corrupted data")]
    HmacMismatch,

    /// The data does not begin with a recognized format version.
    ///
    /// RNCryptor v3 envelopes start with the version byte `0x03`. Earlier
    /// format versions are not supported.
    #[error("unknown header: not RNCryptor v3 data")]
    UnknownHeader,

    /// The stream ended before a complete envelope arrived.
    ///
    /// Returned by `finish` when the header never completed, or when fewer
    /// bytes than a full 32-byte MAC followed it. The smallest valid
    /// envelope is the header plus one 16-byte cipher block plus the MAC.
    #[error("message too short to hold a complete envelope")]
    MessageTooShort,

    /// The envelope's credential mode does not match the supplied credential.
    ///
    /// Password-mode envelopes (options byte `0x01`) must be opened with a
    /// password; key-mode envelopes (options byte `0x00`) must be opened
    /// with an encryption/HMAC key pair. This error is detected as soon as
    /// the options byte arrives, before any key derivation runs.
    #[error("credential type does not match the envelope's options byte")]
    InvalidCredentialType,

    /// An allocation failed.
    ///
    /// Reserved for API completeness: Rust aborts on allocation failure, so
    /// this variant is not raised by the current implementation.
    #[error("memory allocation failed")]
    MemoryFailure,
}

/// A specialized `Result` type for envelope operations.
pub type Result<T> = std::result::Result<T, Error>;
