//! # rncrypt
//!
//! A pure-Rust implementation of the [RNCryptor v3] encrypted data format.
//!
//! The v3 format is a self-describing binary envelope: a small header,
//! AES-256-CBC ciphertext, and a trailing HMAC-SHA-256 tag covering both.
//! Keys come either from a caller-supplied pair of 32-byte keys or from a
//! password via PBKDF2-HMAC-SHA1 (10,000 iterations). Envelopes produced
//! here interoperate byte-for-byte with the other RNCryptor
//! implementations.
//!
//! [RNCryptor v3]: https://github.com/RNCryptor/RNCryptor-Spec
//!
//! ## Quick Start
//!
//! ### One-shot
//!
//! ```rust
//! use rncrypt::{decrypt, encrypt};
//!
//! let envelope = encrypt(b"attack at dawn", "correct horse battery staple");
//! let plaintext = decrypt(&envelope, "correct horse battery staple")?;
//! assert_eq!(plaintext, b"attack at dawn");
//! # Ok::<(), rncrypt::Error>(())
//! ```
//!
//! ### Streaming
//!
//! Both directions work incrementally, with constant memory, on chunks of
//! any size:
//!
//! ```rust
//! use rncrypt::{Decryptor, Encryptor};
//!
//! let mut encryptor = Encryptor::with_password("secret");
//! let mut envelope = Vec::new();
//! for chunk in b"a long message".chunks(3) {
//!     envelope.extend(encryptor.update(chunk));
//! }
//! envelope.extend(encryptor.finish());
//!
//! let mut decryptor = Decryptor::with_password("secret");
//! let mut plaintext = Vec::new();
//! for chunk in envelope.chunks(7) {
//!     plaintext.extend(decryptor.update(chunk)?);
//! }
//! plaintext.extend(decryptor.finish()?);
//! assert_eq!(plaintext, b"a long message");
//! # Ok::<(), rncrypt::Error>(())
//! ```
//!
//! ### Key-based envelopes
//!
//! When both sides already share key material, skip the password KDF:
//!
//! ```rust
//! use rncrypt::{decrypt_with_keys, encrypt_with_keys, random_data};
//!
//! let encryption_key: [u8; 32] = random_data(32).try_into().unwrap();
//! let hmac_key: [u8; 32] = random_data(32).try_into().unwrap();
//!
//! let envelope = encrypt_with_keys(b"payload", &encryption_key, &hmac_key);
//! let plaintext = decrypt_with_keys(&envelope, &encryption_key, &hmac_key)?;
//! assert_eq!(plaintext, b"payload");
//! # Ok::<(), rncrypt::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. Decryption deliberately reports every
//! authenticity problem (wrong password, tampering, truncated MAC, bad
//! padding) as the single [`Error::HmacMismatch`] variant, so the error
//! cannot be used as a padding oracle. See [`error`] for the full
//! taxonomy.
//!
//! ## Security Notes
//!
//! - Decryption is *authenticate-then-release for the final block only*:
//!   plaintext streamed out of [`Decryptor::update`] has **not** been
//!   verified yet. Discard all of it unless `finish` returns `Ok`.
//! - The MAC comparison is constant-time.
//! - Passwords and derived keys are zeroed on drop.
//! - The deterministic constructors (`*_and_nonces`, `*_and_iv`) exist for
//!   tests and cross-implementation vectors; production code must use the
//!   CSPRNG-backed constructors.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod crypto;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod format;

pub use error::{Error, Result};

pub use crypto::{Password, random_data};

// Re-export the streaming and one-shot APIs at the crate root for
// convenience.
pub use decrypt::{Decryptor, decrypt, decrypt_with_keys};
pub use encrypt::{Encryptor, encrypt, encrypt_with_keys};
