//! Streaming encryption: building v3 envelopes.

use crate::crypto::{CbcEncryptor, HmacEngine, Password, random_array};
use crate::format::header::Header;
use crate::format::{IV_SIZE, KEY_SIZE, SALT_SIZE, key_for_password};

/// A streaming v3 envelope encryptor.
///
/// Feed plaintext through [`update`](Self::update) and collect the returned
/// envelope bytes; [`finish`](Self::finish) emits the final padded cipher
/// block followed by the 32-byte HMAC. Encryption never fails on valid
/// inputs, so both methods are infallible.
///
/// The header is emitted exactly once, before any ciphertext, and every
/// output byte (header included) is authenticated by the trailing MAC.
///
/// # Example
///
/// ```rust
/// use rncrypt::Encryptor;
///
/// let mut encryptor = Encryptor::with_password("secret");
/// let mut envelope = encryptor.update(b"attack at dawn");
/// envelope.extend(encryptor.finish());
/// ```
pub struct Encryptor {
    /// Header bytes, already MAC-fed, waiting to be prepended to the first
    /// output.
    pending_header: Option<Vec<u8>>,
    cipher: CbcEncryptor,
    mac: HmacEngine,
}

impl Encryptor {
    /// Creates a password-based encryptor with salts and IV drawn from the
    /// OS CSPRNG.
    ///
    /// # Panics
    ///
    /// Panics if the password is empty. The format derives all key material
    /// from the password, so an empty one is a programming error, not a
    /// runtime condition.
    pub fn with_password(password: impl Into<Password>) -> Self {
        let password = password.into();
        assert!(!password.is_empty(), "password must not be empty");

        Self::with_password_and_nonces(
            password,
            &random_array::<SALT_SIZE>(),
            &random_array::<SALT_SIZE>(),
            &random_array::<IV_SIZE>(),
        )
    }

    /// Creates a key-based encryptor with an IV drawn from the OS CSPRNG.
    pub fn with_keys(encryption_key: &[u8; KEY_SIZE], hmac_key: &[u8; KEY_SIZE]) -> Self {
        Self::with_keys_and_iv(encryption_key, hmac_key, &random_array::<IV_SIZE>())
    }

    /// Creates a password-based encryptor with explicit salts and IV.
    ///
    /// Deterministic construction exists for tests and cross-implementation
    /// vectors. Do not use it in production: reusing an IV under the same
    /// key discloses shared plaintext prefixes, and attacker-known salts
    /// enable precomputed-dictionary attacks. Use
    /// [`with_password`](Self::with_password) instead.
    pub fn with_password_and_nonces(
        password: impl Into<Password>,
        encryption_salt: &[u8; SALT_SIZE],
        hmac_salt: &[u8; SALT_SIZE],
        iv: &[u8; IV_SIZE],
    ) -> Self {
        let password = password.into();
        assert!(!password.is_empty(), "password must not be empty");

        let encryption_key = key_for_password(&password, encryption_salt);
        let hmac_key = key_for_password(&password, hmac_salt);
        let header = Header::Password {
            encryption_salt: *encryption_salt,
            hmac_salt: *hmac_salt,
            iv: *iv,
        };

        Self::from_parts(&encryption_key, &hmac_key, header)
    }

    /// Creates a key-based encryptor with an explicit IV.
    ///
    /// Deterministic construction exists for tests and cross-implementation
    /// vectors; see [`with_password_and_nonces`](Self::with_password_and_nonces)
    /// for why production code should prefer [`with_keys`](Self::with_keys).
    pub fn with_keys_and_iv(
        encryption_key: &[u8; KEY_SIZE],
        hmac_key: &[u8; KEY_SIZE],
        iv: &[u8; IV_SIZE],
    ) -> Self {
        Self::from_parts(encryption_key, hmac_key, Header::Key { iv: *iv })
    }

    fn from_parts(
        encryption_key: &[u8; KEY_SIZE],
        hmac_key: &[u8; KEY_SIZE],
        header: Header,
    ) -> Self {
        let header_bytes = header.encode();
        let cipher = CbcEncryptor::new(encryption_key, header.iv());
        let mut mac = HmacEngine::new(hmac_key);
        // The header is authenticated exactly once, ahead of any
        // ciphertext, matching its position in the output.
        mac.update(&header_bytes);

        Self {
            pending_header: Some(header_bytes),
            cipher,
            mac,
        }
    }

    /// Encrypts more plaintext, returning the next envelope bytes.
    ///
    /// The first call that produces output is prefixed with the header.
    /// Output arrives in 16-byte-block granularity; short updates may
    /// return nothing until a block fills.
    pub fn update(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = self.pending_header.take().unwrap_or_default();
        let ciphertext = self.cipher.update(data);
        self.mac.update(&ciphertext);
        out.extend(ciphertext);
        out
    }

    /// Completes the envelope: final padded block, then the 32-byte MAC.
    pub fn finish(mut self) -> Vec<u8> {
        let mut out = self.pending_header.take().unwrap_or_default();
        let ciphertext = self.cipher.finish();
        self.mac.update(&ciphertext);
        out.extend(ciphertext);
        out.extend(self.mac.finish());
        out
    }
}

impl std::fmt::Debug for Encryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encryptor").finish_non_exhaustive()
    }
}

/// One-shot convenience: encrypts `plaintext` under `password`.
///
/// Equivalent to constructing an [`Encryptor`], feeding all of `plaintext`,
/// and finishing.
///
/// # Panics
///
/// Panics if the password is empty.
pub fn encrypt(plaintext: &[u8], password: impl Into<Password>) -> Vec<u8> {
    let mut encryptor = Encryptor::with_password(password);
    let mut envelope = encryptor.update(plaintext);
    envelope.extend(encryptor.finish());
    envelope
}

/// One-shot convenience: encrypts `plaintext` under a caller-supplied key
/// pair.
pub fn encrypt_with_keys(
    plaintext: &[u8],
    encryption_key: &[u8; KEY_SIZE],
    hmac_key: &[u8; KEY_SIZE],
) -> Vec<u8> {
    let mut encryptor = Encryptor::with_keys(encryption_key, hmac_key);
    let mut envelope = encryptor.update(plaintext);
    envelope.extend(encryptor.finish());
    envelope
}
