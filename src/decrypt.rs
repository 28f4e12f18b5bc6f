//! Streaming decryption: version dispatch and the v3 decrypt engine.
//!
//! [`Decryptor`] buffers just enough leading bytes to recognize the format
//! version and parse its header, then hands the rest of the stream to the
//! version engine. The engine routes every byte through a capacity-32
//! [`OverflowingBuffer`] so that the trailing 32 bytes of the stream (the
//! candidate MAC) are never decrypted, without knowing the stream length
//! in advance.

use zeroize::Zeroizing;

use crate::buffer::OverflowingBuffer;
use crate::crypto::{CbcDecryptor, HmacEngine, Password, constant_time_equal};
use crate::format::header::Header;
use crate::format::{self, HMAC_SIZE, IV_SIZE, KEY_SIZE, key_for_password};
use crate::{Error, Result};

/// What the caller supplied to open envelopes with.
enum Credential {
    Password(Password),
    Keys {
        encryption: Zeroizing<[u8; KEY_SIZE]>,
        hmac: Zeroizing<[u8; KEY_SIZE]>,
    },
}

impl Credential {
    /// The options byte an envelope must carry to match this credential.
    fn options(&self) -> u8 {
        match self {
            Credential::Password(_) => format::OPTIONS_PASSWORD,
            Credential::Keys { .. } => format::OPTIONS_KEY,
        }
    }

    fn header_size(&self) -> usize {
        Header::size_for_options(self.options()).expect("credential options are always defined")
    }

    /// Consumes the credential into a running engine for a parsed header.
    fn into_engine(self, header: &Header, header_bytes: &[u8]) -> EngineV3 {
        match (self, header) {
            (
                Credential::Password(password),
                Header::Password {
                    encryption_salt,
                    hmac_salt,
                    iv,
                },
            ) => {
                let encryption_key = key_for_password(&password, encryption_salt);
                let hmac_key = key_for_password(&password, hmac_salt);
                EngineV3::new(&encryption_key, &hmac_key, iv, header_bytes)
            }
            (Credential::Keys { encryption, hmac }, Header::Key { iv }) => {
                EngineV3::new(&encryption, &hmac, iv, header_bytes)
            }
            _ => unreachable!("options byte was checked against the credential"),
        }
    }
}

/// The v3 decrypt engine, running once the header is known.
///
/// Invariant: every byte fed to `update` enters the tail buffer, and every
/// byte that overflows it has been fed to both the MAC and the cipher, in
/// order. Whatever the tail retains when the stream ends is the received
/// MAC.
struct EngineV3 {
    tail: OverflowingBuffer,
    cipher: CbcDecryptor,
    mac: HmacEngine,
}

impl EngineV3 {
    fn new(
        encryption_key: &[u8; KEY_SIZE],
        hmac_key: &[u8; KEY_SIZE],
        iv: &[u8; IV_SIZE],
        header_bytes: &[u8],
    ) -> Self {
        let mut mac = HmacEngine::new(hmac_key);
        // The encryptor authenticated the header before any ciphertext;
        // mirror that here.
        mac.update(header_bytes);

        Self {
            tail: OverflowingBuffer::new(HMAC_SIZE),
            cipher: CbcDecryptor::new(encryption_key, iv),
            mac,
        }
    }

    fn update(&mut self, data: &[u8]) -> Vec<u8> {
        let overflow = self.tail.update(data);
        self.mac.update(&overflow);
        self.cipher.update(&overflow)
    }

    fn finish(self) -> Result<Vec<u8>> {
        let expected = self.mac.finish();
        let received = self.tail.finish();
        if received.len() < HMAC_SIZE {
            return Err(Error::MessageTooShort);
        }
        if !constant_time_equal(&expected, &received) {
            return Err(Error::HmacMismatch);
        }

        // The MAC verified, so the ciphertext is authentic and the final
        // block must unpad cleanly; report any residual cipher failure as
        // a MAC mismatch so nothing distinguishes padding problems.
        self.cipher.finish().map_err(|_| Error::HmacMismatch)
    }
}

/// A streaming, version-dispatching envelope decryptor.
///
/// Feed envelope bytes through [`update`](Self::update) and collect
/// plaintext as it becomes available; [`finish`](Self::finish) verifies the
/// trailing MAC and releases the final plaintext block. No plaintext
/// returned before `finish` succeeds has been authenticated; discard
/// everything if `finish` fails.
///
/// # Example
///
/// ```rust
/// use rncrypt::{Decryptor, encrypt};
///
/// let envelope = encrypt(b"attack at dawn", "secret");
///
/// let mut decryptor = Decryptor::with_password("secret");
/// let mut plaintext = Vec::new();
/// for chunk in envelope.chunks(5) {
///     plaintext.extend(decryptor.update(chunk)?);
/// }
/// plaintext.extend(decryptor.finish()?);
/// assert_eq!(plaintext, b"attack at dawn");
/// # Ok::<(), rncrypt::Error>(())
/// ```
pub struct Decryptor {
    /// Consumed when the engine starts.
    credential: Option<Credential>,
    /// Pre-header bytes; bypassed entirely once the engine is running.
    scratch: Vec<u8>,
    engine: Option<EngineV3>,
}

impl Decryptor {
    /// Creates a password-based decryptor.
    ///
    /// # Panics
    ///
    /// Panics if the password is empty, mirroring [`crate::Encryptor`].
    pub fn with_password(password: impl Into<Password>) -> Self {
        let password = password.into();
        assert!(!password.is_empty(), "password must not be empty");

        Self {
            credential: Some(Credential::Password(password)),
            scratch: Vec::new(),
            engine: None,
        }
    }

    /// Creates a key-based decryptor.
    pub fn with_keys(encryption_key: &[u8; KEY_SIZE], hmac_key: &[u8; KEY_SIZE]) -> Self {
        Self {
            credential: Some(Credential::Keys {
                encryption: Zeroizing::new(*encryption_key),
                hmac: Zeroizing::new(*hmac_key),
            }),
            scratch: Vec::new(),
            engine: None,
        }
    }

    /// Feeds envelope bytes in, returning any plaintext that became
    /// available.
    ///
    /// Returns nothing while the header is still incomplete. Plaintext is
    /// withheld by one cipher block plus the 32-byte MAC candidate, so the
    /// returned bytes always trail the input.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownHeader`] if the leading bytes match no recognized
    ///   format version.
    /// - [`Error::InvalidCredentialType`] if the envelope's options byte
    ///   does not match the supplied credential.
    pub fn update(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        if let Some(engine) = &mut self.engine {
            return Ok(engine.update(data));
        }

        self.scratch.extend_from_slice(data);
        self.try_start_engine()
    }

    /// Verifies the MAC and returns the final plaintext block.
    ///
    /// # Errors
    ///
    /// - [`Error::HmacMismatch`] on any authenticity failure: wrong
    ///   password, tampering, or corruption.
    /// - [`Error::MessageTooShort`] if the stream ended before a complete
    ///   header and MAC arrived.
    /// - [`Error::UnknownHeader`] if the buffered bytes match no recognized
    ///   format version.
    pub fn finish(self) -> Result<Vec<u8>> {
        let Decryptor {
            scratch, engine, ..
        } = self;
        match engine {
            Some(engine) => engine.finish(),
            None if !scratch.is_empty() && format::detect_version(&scratch).is_none() => {
                Err(Error::UnknownHeader)
            }
            None => Err(Error::MessageTooShort),
        }
    }

    /// Probes the scratch buffer; installs the engine once the header is
    /// complete and drains the remainder through it.
    fn try_start_engine(&mut self) -> Result<Vec<u8>> {
        if self.scratch.is_empty() {
            return Ok(Vec::new());
        }

        if format::detect_version(&self.scratch).is_none() {
            if self.scratch.len() >= format::max_preamble_size() {
                return Err(Error::UnknownHeader);
            }
            return Ok(Vec::new());
        }

        let credential = self
            .credential
            .as_ref()
            .expect("credential is present until the engine starts");

        // The options byte is checked as soon as it arrives, before any
        // key derivation.
        if self.scratch.len() < 2 {
            return Ok(Vec::new());
        }
        if self.scratch[1] != credential.options() {
            return Err(Error::InvalidCredentialType);
        }

        let header_size = credential.header_size();
        if self.scratch.len() < header_size {
            return Ok(Vec::new());
        }

        let header = Header::parse(&self.scratch[..header_size])?;
        log::debug!(
            "recognized v3 envelope, {} header",
            match header {
                Header::Password { .. } => "password-mode",
                Header::Key { .. } => "key-mode",
            }
        );

        let credential = self
            .credential
            .take()
            .expect("credential is present until the engine starts");
        let mut engine = credential.into_engine(&header, &self.scratch[..header_size]);

        let rest = self.scratch.split_off(header_size);
        self.scratch = Vec::new();
        let out = engine.update(&rest);
        self.engine = Some(engine);
        Ok(out)
    }
}

impl std::fmt::Debug for Decryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decryptor")
            .field("header_parsed", &self.engine.is_some())
            .field("buffered", &self.scratch.len())
            .finish_non_exhaustive()
    }
}

/// One-shot convenience: decrypts a complete envelope under `password`.
///
/// # Errors
///
/// See [`Decryptor::update`] and [`Decryptor::finish`].
///
/// # Panics
///
/// Panics if the password is empty.
pub fn decrypt(envelope: &[u8], password: impl Into<Password>) -> Result<Vec<u8>> {
    let mut decryptor = Decryptor::with_password(password);
    let mut plaintext = decryptor.update(envelope)?;
    plaintext.extend(decryptor.finish()?);
    Ok(plaintext)
}

/// One-shot convenience: decrypts a complete envelope under a
/// caller-supplied key pair.
///
/// # Errors
///
/// See [`Decryptor::update`] and [`Decryptor::finish`].
pub fn decrypt_with_keys(
    envelope: &[u8],
    encryption_key: &[u8; KEY_SIZE],
    hmac_key: &[u8; KEY_SIZE],
) -> Result<Vec<u8>> {
    let mut decryptor = Decryptor::with_keys(encryption_key, hmac_key);
    let mut plaintext = decryptor.update(envelope)?;
    plaintext.extend(decryptor.finish()?);
    Ok(plaintext)
}
