//! v3 envelope header: layout, encoding, parsing.

use crate::{Error, Result};

use super::{
    IV_SIZE, KEY_HEADER_SIZE, OPTIONS_KEY, OPTIONS_PASSWORD, PASSWORD_HEADER_SIZE, SALT_SIZE,
    VERSION,
};

/// A parsed or to-be-encoded v3 envelope header.
///
/// The wire layout is fixed by the format:
///
/// ```text
/// offset  size  field
///   0      1    version = 0x03
///   1      1    options (0x00 key mode, 0x01 password mode)
///   2      8    encryption salt   password mode only
///  10      8    HMAC salt         password mode only
/// [2|18]  16    IV
/// ```
///
/// Key-mode headers are 18 bytes, password-mode headers 34 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    /// Password-based envelope: both keys are derived from the password and
    /// the per-message salts carried here.
    Password {
        /// Salt for deriving the AES encryption key.
        encryption_salt: [u8; SALT_SIZE],
        /// Salt for deriving the HMAC key.
        hmac_salt: [u8; SALT_SIZE],
        /// AES-CBC initialization vector.
        iv: [u8; IV_SIZE],
    },
    /// Key-based envelope: the caller supplies both keys, only the IV is
    /// carried on the wire.
    Key {
        /// AES-CBC initialization vector.
        iv: [u8; IV_SIZE],
    },
}

impl Header {
    /// Returns the options byte this header encodes to.
    pub fn options(&self) -> u8 {
        match self {
            Header::Password { .. } => OPTIONS_PASSWORD,
            Header::Key { .. } => OPTIONS_KEY,
        }
    }

    /// Returns the encoded size in bytes: 34 for password mode, 18 for key
    /// mode.
    pub fn size(&self) -> usize {
        match self {
            Header::Password { .. } => PASSWORD_HEADER_SIZE,
            Header::Key { .. } => KEY_HEADER_SIZE,
        }
    }

    /// Returns the IV.
    pub fn iv(&self) -> &[u8; IV_SIZE] {
        match self {
            Header::Password { iv, .. } | Header::Key { iv } => iv,
        }
    }

    /// Returns the header size implied by an options byte, or `None` for an
    /// options byte the format does not define.
    pub fn size_for_options(options: u8) -> Option<usize> {
        match options {
            OPTIONS_KEY => Some(KEY_HEADER_SIZE),
            OPTIONS_PASSWORD => Some(PASSWORD_HEADER_SIZE),
            _ => None,
        }
    }

    /// Encodes the header to its wire representation.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        out.push(VERSION);
        out.push(self.options());
        if let Header::Password {
            encryption_salt,
            hmac_salt,
            ..
        } = self
        {
            out.extend_from_slice(encryption_salt);
            out.extend_from_slice(hmac_salt);
        }
        out.extend_from_slice(self.iv());
        out
    }

    /// Parses a complete header.
    ///
    /// `bytes` must hold exactly the header: 18 bytes for key mode, 34 for
    /// password mode, as announced by the options byte.
    ///
    /// # Errors
    ///
    /// - [`Error::MessageTooShort`] if `bytes` is shorter than the options
    ///   byte announces (or too short to hold one).
    /// - [`Error::UnknownHeader`] if the version byte is not `0x03`.
    /// - [`Error::InvalidCredentialType`] if the options byte is neither
    ///   `0x00` nor `0x01`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(Error::MessageTooShort);
        }
        if bytes[0] != VERSION {
            return Err(Error::UnknownHeader);
        }

        let size = Header::size_for_options(bytes[1]).ok_or(Error::InvalidCredentialType)?;
        if bytes.len() < size {
            return Err(Error::MessageTooShort);
        }

        let mut iv = [0u8; IV_SIZE];
        match bytes[1] {
            OPTIONS_PASSWORD => {
                let mut encryption_salt = [0u8; SALT_SIZE];
                let mut hmac_salt = [0u8; SALT_SIZE];
                encryption_salt.copy_from_slice(&bytes[2..10]);
                hmac_salt.copy_from_slice(&bytes[10..18]);
                iv.copy_from_slice(&bytes[18..34]);
                Ok(Header::Password {
                    encryption_salt,
                    hmac_salt,
                    iv,
                })
            }
            _ => {
                iv.copy_from_slice(&bytes[2..18]);
                Ok(Header::Key { iv })
            }
        }
    }
}
