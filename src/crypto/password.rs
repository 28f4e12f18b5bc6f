//! Password handling for envelope encryption.

use zeroize::Zeroizing;

/// A password for envelope encryption/decryption.
///
/// This type stores the password securely (zeroed on drop) and provides the
/// UTF-8 byte view consumed by PBKDF2 key derivation.
#[derive(Clone)]
pub struct Password {
    inner: Zeroizing<String>,
}

impl Password {
    /// Creates a new password from a string.
    pub fn new<S: Into<String>>(password: S) -> Self {
        Self {
            inner: Zeroizing::new(password.into()),
        }
    }

    /// Returns the password as UTF-8 bytes for key derivation.
    ///
    /// RNCryptor v3 feeds the password to PBKDF2 as its UTF-8 encoding.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    /// Returns the password as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns true if the password is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the length of the password in characters.
    pub fn len(&self) -> usize {
        self.inner.chars().count()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Don't expose the actual password in debug output
        f.debug_struct("Password")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Password {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_bytes_ascii() {
        let password = Password::new("test");
        assert_eq!(password.as_bytes(), b"test");
    }

    #[test]
    fn test_password_bytes_unicode() {
        let password = Password::new("пароль"); // Russian word for "password"
        // Each Cyrillic character uses 2 bytes in UTF-8
        assert_eq!(password.as_bytes().len(), 12);
        assert_eq!(password.len(), 6);
    }

    #[test]
    fn test_password_debug() {
        let password = Password::new("secret");
        let debug = format!("{:?}", password);
        // Debug output should not contain the actual password
        assert!(!debug.contains("secret"));
        assert!(debug.contains("len"));
    }

    #[test]
    fn test_password_from_str() {
        let password: Password = "test".into();
        assert_eq!(password.as_str(), "test");
    }

    #[test]
    fn test_password_from_string() {
        let password: Password = String::from("test").into();
        assert_eq!(password.as_str(), "test");
    }

    #[test]
    fn test_password_empty() {
        let empty = Password::new("");
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
    }
}
