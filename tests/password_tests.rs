//! Tests for password handling.
//!
//! These tests verify both sides of the password contract:
//! - the correct password opens the envelope,
//! - any other password is rejected with `HmacMismatch` and nothing more
//!   specific (no padding or cipher errors that could narrow a guess).

use rncrypt::{Decryptor, Encryptor, Error, Password, decrypt, encrypt};

// =============================================================================
// Correct Password
// =============================================================================

#[test]
fn test_correct_password_succeeds() {
    let envelope = encrypt(b"secret content", "correct_password");
    let plaintext = decrypt(&envelope, "correct_password").expect("correct password must open");
    assert_eq!(plaintext, b"secret content");
}

#[test]
fn test_password_type_roundtrip() {
    let password = Password::new("typed password");
    let envelope = encrypt(b"data", password.clone());
    assert_eq!(decrypt(&envelope, password).unwrap(), b"data");
}

// =============================================================================
// Wrong Password
// =============================================================================

#[test]
fn test_wrong_password_rejected() {
    let envelope = encrypt(b"secret content", "correct_password");
    assert_eq!(
        decrypt(&envelope, "wrong_password"),
        Err(Error::HmacMismatch)
    );
}

#[test]
fn test_near_miss_passwords_rejected() {
    let envelope = encrypt(b"secret content", "password");

    // Single-character edits, case changes, added whitespace: all must
    // fail identically.
    for wrong in [
        "Password",
        "password ",
        " password",
        "passwor",
        "passwords",
        "passw0rd",
    ] {
        assert_eq!(
            decrypt(&envelope, wrong),
            Err(Error::HmacMismatch),
            "near-miss password {:?} was not rejected",
            wrong
        );
    }
}

#[test]
fn test_wrong_password_fails_during_finish_not_update() {
    // Key derivation from the wrong password yields wrong keys, but the
    // mismatch is only provable at finish; update must not fail.
    let envelope = encrypt(&vec![7u8; 256], "right");

    let mut decryptor = Decryptor::with_password("wrong");
    for chunk in envelope.chunks(10) {
        decryptor
            .update(chunk)
            .expect("update must not report a wrong password");
    }
    assert_eq!(decryptor.finish(), Err(Error::HmacMismatch));
}

#[test]
fn test_password_is_not_valid_for_key_mode_envelope() {
    let envelope = rncrypt::encrypt_with_keys(b"data", &[1u8; 32], &[2u8; 32]);
    let mut decryptor = Decryptor::with_password("any");
    assert_eq!(
        decryptor.update(&envelope).unwrap_err(),
        Error::InvalidCredentialType
    );
}

// =============================================================================
// Empty Password Contract
// =============================================================================

#[test]
#[should_panic(expected = "password must not be empty")]
fn test_encryptor_rejects_empty_password() {
    let _ = Encryptor::with_password("");
}

#[test]
#[should_panic(expected = "password must not be empty")]
fn test_decryptor_rejects_empty_password() {
    let _ = Decryptor::with_password("");
}

// =============================================================================
// Password Hygiene
// =============================================================================

#[test]
fn test_password_debug_is_redacted() {
    let password = Password::new("hunter2");
    let debug = format!("{:?}", password);
    assert!(!debug.contains("hunter2"));
}

#[test]
fn test_single_character_password_works() {
    // Short passwords are weak but legal; only the empty one is a
    // contract violation.
    let envelope = encrypt(b"data", "a");
    assert_eq!(decrypt(&envelope, "a").unwrap(), b"data");
}
