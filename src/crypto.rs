//! Low-level cryptographic operations.
//!
//! This module is one of exactly two places in the crate that import `ring`
//! directly (the other is `keys`). Everything else seals and opens payloads
//! exclusively through the functions exposed here.
//!
//! Primitive choices:
//! - **Cipher**: AES-256-GCM (authenticated encryption), no associated data
//! - **Nonce**: 96-bit (12 bytes), drawn fresh per container via `SystemRandom`
//! - **Salt**: 128-bit (16 bytes), drawn fresh per container via `SystemRandom`
//! - **Key size**: 256 bits (32 bytes)

use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::error::Error;

/// The AEAD algorithm used for every container.
const ALGORITHM: &aead::Algorithm = &AES_256_GCM;

/// Size of the nonce in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Size of the PBKDF2 salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Size of a derived key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Size of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

fn fill_random<const N: usize>() -> Result<[u8; N], Error> {
    let rng = SystemRandom::new();
    let mut buf = [0u8; N];
    rng.fill(&mut buf).map_err(|_| Error::RandomnessFailure)?;
    Ok(buf)
}

/// Generate a fresh random nonce for a single seal operation.
///
/// There is no nonce caching or counter-based generation. Every container
/// also carries a fresh salt, so the key a nonce is paired with is itself
/// new each time.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN], Error> {
    fill_random()
}

/// Generate a fresh random salt for key derivation.
pub fn generate_salt() -> Result<[u8; SALT_LEN], Error> {
    fill_random()
}

fn less_safe_key(key_bytes: &[u8; KEY_LEN]) -> Result<LessSafeKey, Error> {
    let unbound = UnboundKey::new(ALGORITHM, key_bytes).map_err(|_| Error::InvalidKey)?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt a plaintext with AES-256-GCM.
///
/// # Layout of returned bytes
/// ```text
/// [ ciphertext (plaintext.len() bytes) ][ GCM tag (16 bytes) ]
/// ```
///
/// The nonce is not included; the caller carries it in the container.
pub fn seal(
    key_bytes: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, Error> {
    let key = less_safe_key(key_bytes)?;

    let mut output = Vec::with_capacity(plaintext.len() + ALGORITHM.tag_len());
    output.extend_from_slice(plaintext);

    // Encrypts `output` in place and appends the tag.
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(*nonce),
        Aad::empty(),
        &mut output,
    )
    .map_err(|_| Error::EncryptionFailure)?;

    Ok(output)
}

/// Decrypt and authenticate a `ciphertext ‖ tag` produced by [`seal`].
///
/// Fails closed. If the key is wrong or any byte of the ciphertext or tag has
/// changed, this returns [`Error::AuthFailure`] and the working buffer, which
/// `ring` leaves in an unspecified state, is zeroised before it is released.
/// The caller receives no partial plaintext.
pub fn open(
    key_bytes: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, Error> {
    if ciphertext.len() < TAG_LEN {
        return Err(Error::AuthFailure);
    }

    let key = less_safe_key(key_bytes)?;
    let mut buffer = Zeroizing::new(ciphertext.to_vec());

    let plaintext_len = key
        .open_in_place(
            Nonce::assume_unique_for_key(*nonce),
            Aad::empty(),
            buffer.as_mut_slice(),
        )
        .map_err(|_| Error::AuthFailure)?
        .len();

    buffer.truncate(plaintext_len);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [7u8; KEY_LEN];
    const NONCE: [u8; NONCE_LEN] = [9u8; NONCE_LEN];

    #[test]
    fn test_seal_appends_tag() {
        let sealed = seal(&KEY, &NONCE, b"draft").unwrap();
        assert_eq!(sealed.len(), b"draft".len() + TAG_LEN);
        assert_ne!(&sealed[..5], b"draft");
    }

    #[test]
    fn test_open_roundtrip() {
        let sealed = seal(&KEY, &NONCE, b"draft idea").unwrap();
        let opened = open(&KEY, &NONCE, &sealed).unwrap();
        assert_eq!(opened.as_slice(), b"draft idea");
    }

    #[test]
    fn test_empty_plaintext_is_just_a_tag() {
        let sealed = seal(&KEY, &NONCE, b"").unwrap();
        assert_eq!(sealed.len(), TAG_LEN);
        assert!(open(&KEY, &NONCE, &sealed).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_key_and_corruption_look_the_same() {
        let sealed = seal(&KEY, &NONCE, b"draft idea").unwrap();

        let wrong_key = open(&[8u8; KEY_LEN], &NONCE, &sealed);
        let mut corrupted = sealed.clone();
        corrupted[0] ^= 0x01;
        let tampered = open(&KEY, &NONCE, &corrupted);

        assert!(matches!(wrong_key, Err(Error::AuthFailure)));
        assert!(matches!(tampered, Err(Error::AuthFailure)));
    }

    #[test]
    fn test_wrong_nonce_fails() {
        let sealed = seal(&KEY, &NONCE, b"draft idea").unwrap();
        assert!(matches!(
            open(&KEY, &[0u8; NONCE_LEN], &sealed),
            Err(Error::AuthFailure)
        ));
    }

    #[test]
    fn test_short_input_is_auth_failure() {
        assert!(matches!(
            open(&KEY, &NONCE, &[0u8; TAG_LEN - 1]),
            Err(Error::AuthFailure)
        ));
    }

    #[test]
    fn test_random_values_differ() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
        assert_ne!(generate_nonce().unwrap(), generate_nonce().unwrap());
    }
}
