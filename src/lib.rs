//! # ideavault
//!
//! Password-sealed idea lists for static sites.
//!
//! An operator encrypts a list of draft post ideas offline into a single
//! opaque container string, publishes it as a build secret, and the site
//! embeds it. A viewer who knows the password decrypts it locally. There is
//! no server and no key other than the password.
//!
//! The container protocol is PBKDF2-HMAC-SHA256 (100,000 rounds, 16-byte
//! salt) feeding AES-256-GCM (12-byte nonce, 16-byte tag, no AAD), wrapped as
//! base64-encoded JSON. See [`container`] for the wire format.
//!
//! ## Public API
//!
//! - [`encrypt`] / [`decrypt`]: the producer and consumer halves of the
//!   protocol, with typed errors.
//! - [`session::UnlockSession`]: the viewer-facing state machine that
//!   collapses every failure into one opaque outcome.
//! - [`producer::run`]: the interactive operator workflow behind the
//!   `encrypt-ideas` binary.

pub mod config;
pub mod container;
pub mod crypto;
pub mod error;
pub mod ideas;
pub mod keys;
pub mod logging;
pub mod producer;
pub mod render;
pub mod session;

pub use error::Error;
pub use ideas::{Idea, Ideas};
pub use keys::Password;

use zeroize::Zeroizing;

use container::Container;

/// Seal raw bytes into a container string under `password`.
///
/// Draws a fresh salt and nonce, so two calls with identical inputs produce
/// unrelated containers.
pub fn encrypt_bytes(plaintext: &[u8], password: &Password) -> Result<String, Error> {
    let salt = crypto::generate_salt()?;
    let nonce = crypto::generate_nonce()?;
    seal_container(password, &salt, &nonce, plaintext)
}

fn seal_container(
    password: &Password,
    salt: &[u8; crypto::SALT_LEN],
    nonce: &[u8; crypto::NONCE_LEN],
    plaintext: &[u8],
) -> Result<String, Error> {
    let key = keys::derive(password, salt);
    let ciphertext = crypto::seal(key.as_bytes(), nonce, plaintext)?;
    tracing::debug!(
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "sealed container"
    );
    container::encode(salt, nonce, &ciphertext)
}

/// Open a container string with `password`, returning the raw plaintext.
///
/// Either the exact original bytes come back or an error does. Errors keep
/// their cause ([`Error::Decode`] vs [`Error::AuthFailure`]); callers facing
/// an untrusted party should collapse them, as [`session`] does.
pub fn decrypt_bytes(encoded: &str, password: &Password) -> Result<Zeroizing<Vec<u8>>, Error> {
    let Container {
        salt,
        iv,
        ciphertext,
    } = container::decode(encoded)?;
    let key = keys::derive(password, &salt);
    crypto::open(key.as_bytes(), &iv, &ciphertext)
}

/// Encrypt an idea list into a container string.
pub fn encrypt(ideas: &Ideas, password: &Password) -> Result<String, Error> {
    let json = ideas.to_json()?;
    encrypt_bytes(&json, password)
}

/// Decrypt a container string into an idea list.
///
/// Bytes that authenticate but do not parse as an idea list are
/// [`Error::PayloadParse`].
pub fn decrypt(encoded: &str, password: &Password) -> Result<Ideas, Error> {
    let plaintext = decrypt_bytes(encoded, password)?;
    Ideas::from_json(&plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "correcthorsebattery";
    const INDEPENDENT: &str = include_str!("../tests/fixtures/independent_container.txt");

    #[test]
    fn test_fixed_inputs_reproduce_independent_container() {
        let salt: [u8; crypto::SALT_LEN] = core::array::from_fn(|i| i as u8);
        let nonce: [u8; crypto::NONCE_LEN] = core::array::from_fn(|i| 100 + i as u8);

        let encoded = seal_container(
            &Password::from(PASSWORD),
            &salt,
            &nonce,
            br#"[{"title":"A","tags":["x"]}]"#,
        )
        .unwrap();
        assert_eq!(encoded, INDEPENDENT.trim());
    }

    #[test]
    fn test_every_single_bit_flip_is_rejected() {
        let password = Password::from(PASSWORD);
        let Container {
            salt,
            iv,
            ciphertext,
        } = container::decode(INDEPENDENT).unwrap();
        // One derivation, reused for every flip.
        let key = keys::derive(&password, &salt);
        assert!(crypto::open(key.as_bytes(), &iv, &ciphertext).is_ok());

        for byte in 0..ciphertext.len() {
            for bit in 0..8 {
                let mut tampered = ciphertext.clone();
                tampered[byte] ^= 1 << bit;
                assert!(
                    matches!(
                        crypto::open(key.as_bytes(), &iv, &tampered),
                        Err(Error::AuthFailure)
                    ),
                    "flip of byte {byte} bit {bit} was accepted"
                );
            }
        }
    }
}
