//! The transportable container string.
//!
//! A container bundles everything a consumer needs besides the password:
//!
//! ```text
//! base64( {"salt":[16 bytes],"iv":[12 bytes],"ciphertext":[ciphertext ‖ 16-byte tag]} )
//! ```
//!
//! Byte sequences are JSON arrays of integers 0-255. The outer encoding is
//! standard-alphabet base64 with padding and no line wrapping. Producers
//! never emit anything else, and consumers accept nothing else apart from
//! surrounding whitespace left over from pasting a secret.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::Error;

/// Why a container string was rejected.
///
/// Consumers must not surface these distinctions to an end user; they exist
/// for producers, tests, and debug logs.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("ciphertext shorter than an authentication tag ({0} bytes)")]
    TruncatedCiphertext(usize),
}

/// The JSON body, borrowed for encoding.
#[derive(Serialize)]
struct WireOut<'a> {
    salt: &'a [u8],
    iv: &'a [u8],
    ciphertext: &'a [u8],
}

/// The JSON body, owned for decoding. `null` counts as missing.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WireIn {
    #[serde(default)]
    salt: Option<Vec<u8>>,
    #[serde(default)]
    iv: Option<Vec<u8>>,
    #[serde(default)]
    ciphertext: Option<Vec<u8>>,
}

/// A decoded container: salt, nonce, and ciphertext with its trailing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl Container {
    /// Serialise to the canonical container string.
    pub fn encode(&self) -> Result<String, Error> {
        encode(&self.salt, &self.iv, &self.ciphertext)
    }

    /// Parse and validate a container string.
    pub fn decode(encoded: &str) -> Result<Self, DecodeError> {
        decode(encoded)
    }
}

/// Serialise `(salt, nonce, ciphertext ‖ tag)` to the canonical container string.
pub fn encode(
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<String, Error> {
    let json = serde_json::to_vec(&WireOut {
        salt,
        iv: nonce,
        ciphertext,
    })
    .map_err(|_| Error::Serialization)?;
    Ok(STANDARD.encode(json))
}

/// Parse a container string.
///
/// Validates, in order: base64, JSON, field presence, field lengths. Every
/// violation is a [`DecodeError`]; nothing here panics on hostile input.
pub fn decode(encoded: &str) -> Result<Container, DecodeError> {
    let json = STANDARD.decode(encoded.trim_matches(|c: char| c.is_ascii_whitespace()))?;
    let wire: WireIn = serde_json::from_slice(&json)?;

    let salt = wire.salt.ok_or(DecodeError::MissingField("salt"))?;
    let iv = wire.iv.ok_or(DecodeError::MissingField("iv"))?;
    let ciphertext = wire.ciphertext.ok_or(DecodeError::MissingField("ciphertext"))?;

    let salt = fixed::<SALT_LEN>("salt", salt)?;
    let iv = fixed::<NONCE_LEN>("iv", iv)?;
    if ciphertext.len() < TAG_LEN {
        return Err(DecodeError::TruncatedCiphertext(ciphertext.len()));
    }

    Ok(Container {
        salt,
        iv,
        ciphertext,
    })
}

fn fixed<const N: usize>(field: &'static str, bytes: Vec<u8>) -> Result<[u8; N], DecodeError> {
    let actual = bytes.len();
    bytes.try_into().map_err(|_| DecodeError::InvalidLength {
        field,
        expected: N,
        actual,
    })
}
