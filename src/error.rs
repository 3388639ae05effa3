//! Error types for ideavault.
//!
//! Every variant is a distinct failure mode of the container protocol.
//! Messages are intentionally minimal: they say *what* failed without
//! revealing *why* in ways that could leak cryptographic state.

use thiserror::Error;

use crate::container::DecodeError;

/// The single error type for core ideavault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A key was rejected by the cipher (wrong length, malformed).
    #[error("invalid key")]
    InvalidKey,

    /// Sealing failed. The underlying `ring` operation returned an error.
    #[error("encryption failed")]
    EncryptionFailure,

    /// Opening failed: wrong key, tampered ciphertext, or a corrupted GCM
    /// tag. These causes are deliberately not distinguished.
    #[error("authentication failed")]
    AuthFailure,

    /// The system's random number generator failed to produce bytes.
    #[error("randomness source failed")]
    RandomnessFailure,

    /// The container string could not be decoded.
    #[error("malformed container: {0}")]
    Decode(#[from] DecodeError),

    /// Decrypted bytes were not a valid idea list.
    #[error("decrypted payload is not a valid idea list")]
    PayloadParse,

    /// The idea list could not be serialised before sealing.
    #[error("failed to serialise idea list")]
    Serialization,
}
