//! Password handling and key derivation.
//!
//! This module owns two responsibilities:
//! 1. Deriving a container key from a password and salt using
//!    PBKDF2-HMAC-SHA256.
//! 2. Holding secret material (passwords, derived keys) in types that are
//!    non-cloneable, redacted in `Debug`, and zeroised on drop.
//!
//! This is one of exactly two modules permitted to import `ring` directly
//! (the other is `crypto`).
//!
//! ## Derivation parameters
//!
//! ```text
//! PBKDF2(
//!     prf        = HMAC-SHA256,
//!     password   = UTF-8 bytes of the password,
//!     salt       = 16 random bytes from the container,
//!     iterations = 100_000,
//!     dk_len     = 32,
//! )
//! ```
//!
//! These must match every other consumer of the container format exactly.
//! A browser doing the same derivation through WebCrypto, or the operator's
//! machine through OpenSSL, must arrive at the same 32 bytes.

use std::fmt;
use std::num::NonZeroU32;

use ring::pbkdf2;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{KEY_LEN, SALT_LEN};

/// PBKDF2 iteration count shared by producer and consumer.
pub const PBKDF2_ITERATIONS: NonZeroU32 = match NonZeroU32::new(100_000) {
    Some(n) => n,
    None => unreachable!(),
};

// ---------------------------------------------------------------------------
// Password
// ---------------------------------------------------------------------------

/// A password typed by the operator or a viewer.
///
/// - Not `Clone`.
/// - Zeroised on drop.
/// - `Debug` never prints the contents.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Length in characters (Unicode scalar values), not bytes.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Password {}

impl From<String> for Password {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

// ---------------------------------------------------------------------------
// Derived key
// ---------------------------------------------------------------------------

/// A key derived from a password and one container's salt.
///
/// - Not `Clone`. A derived key is scoped to a single seal or open.
/// - Zeroised on drop.
/// - Raw bytes are only reachable through `as_bytes()`, which is `pub(crate)`.
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Borrow the raw key bytes for use in seal/open operations.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive the container key for `password` and `salt`.
///
/// Deliberately slow (100,000 PBKDF2 rounds) and infallible. Identical inputs
/// always produce identical output.
pub fn derive(password: &Password, salt: &[u8; SALT_LEN]) -> DerivedKey {
    derive_with_iterations(password.as_bytes(), salt, PBKDF2_ITERATIONS)
}

pub(crate) fn derive_with_iterations(
    secret: &[u8],
    salt: &[u8],
    iterations: NonZeroU32,
) -> DerivedKey {
    let mut bytes = [0u8; KEY_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        secret,
        &mut bytes,
    );
    DerivedKey { bytes }
}
