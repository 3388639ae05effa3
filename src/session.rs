//! The viewer-side unlock session.
//!
//! ```text
//! Locked ──attempt──▶ Verifying ──ok──▶ Unlocked
//!    ▲                    │                 │
//!    └──── failed ────────┘                 │
//!    └───────────────── lock ───────────────┘
//! ```
//!
//! Every failure (malformed container, wrong password, tampered ciphertext,
//! decrypted bytes that aren't an idea list) becomes the same
//! [`UnlockFailed`]. The derived key lives only inside a single verify step,
//! and the unlocked idea list is held in exactly one place so that
//! [`UnlockSession::lock`] can scrub it.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::crypto::SALT_LEN;
use crate::error::Error;
use crate::ideas::Ideas;
use crate::keys::{self, Password};

/// The only failure a viewer ever sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("incorrect password")]
pub struct UnlockFailed;

/// Problems with the session itself, before any password is tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The page was built without a container.
    #[error("no encrypted data available")]
    NoData,
}

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for a password. `error_shown` is set after a failed attempt.
    Locked { error_shown: bool },
    /// A password is being checked.
    Verifying,
    /// The idea list is available.
    Unlocked,
}

enum Phase {
    Locked { error_shown: bool },
    Verifying,
    Unlocked(Ideas),
}

impl Phase {
    fn state(&self) -> SessionState {
        match self {
            Self::Locked { error_shown } => SessionState::Locked {
                error_shown: *error_shown,
            },
            Self::Verifying => SessionState::Verifying,
            Self::Unlocked(_) => SessionState::Unlocked,
        }
    }

    fn ideas(&self) -> Option<&Ideas> {
        match self {
            Self::Unlocked(ideas) => Some(ideas),
            _ => None,
        }
    }

    fn settle(result: Result<Ideas, UnlockFailed>) -> Self {
        match result {
            Ok(ideas) => Self::Unlocked(ideas),
            Err(UnlockFailed) => Self::Locked { error_shown: true },
        }
    }
}

fn checked_container(container: String) -> Result<String, SessionError> {
    if container.trim().is_empty() {
        return Err(SessionError::NoData);
    }
    Ok(container)
}

/// Decode, derive, open, and parse. The password and derived key are gone by
/// the time this returns.
///
/// A container that fails to decode still pays for one derivation, so every
/// failure takes as long as a wrong password.
fn verify(container: &str, password: Password) -> Result<Ideas, UnlockFailed> {
    match crate::decrypt(container, &password) {
        Ok(ideas) => {
            tracing::info!(count = ideas.len(), "ideas unlocked");
            Ok(ideas)
        }
        Err(err) => {
            if matches!(err, Error::Decode(_)) {
                drop(keys::derive(&password, &[0u8; SALT_LEN]));
            }
            tracing::debug!("unlock attempt failed");
            Err(UnlockFailed)
        }
    }
}

// ---------------------------------------------------------------------------
// Synchronous session
// ---------------------------------------------------------------------------

/// A single page's unlock state, driven synchronously.
///
/// `attempt_unlock` blocks for the duration of key derivation. Interactive
/// runtimes should use [`AsyncUnlockSession`] instead.
pub struct UnlockSession {
    container: String,
    phase: Phase,
}

impl UnlockSession {
    pub fn new(container: impl Into<String>) -> Result<Self, SessionError> {
        Ok(Self {
            container: checked_container(container.into())?,
            phase: Phase::Locked { error_shown: false },
        })
    }

    pub fn state(&self) -> SessionState {
        self.phase.state()
    }

    /// The unlocked ideas, if any.
    pub fn ideas(&self) -> Option<&Ideas> {
        self.phase.ideas()
    }

    /// Try a password. An already unlocked session is locked first, so a
    /// wrong password never leaves old plaintext readable.
    pub fn attempt_unlock(&mut self, password: Password) -> Result<&Ideas, UnlockFailed> {
        self.phase = Phase::Verifying;
        self.phase = Phase::settle(verify(&self.container, password));
        self.phase.ideas().ok_or(UnlockFailed)
    }

    /// Return to `Locked`, dropping (and zeroising) the unlocked ideas.
    pub fn lock(&mut self) {
        self.phase = Phase::Locked { error_shown: false };
    }
}

// ---------------------------------------------------------------------------
// Asynchronous session
// ---------------------------------------------------------------------------

/// How an asynchronous attempt ended, when it didn't fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// This attempt's password was correct; the session is unlocked.
    Unlocked,
    /// A newer attempt or a `lock()` started while this one was verifying.
    /// Its result was discarded without being looked at.
    Superseded,
}

struct Shared {
    phase: Phase,
    generation: u64,
}

/// An unlock session whose key derivation runs on the blocking thread pool.
///
/// Cheap to clone; clones share state. The newest attempt wins: when a second
/// attempt (or a `lock()`) starts while one is verifying, the earlier one's
/// result is dropped as soon as it finishes.
#[derive(Clone)]
pub struct AsyncUnlockSession {
    container: Arc<str>,
    shared: Arc<Mutex<Shared>>,
}

impl AsyncUnlockSession {
    pub fn new(container: impl Into<String>) -> Result<Self, SessionError> {
        Ok(Self {
            container: Arc::from(checked_container(container.into())?),
            shared: Arc::new(Mutex::new(Shared {
                phase: Phase::Locked { error_shown: false },
                generation: 0,
            })),
        })
    }

    pub async fn state(&self) -> SessionState {
        self.shared.lock().await.phase.state()
    }

    /// Run `f` against the unlocked ideas without copying them out.
    pub async fn with_ideas<R>(&self, f: impl FnOnce(&Ideas) -> R) -> Option<R> {
        self.shared.lock().await.phase.ideas().map(f)
    }

    /// Try a password without blocking the calling task.
    ///
    /// Once the session has entered `Verifying`, the attempt runs to
    /// completion on a detached task. Dropping the returned future stops the
    /// caller from hearing the outcome but the session still settles.
    pub async fn attempt_unlock(&self, password: Password) -> Result<Attempt, UnlockFailed> {
        let generation = {
            let mut shared = self.shared.lock().await;
            shared.generation += 1;
            shared.phase = Phase::Verifying;
            shared.generation
        };

        let container = Arc::clone(&self.container);
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || verify(&container, password))
                .await
                .unwrap_or(Err(UnlockFailed));
            settle(&shared, generation, result).await
        })
        .await
        .unwrap_or(Err(UnlockFailed))
    }

    /// Return to `Locked`, scrubbing the ideas and superseding any attempt
    /// still verifying.
    pub async fn lock(&self) {
        let mut shared = self.shared.lock().await;
        shared.generation += 1;
        shared.phase = Phase::Locked { error_shown: false };
    }
}

async fn settle(
    shared: &Mutex<Shared>,
    generation: u64,
    result: Result<Ideas, UnlockFailed>,
) -> Result<Attempt, UnlockFailed> {
    let mut shared = shared.lock().await;
    if shared.generation != generation {
        tracing::debug!(generation, "discarding superseded unlock attempt");
        return Ok(Attempt::Superseded);
    }

    shared.phase = Phase::settle(result);
    match shared.phase {
        Phase::Unlocked(_) => Ok(Attempt::Unlocked),
        _ => Err(UnlockFailed),
    }
}
