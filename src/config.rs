//! Explicit configuration values.
//!
//! Nothing in the library reads the environment. The binaries resolve flags
//! and environment variables through `clap` and hand the result in here.

use std::path::PathBuf;

/// Idea file the producer looks for when none is given.
pub const DEFAULT_IDEAS_FILE: &str = "post_ideas.json";

/// Secret / environment variable name the site build reads the container from.
pub const DEFAULT_SECRET_NAME: &str = "ENCRYPTED_IDEAS";

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 12;

/// Default number of password attempts the reference consumer allows.
pub const DEFAULT_UNLOCK_ATTEMPTS: u32 = 3;

/// Settings for one run of the producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerConfig {
    /// Idea file to encrypt. A missing file falls back to the example list.
    pub ideas_path: PathBuf,
    /// Name printed in the distribution instructions.
    pub secret_name: String,
    /// Print the plaintext ideas before prompting for a password.
    pub show_preview: bool,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            ideas_path: PathBuf::from(DEFAULT_IDEAS_FILE),
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            show_preview: true,
        }
    }
}

/// Settings for the reference consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerConfig {
    /// The container string the page embeds. Empty when the site was built
    /// without the secret.
    pub container: String,
    /// Password attempts before giving up.
    pub max_attempts: u32,
}
