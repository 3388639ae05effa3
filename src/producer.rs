//! The operator-side workflow: load ideas, read a password twice, seal,
//! and print the container string with distribution instructions.
//!
//! Status text (preview, progress) goes to one writer and the container
//! block to another, so the binary can keep stdout empty on every failure.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::IgnoredAny;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{ProducerConfig, MIN_PASSWORD_LEN};
use crate::error::Error;
use crate::ideas::Ideas;
use crate::keys::Password;

const RULE: &str = "==================================================";

/// Operator input that was rejected. Every variant ends the run with exit
/// code 1 and no container output.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("passwords don't match")]
    PasswordMismatch,

    #[error("password must be at least {min} characters long (got {actual})")]
    PasswordTooShort { min: usize, actual: usize },

    #[error("could not parse {}: {source}", .path.display())]
    MalformedIdeaFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("could not read {}: {source}", .path.display())]
    ReadIdeaFile { path: PathBuf, source: io::Error },

    #[error("could not read password: {0}")]
    Prompt(#[source] io::Error),
}

/// Any reason the producer stopped without printing a container.
#[derive(Debug, Error)]
pub enum ProducerError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Crypto(#[from] Error),

    #[error("could not write output: {0}")]
    Output(#[from] io::Error),
}

/// Where the idea list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdeaOrigin {
    File(PathBuf),
    Example,
}

/// Reads a password without echoing it.
pub trait PasswordSource {
    fn read_password(&mut self, prompt: &str) -> io::Result<Password>;
}

/// Prompts on the controlling terminal via `rpassword`.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl PasswordSource for TerminalPrompt {
    fn read_password(&mut self, prompt: &str) -> io::Result<Password> {
        rpassword::prompt_password(prompt).map(Password::from)
    }
}

/// Load the idea list from `path`, or the example list if it doesn't exist.
pub fn load_ideas(path: &Path) -> Result<(Ideas, IdeaOrigin), InputError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => Zeroizing::new(bytes),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no idea file, using example list");
            return Ok((Ideas::example(), IdeaOrigin::Example));
        }
        Err(source) => {
            return Err(InputError::ReadIdeaFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let ideas =
        serde_json::from_slice(&bytes).map_err(|source| InputError::MalformedIdeaFile {
            path: path.to_path_buf(),
            source,
        })?;

    let dropped = dropped_fields(&bytes);
    if !dropped.is_empty() {
        tracing::warn!(
            path = %path.display(),
            fields = ?dropped,
            "idea file fields not carried into the container"
        );
    }
    Ok((ideas, IdeaOrigin::File(path.to_path_buf())))
}

const IDEA_FIELDS: [&str; 4] = ["title", "description", "tags", "date"];

#[derive(Deserialize)]
struct FieldNames {
    #[serde(flatten)]
    fields: BTreeMap<String, IgnoredAny>,
}

/// Names of idea fields other than `title`, `description`, `tags` and `date`,
/// sorted and deduplicated. Values are skipped without being copied.
fn dropped_fields(bytes: &[u8]) -> Vec<String> {
    let ideas: Vec<FieldNames> = serde_json::from_slice(bytes).unwrap_or_default();
    let mut dropped: Vec<String> = ideas
        .into_iter()
        .flat_map(|idea| idea.fields.into_keys())
        .filter(|name| !IDEA_FIELDS.contains(&name.as_str()))
        .collect();
    dropped.sort();
    dropped.dedup();
    dropped
}

/// Check the two password entries: they must match exactly, then be long
/// enough. Both entries are consumed and zeroised.
pub fn validate_password(first: Password, confirm: Password) -> Result<Password, InputError> {
    if first != confirm {
        return Err(InputError::PasswordMismatch);
    }
    let actual = first.char_len();
    if actual < MIN_PASSWORD_LEN {
        return Err(InputError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
            actual,
        });
    }
    Ok(first)
}

/// Run the producer once.
///
/// `status` receives the banner, preview, and progress notes; `out` receives
/// the container block and nothing else, and only on success.
pub fn run<P, O, S>(
    config: &ProducerConfig,
    passwords: &mut P,
    out: &mut O,
    status: &mut S,
) -> Result<(), ProducerError>
where
    P: PasswordSource + ?Sized,
    O: Write + ?Sized,
    S: Write + ?Sized,
{
    writeln!(status, "Post Ideas Encryption Tool")?;
    writeln!(status, "{RULE}")?;

    let (ideas, origin) = load_ideas(&config.ideas_path)?;
    match &origin {
        IdeaOrigin::File(path) => writeln!(status, "Loading ideas from {}", path.display())?,
        IdeaOrigin::Example => writeln!(
            status,
            "Using example ideas (create {} to use your own)",
            config.ideas_path.display()
        )?,
    }
    tracing::info!(count = ideas.len(), ?origin, "loaded ideas");

    if config.show_preview {
        writeln!(status, "\nPost ideas to encrypt:")?;
        writeln!(status, "{}\n", ideas.to_json_pretty()?)?;
    }

    let first = passwords
        .read_password("Enter encryption password: ")
        .map_err(InputError::Prompt)?;
    let confirm = passwords
        .read_password("Confirm password: ")
        .map_err(InputError::Prompt)?;
    let password = validate_password(first, confirm)?;

    let encoded = crate::encrypt(&ideas, &password)?;
    drop(password);
    tracing::info!(container_len = encoded.len(), "encryption successful");

    writeln!(status, "Encryption successful!")?;
    write_instructions(out, &config.secret_name, &encoded)?;
    out.flush()?;
    Ok(())
}

fn write_instructions<W: Write + ?Sized>(
    out: &mut W,
    secret_name: &str,
    encoded: &str,
) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Add this as a secret named '{secret_name}':")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{encoded}")?;
    writeln!(out, "{RULE}")?;
    writeln!(out)?;
    writeln!(out, "To publish it:")?;
    writeln!(
        out,
        "1. Store the string above as a build secret named {secret_name}"
    )?;
    writeln!(
        out,
        "2. Expose {secret_name} to the site build so the ideas page can embed it"
    )?;
    writeln!(
        out,
        "3. Keep the password out of the repository; it is the only key"
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_is_checked_before_length() {
        let result = validate_password(Password::from("short"), Password::from("other"));
        assert!(matches!(result, Err(InputError::PasswordMismatch)));
    }

    #[test]
    fn test_length_boundary() {
        let eleven = "a".repeat(11);
        let twelve = "a".repeat(12);

        assert!(matches!(
            validate_password(Password::new(eleven.clone()), Password::new(eleven)),
            Err(InputError::PasswordTooShort { min: 12, actual: 11 })
        ));
        assert!(validate_password(Password::new(twelve.clone()), Password::new(twelve)).is_ok());
    }

    #[test]
    fn test_confirmation_must_match_exactly() {
        let result = validate_password(
            Password::from("correcthorsebattery"),
            Password::from("correcthorsebattery "),
        );
        assert!(matches!(result, Err(InputError::PasswordMismatch)));
    }

    #[test]
    fn test_missing_file_uses_example() {
        let dir = tempfile::tempdir().unwrap();
        let (ideas, origin) = load_ideas(&dir.path().join("post_ideas.json")).unwrap();
        assert_eq!(origin, IdeaOrigin::Example);
        assert_eq!(ideas, Ideas::example());
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post_ideas.json");
        fs::write(&path, "[{\"title\": ").unwrap();
        assert!(matches!(
            load_ideas(&path),
            Err(InputError::MalformedIdeaFile { .. })
        ));
    }

    #[test]
    fn test_unknown_idea_fields_are_reported() {
        let bytes = br#"[{"title":"A","draft":true,"slug":"a"},{"title":"B","draft":false}]"#;
        assert_eq!(dropped_fields(bytes), ["draft", "slug"]);
        assert!(dropped_fields(br#"[{"title":"A","tags":["x"],"date":null}]"#).is_empty());
    }

    #[test]
    fn test_file_with_extra_fields_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post_ideas.json");
        fs::write(&path, r#"[{"title":"A","draft":true}]"#).unwrap();

        let (ideas, origin) = load_ideas(&path).unwrap();
        assert_eq!(origin, IdeaOrigin::File(path));
        assert_eq!(ideas.len(), 1);
    }

    #[test]
    fn test_directory_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_ideas(dir.path()),
            Err(InputError::ReadIdeaFile { .. })
        ));
    }
}
