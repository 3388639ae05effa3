//! Reference consumer: unlock an embedded container in the terminal.
//!
//! The container comes from `--container` or `ENCRYPTED_IDEAS`, exactly as a
//! site build would receive it.

use std::io;

use anyhow::{bail, Result};
use clap::Parser;
use ideavault::config::{ConsumerConfig, DEFAULT_UNLOCK_ATTEMPTS};
use ideavault::logging;
use ideavault::render::{PlainText, Render};
use ideavault::session::{AsyncUnlockSession, Attempt};
use ideavault::Password;

#[derive(Debug, Parser)]
#[command(name = "unlock-ideas", version, about = "Unlock encrypted post ideas")]
struct Cli {
    /// Container string produced by encrypt-ideas
    #[arg(long, env = "ENCRYPTED_IDEAS", hide_env_values = true, default_value = "")]
    container: String,

    /// Password attempts before giving up
    #[arg(
        long,
        default_value_t = DEFAULT_UNLOCK_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    attempts: u32,

    /// Log filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let config = ConsumerConfig {
        container: cli.container,
        max_attempts: cli.attempts,
    };
    let session = AsyncUnlockSession::new(config.container)?;

    for _ in 0..config.max_attempts {
        let password =
            tokio::task::spawn_blocking(|| rpassword::prompt_password("Password: ")).await??;

        match session.attempt_unlock(Password::from(password)).await {
            Ok(Attempt::Unlocked) => {
                session
                    .with_ideas(|ideas| PlainText.render(ideas, &mut io::stdout().lock()))
                    .await
                    .transpose()?;
                session.lock().await;
                return Ok(());
            }
            Ok(Attempt::Superseded) => continue,
            Err(err) => eprintln!("{err}. Please try again."),
        }
    }

    bail!("no attempts left")
}
