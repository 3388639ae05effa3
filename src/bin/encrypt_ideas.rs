//! Offline producer: seal a list of post ideas into a container string.
//!
//! Run with: `cargo run --bin encrypt-ideas -- --ideas post_ideas.json`

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ideavault::config::{ProducerConfig, DEFAULT_IDEAS_FILE, DEFAULT_SECRET_NAME};
use ideavault::logging;
use ideavault::producer::{self, TerminalPrompt};

#[derive(Debug, Parser)]
#[command(name = "encrypt-ideas", version, about = "Encrypt post ideas for a static site")]
struct Cli {
    /// JSON idea list to encrypt; the example list is used if it doesn't exist
    #[arg(long, env = "IDEAVAULT_IDEAS_FILE", default_value = DEFAULT_IDEAS_FILE)]
    ideas: PathBuf,

    /// Secret name to print in the instructions
    #[arg(long, default_value = DEFAULT_SECRET_NAME)]
    secret_name: String,

    /// Don't print the plaintext ideas before prompting
    #[arg(long)]
    no_preview: bool,

    /// Log filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let config = ProducerConfig {
        ideas_path: cli.ideas,
        secret_name: cli.secret_name,
        show_preview: !cli.no_preview,
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    match producer::run(
        &config,
        &mut TerminalPrompt,
        &mut stdout.lock(),
        &mut stderr.lock(),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "producer failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
