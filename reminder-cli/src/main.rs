//! pr-reminder - post open pull request review reminders to Slack
//!
//! Groups the open PRs of a repository by label-routed channel and by
//! requested reviewer, then posts one digest per channel.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{ConfigArgs, RunArgs};

/// Post open pull request review reminders to Slack
#[derive(Parser, Debug)]
#[command(name = "pr-reminder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ~/.config/pr-reminder/config.toml)
    #[arg(short, long, global = true, env = "PR_REMINDER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch open PRs and post reminders (the default)
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Show the resolved configuration
    Config(ConfigArgs),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Some(Commands::Version) => {
            println!("pr-reminder {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Commands::Config(args)) => args.execute(config_path),
        Some(Commands::Run(args)) => args.execute(config_path).await,
        None => RunArgs::default().execute(config_path).await,
    };

    if let Err(err) = &result {
        tracing::error!(error = %format!("{:#}", err), "PR review reminder failed");
        if std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
            println!("::error::{}", escape_workflow_command(&format!("{:#}", err)));
        }
    }

    result
}

/// Escape a message for a GitHub Actions workflow command
fn escape_workflow_command(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
