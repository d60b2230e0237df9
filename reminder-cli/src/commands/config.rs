//! Config command - show the resolved configuration

use std::path::Path;

use clap::Args;
use reminder_core::{Config, Secrets};

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Repository as owner/repo (overrides config and GITHUB_REPOSITORY)
    #[arg(long)]
    pub repo: Option<String>,
}

impl ConfigArgs {
    /// Execute the config command
    pub fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<()> {
        let mut config = Config::load(config_path)?
            .with_env_overrides()?
            .with_cli_overrides(self.repo.clone(), false);
        let validation = config.validate();
        let secrets = Secrets::load()?;

        println!("PR Reminder Configuration");
        println!("=========================");
        println!();
        println!("Repository: {}", config.repository.as_deref().unwrap_or("(not set)"));
        println!("Dry run: {}", config.dry_run);
        println!();
        println!("Routing:");
        println!(
            "  default channel: {}",
            config.routing.default_channel().unwrap_or("(none)")
        );
        for (index, rule) in config.routing.rules.iter().enumerate() {
            println!(
                "  {}. [{}] -> {}",
                index + 1,
                rule.labels_any.join(", "),
                rule.channel_id
            );
        }
        println!();
        println!("Mapped Slack users: {}", config.mentions.len());
        println!("GitHub API: {} (max {} pages)", config.github.api_url, config.github.max_pages);
        println!(
            "Slack API: {} (max {} chars per message)",
            config.slack.api_url, config.slack.max_message_chars
        );
        println!();
        println!("Tokens:");
        println!("  github: {}", present(secrets.github_token().is_some()));
        println!("  slack: {}", present(secrets.slack_bot_token().is_some()));
        println!();

        let file = config_path
            .map(Path::to_path_buf)
            .or_else(Config::default_config_path);
        if let Some(path) = file {
            println!("Config file: {}", path.display());
            if path.exists() {
                println!("  (exists)");
            } else {
                println!("  (not found - using defaults)");
            }
        }

        match validation {
            Ok(()) => println!("Configuration is valid"),
            Err(e) => println!("Configuration is invalid: {}", e),
        }

        Ok(())
    }
}

fn present(found: bool) -> &'static str {
    if found {
        "set"
    } else {
        "missing"
    }
}
