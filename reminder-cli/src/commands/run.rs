//! Run command - fetch open PRs and post the reminders

use std::path::Path;

use anyhow::Context;
use clap::Args;
use reminder_core::{Config, Reminder, Secrets};
use reminder_github::GitHubClient;
use reminder_slack::SlackNotifier;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Repository as owner/repo (overrides config and GITHUB_REPOSITORY)
    #[arg(long)]
    pub repo: Option<String>,

    /// Log the messages instead of posting them
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<()> {
        let config = Config::load_with_overrides(config_path, self.repo.clone(), self.dry_run)
            .context("Invalid configuration")?;

        let secrets = Secrets::load()?;
        let github = GitHubClient::from_config(&config.github, &secrets.require_github_token()?)?;

        let slack_token = if config.dry_run {
            secrets.slack_bot_token()
        } else {
            Some(secrets.require_slack_bot_token()?)
        };
        let slack = SlackNotifier::from_config(&config.slack, slack_token.as_deref(), config.dry_run)?;

        let reminder = Reminder::new(&config, github, slack)?;
        tracing::info!(
            repo = %reminder.repository(),
            dry_run = config.dry_run,
            rules = config.routing.rules.len(),
            "Starting PR review reminder"
        );

        let summary = reminder.run().await?;
        tracing::info!(
            fetched = summary.fetched,
            skipped = summary.skipped,
            unrouted = summary.unrouted,
            posted = summary.posted,
            "Run complete"
        );

        Ok(())
    }
}
