//! The reminder run: fetch, classify, render, deliver
//!
//! [`Reminder`] is the single orchestrator. It is generic over where PRs
//! come from ([`PrSource`]) and where messages go ([`Notifier`]) so the same
//! pipeline runs against GitHub and Slack in production and against
//! in-memory fakes in tests.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::chunk::chunk;
use crate::{Config, Digest, PullRequest, Repository, Result};

/// Supplier of the complete set of open PRs
#[async_trait]
pub trait PrSource: Send + Sync {
    /// Fetch every open PR of `repo`, across all pages
    async fn fetch_open_prs(&self, repo: &Repository) -> Result<Vec<PullRequest>>;
}

/// Destination for rendered messages
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post `text` to `channel`; callers chunk beforehand
    async fn post(&self, channel: &str, text: &str) -> Result<()>;
}

/// What a run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Open PRs fetched
    pub fetched: usize,
    /// Drafts and WIP PRs left out
    pub skipped: usize,
    /// PRs with reviewers that matched no channel
    pub unrouted: usize,
    /// Channels that received a reviewer digest
    pub channels: usize,
    /// PRs listed in the unassigned digest
    pub unassigned: usize,
    /// Messages posted (one per chunk)
    pub posted: usize,
}

/// Orchestrates one reminder run
pub struct Reminder<'a, S, N> {
    config: &'a Config,
    repo: Repository,
    source: S,
    notifier: N,
}

impl<'a, S: PrSource, N: Notifier> Reminder<'a, S, N> {
    /// Create a reminder for the repository named in `config`
    pub fn new(config: &'a Config, source: S, notifier: N) -> Result<Self> {
        let repo = config.repository()?;
        Ok(Self {
            config,
            repo,
            source,
            notifier,
        })
    }

    /// The repository being reported on
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// The notifier
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Fetch and classify without delivering anything
    pub async fn digest(&self) -> Result<Digest> {
        info!(repo = %self.repo, "Fetching open PRs");
        let prs = self.source.fetch_open_prs(&self.repo).await?;
        info!(count = prs.len(), "Found open PRs");

        Ok(Digest::build(&prs, &self.config.routing))
    }

    /// Run once: the first failing fetch or post aborts the run, messages
    /// already posted stay posted
    pub async fn run(&self) -> Result<RunSummary> {
        let digest = self.digest().await?;

        let mut summary = RunSummary {
            fetched: digest.stats.total,
            skipped: digest.stats.skipped,
            unrouted: digest.stats.unrouted,
            channels: digest.channels.len(),
            unassigned: digest.unassigned.len(),
            posted: 0,
        };

        if digest.is_empty() {
            info!("No open PRs to notify");
            return Ok(summary);
        }

        let messages = digest.render(&self.repo, &self.config.mentions, &self.config.messages);
        for message in &messages {
            let chunks = chunk(&message.text, self.config.slack.max_message_chars);
            debug!(channel = %message.channel, chunks = chunks.len(), "Delivering digest");

            for part in &chunks {
                self.notifier.post(&message.channel, part).await?;
                summary.posted += 1;
            }
        }

        info!(
            channels = summary.channels,
            unassigned = summary.unassigned,
            posted = summary.posted,
            "PR review reminders sent"
        );

        Ok(summary)
    }
}
