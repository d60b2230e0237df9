//! Grouping of open PRs into per-channel, per-reviewer digests
//!
//! A [`Digest`] is built fresh every run from the fetched PR list:
//!
//! ```text
//! channel ──► reviewer ──► [PrSummary]      (PRs with requested reviewers)
//! default channel ──► [PrSummary]           (PRs nobody was asked to review)
//! ```
//!
//! Channels keep the order in which they were first routed to, reviewers
//! are ordered by login, PRs by number.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::MessageConfig;
use crate::{MentionTable, PrSummary, PullRequest, Repository, RoutingTable};

/// Sort a copy of `items` by `key`, keeping equal keys in input order
pub fn stable_sort_by_key<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut sorted = items.to_vec();
    sorted.sort_by_key(key);
    sorted
}

/// Reviewer buckets for one destination channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDigest {
    /// Slack channel ID
    pub channel_id: String,
    /// Reviewer login to the PRs awaiting their review
    pub reviewers: BTreeMap<String, Vec<PrSummary>>,
}

/// Counters describing how the fetched PRs were classified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigestStats {
    /// PRs considered
    pub total: usize,
    /// Drafts and WIP PRs left out
    pub skipped: usize,
    /// PRs with reviewers for which no channel was found
    pub unrouted: usize,
    /// PRs without reviewers dropped because no default channel exists
    pub dropped_unassigned: usize,
}

/// A text block ready to be chunked and posted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Destination channel
    pub channel: String,
    /// Full rendered text (not yet chunked)
    pub text: String,
}

/// Classified open PRs for a single run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Digest {
    /// Per-channel reviewer buckets, in first-routed order
    pub channels: Vec<ChannelDigest>,
    /// Channel receiving PRs without reviewers (the routing default)
    pub unassigned_channel: Option<String>,
    /// PRs without requested reviewers
    pub unassigned: Vec<PrSummary>,
    /// Classification counters
    pub stats: DigestStats,
}

impl Digest {
    /// Filter and classify `prs` according to `routing`
    pub fn build(prs: &[PullRequest], routing: &RoutingTable) -> Self {
        let mut digest = Digest {
            unassigned_channel: routing
                .default_channel()
                .filter(|c| !c.trim().is_empty())
                .map(str::to_string),
            ..Default::default()
        };
        digest.stats.total = prs.len();

        for pr in prs {
            if pr.is_wip_or_draft() {
                debug!(number = pr.number, title = %pr.title, "Skipping WIP/Draft PR");
                digest.stats.skipped += 1;
                continue;
            }

            let mut reviewers: Vec<&str> = Vec::new();
            for login in pr.requested_reviewers.iter().filter(|l| !l.is_empty()) {
                if !reviewers.contains(&login.as_str()) {
                    reviewers.push(login);
                }
            }

            if reviewers.is_empty() {
                if digest.unassigned_channel.is_some() {
                    digest.unassigned.push(pr.summary());
                } else {
                    debug!(number = pr.number, "No reviewers and no default channel, dropping PR");
                    digest.stats.dropped_unassigned += 1;
                }
                continue;
            }

            let Some(channel) = routing.route(&pr.labels).filter(|c| !c.trim().is_empty()) else {
                debug!(number = pr.number, labels = ?pr.labels, "No channel for PR labels");
                digest.stats.unrouted += 1;
                continue;
            };

            let summary = pr.summary();
            let buckets = digest.channel_mut(channel);
            for login in reviewers {
                buckets
                    .entry(login.to_string())
                    .or_default()
                    .push(summary.clone());
            }
        }

        digest
    }

    fn channel_mut(&mut self, channel: &str) -> &mut BTreeMap<String, Vec<PrSummary>> {
        let index = match self.channels.iter().position(|c| c.channel_id == channel) {
            Some(index) => index,
            None => {
                self.channels.push(ChannelDigest {
                    channel_id: channel.to_string(),
                    reviewers: BTreeMap::new(),
                });
                self.channels.len() - 1
            }
        };
        &mut self.channels[index].reviewers
    }

    /// Whether there is nothing to send
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty() && self.unassigned.is_empty()
    }

    /// Render every channel block, then the unassigned block
    pub fn render(
        &self,
        repo: &Repository,
        mentions: &MentionTable,
        messages: &MessageConfig,
    ) -> Vec<OutboundMessage> {
        let mut out: Vec<OutboundMessage> = self
            .channels
            .iter()
            .map(|channel| OutboundMessage {
                channel: channel.channel_id.clone(),
                text: render_channel(channel, repo, mentions, &messages.review_header),
            })
            .collect();

        if let Some(channel) = &self.unassigned_channel {
            if !self.unassigned.is_empty() {
                out.push(OutboundMessage {
                    channel: channel.clone(),
                    text: render_unassigned(&self.unassigned, repo, &messages.unassigned_header),
                });
            }
        }

        out
    }
}

fn header_line(header: &str, repo: &Repository) -> String {
    format!("*{}*  `{}`", header, repo)
}

fn render_channel(
    channel: &ChannelDigest,
    repo: &Repository,
    mentions: &MentionTable,
    header: &str,
) -> String {
    let mut lines = vec![header_line(header, repo), String::new()];

    for (login, prs) in &channel.reviewers {
        lines.push(format!("*{}*", mentions.mention(login)));
        for pr in stable_sort_by_key(prs, |pr| pr.number) {
            lines.push(pr.to_line());
        }
        lines.push(String::new());
    }

    lines.join("\n").trim().to_string()
}

fn render_unassigned(prs: &[PrSummary], repo: &Repository, header: &str) -> String {
    let mut lines = vec![header_line(header, repo), String::new()];
    lines.extend(
        stable_sort_by_key(prs, |pr| pr.number)
            .iter()
            .map(PrSummary::to_line),
    );

    lines.join("\n").trim().to_string()
}
