//! Pull request model shared by sources and renderers

use serde::{Deserialize, Serialize};

/// Author shown when the hosting API omits the PR's user
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// An open pull request as seen by the reminder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number, unique within the repository
    pub number: u64,
    /// PR title (empty when the API omits it)
    pub title: String,
    /// Canonical web URL
    pub url: String,
    /// Login of the author
    pub author: Option<String>,
    /// Whether the PR is a draft
    pub draft: bool,
    /// Label names, in API order
    pub labels: Vec<String>,
    /// Logins of individually requested reviewers, in API order
    pub requested_reviewers: Vec<String>,
}

impl PullRequest {
    /// Whether this PR should be left out of review reminders
    ///
    /// Drafts are excluded, as are titles containing `[wip]` anywhere or
    /// starting with `wip:` (both case-insensitive).
    pub fn is_wip_or_draft(&self) -> bool {
        if self.draft {
            return true;
        }

        let title = self.title.to_lowercase();
        title.contains("[wip]") || title.starts_with("wip:")
    }

    /// Project the fields needed for rendering
    pub fn summary(&self) -> PrSummary {
        PrSummary {
            number: self.number,
            title: self.title.clone(),
            url: self.url.clone(),
            author: self
                .author
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            labels: self.labels.clone(),
        }
    }
}

/// Rendering projection of a [`PullRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrSummary {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub author: String,
    pub labels: Vec<String>,
}

impl PrSummary {
    /// Render as a single bullet line in Slack mrkdwn
    ///
    /// `• <url|#N title> (author: login) [label, label]`
    pub fn to_line(&self) -> String {
        let mut line = format!(
            "• <{}|#{} {}> (author: {})",
            self.url, self.number, self.title, self.author
        );
        if !self.labels.is_empty() {
            line.push_str(&format!(" [{}]", self.labels.join(", ")));
        }
        line
    }
}
