//! Label-based channel routing

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, Result};

/// A rule sending PRs that carry any of `labels_any` to `channel_id`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoutingRule {
    /// Labels to match (any match triggers the rule)
    #[serde(default)]
    pub labels_any: Vec<String>,
    /// Target Slack channel ID
    #[serde(default)]
    pub channel_id: String,
}

impl RoutingRule {
    /// Create a rule from labels and a channel
    pub fn new<I, S>(labels_any: I, channel_id: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels_any: labels_any.into_iter().map(Into::into).collect(),
            channel_id: channel_id.into(),
        }
    }

    /// Whether any of the rule's labels is present in `labels`
    pub fn matches(&self, labels: &[String]) -> bool {
        self.labels_any.iter().any(|l| labels.contains(l))
    }
}

/// Ordered routing rules plus an optional fallback channel
///
/// Deserializes from the same JSON shape the action input uses:
/// `{"default_channel_id": "C0", "rules": [{"labels_any": ["ui"], "channel_id": "C1"}]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingTable {
    /// Channel used when no rule matches
    pub default_channel_id: Option<String>,
    /// Rules, evaluated in order
    pub rules: Vec<RoutingRule>,
}

impl RoutingTable {
    /// Parse a routing table from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Failed to parse routing table: {}", e)))
    }

    /// The configured default channel, if any
    pub fn default_channel(&self) -> Option<&str> {
        self.default_channel_id.as_deref()
    }

    /// Pick the destination channel for a PR's labels
    pub fn route(&self, labels: &[String]) -> Option<&str> {
        route(labels, &self.rules, self.default_channel())
    }

    /// Normalise and check the table
    ///
    /// A blank default channel means "no default". Rules with a blank
    /// channel are rejected; rules without labels never match.
    pub fn validate(&mut self) -> Result<()> {
        if self
            .default_channel_id
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            self.default_channel_id = None;
        }

        for (index, rule) in self.rules.iter().enumerate() {
            if rule.channel_id.trim().is_empty() {
                return Err(Error::Config(format!(
                    "Routing rule #{} ({}) has an empty channel_id",
                    index + 1,
                    rule.labels_any.join(", ")
                )));
            }
            if rule.labels_any.is_empty() {
                warn!(
                    rule = index + 1,
                    channel = %rule.channel_id,
                    "Routing rule has no labels_any and will never match"
                );
            }
        }

        Ok(())
    }
}

/// Return the channel of the first rule whose labels intersect `labels`,
/// falling back to `default`
pub fn route<'a>(
    labels: &[String],
    rules: &'a [RoutingRule],
    default: Option<&'a str>,
) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.matches(labels))
        .map(|rule| rule.channel_id.as_str())
        .or(default)
}
