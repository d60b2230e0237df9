//! `chat.postMessage` notifier

use std::fmt;

use async_trait::async_trait;
use reminder_core::{Notifier, SlackConfig};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

/// Public Slack Web API
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    unfurl_links: bool,
    unfurl_media: bool,
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts messages to Slack channels, or logs them in dry-run mode
#[derive(Clone)]
pub struct SlackNotifier {
    http: reqwest::Client,
    api_url: String,
    dry_run: bool,
}

impl SlackNotifier {
    /// Create a notifier that posts with the bot `token`
    pub fn new(token: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| Error::Auth(format!("Invalid Slack token: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: DEFAULT_API_URL.to_string(),
            dry_run: false,
        })
    }

    /// Create a notifier that only logs, needing no token
    pub fn dry_run() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: DEFAULT_API_URL.to_string(),
            dry_run: true,
        }
    }

    /// Create a notifier from the `[slack]` configuration section
    ///
    /// `token` may be absent only in dry-run mode.
    pub fn from_config(config: &SlackConfig, token: Option<&str>, dry_run: bool) -> Result<Self> {
        let notifier = if dry_run {
            Self::dry_run()
        } else {
            let token = token.ok_or_else(|| Error::Auth("Slack bot token is required".to_string()))?;
            Self::new(token)?
        };

        Ok(notifier.with_api_url(&config.api_url))
    }

    /// Point the notifier at another API base URL
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    /// Whether messages are logged instead of posted
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Post `text` to `channel` with link and media unfurling disabled
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        if self.dry_run {
            info!("[DRY_RUN] Would post to {}:\n{}\n---", channel, text);
            return Ok(());
        }

        debug!(channel, chars = text.chars().count(), "Posting Slack message");

        let response = self
            .http
            .post(format!("{}/chat.postMessage", self.api_url))
            .json(&PostMessage {
                channel,
                text,
                unfurl_links: false,
                unfurl_media: false,
            })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let data: SlackResponse =
            serde_json::from_str(&body).map_err(|_| Error::Parse { status, body: body.clone() })?;

        if !data.ok {
            return Err(Error::Delivery {
                error: data.error.unwrap_or(body),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn post(&self, channel: &str, text: &str) -> reminder_core::Result<()> {
        Ok(self.post_message(channel, text).await?)
    }
}

impl fmt::Debug for SlackNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackNotifier")
            .field("api_url", &self.api_url)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}
