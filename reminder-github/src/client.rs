//! GitHub REST API client

use std::fmt;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reminder_core::GitHubConfig;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{Error, Result};

/// Public GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Pinned REST API version
pub const API_VERSION: &str = "2022-11-28";

/// GitHub API client for pull request listing
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    max_pages: u32,
}

impl GitHubClient {
    /// Create a client for the public API authenticated with `token`
    pub fn new(token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("pr-reminder"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| Error::Auth(format!("Invalid GitHub token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: DEFAULT_API_URL.to_string(),
            max_pages: GitHubConfig::default().max_pages,
        })
    }

    /// Create a client from the `[github]` configuration section
    pub fn from_config(config: &GitHubConfig, token: &str) -> Result<Self> {
        let client = Self::new(token)?
            .with_api_url(&config.api_url)
            .with_max_pages(config.max_pages);

        info!(api_url = %client.api_url, "Created GitHub client");
        Ok(client)
    }

    /// Point the client at another API base URL (GitHub Enterprise, tests)
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    /// Limit how many pages a single listing may fetch
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// API base URL without trailing slash
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Page limit per listing
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// GET `path` with `query` and decode the JSON body
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);
        debug!(%url, ?query, "GitHub GET");

        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}
