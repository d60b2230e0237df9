//! Configuration management for pr-reminder
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (`LABEL_CHANNEL_MAP_JSON`, `SLACK_USER_MAP_JSON`, ...)
//! 3. Config file (~/.config/pr-reminder/config.toml)
//! 4. Default values
//!
//! The resolved [`Config`] is immutable for the duration of a run and is
//! passed by reference to everything that needs it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chunk::DEFAULT_MAX_CHUNK_CHARS;
use crate::{Error, MentionTable, Repository, Result, RoutingTable};

/// JSON routing table (`{"default_channel_id": .., "rules": [..]}`)
pub const ENV_LABEL_CHANNEL_MAP: &str = "LABEL_CHANNEL_MAP_JSON";
/// JSON object mapping GitHub logins to Slack user IDs
pub const ENV_SLACK_USER_MAP: &str = "SLACK_USER_MAP_JSON";
/// Target repository as `owner/repo`
pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
/// `true` or `1` to log messages instead of posting them
pub const ENV_DRY_RUN: &str = "DRY_RUN";
/// Base URL of the GitHub REST API
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";

/// GitHub API settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API base URL
    pub api_url: String,
    /// Upper bound on the number of 100-item pages fetched in one run
    pub max_pages: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            max_pages: 100,
        }
    }
}

/// Slack API settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Web API base URL
    pub api_url: String,
    /// Maximum characters per posted message
    pub max_message_chars: usize,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_url: "https://slack.com/api".to_string(),
            max_message_chars: DEFAULT_MAX_CHUNK_CHARS,
        }
    }
}

/// Message headers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Header of the per-reviewer digest
    pub review_header: String,
    /// Header of the digest of PRs without reviewers
    pub unassigned_header: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            review_header: "Open PRs awaiting review (requested reviewers)".to_string(),
            unassigned_header: "Open PRs with no reviewer assigned".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Target repository (`owner/repo`)
    pub repository: Option<String>,
    /// Log messages instead of posting them
    pub dry_run: bool,
    /// Label to channel routing
    pub routing: RoutingTable,
    /// GitHub login to Slack user ID
    pub mentions: MentionTable,
    /// Message headers
    pub messages: MessageConfig,
    /// GitHub API settings
    pub github: GitHubConfig,
    /// Slack API settings
    pub slack: SlackConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default location
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/pr-reminder/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pr-reminder").join("config.toml"))
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply environment-style overrides from `lookup`
    ///
    /// JSON tables replace the file's tables wholesale.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(json) = get(ENV_LABEL_CHANNEL_MAP) {
            self.routing = RoutingTable::from_json(&json)?;
        }

        if let Some(json) = get(ENV_SLACK_USER_MAP) {
            self.mentions = MentionTable::from_json(&json)?;
        }

        if let Some(repository) = get(ENV_REPOSITORY) {
            self.repository = Some(repository.trim().to_string());
        }

        if let Some(dry_run) = get(ENV_DRY_RUN) {
            self.dry_run = parse_flag(&dry_run);
        }

        if let Some(api_url) = get(ENV_GITHUB_API_URL) {
            self.github.api_url = api_url.trim().to_string();
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, repository: Option<String>, dry_run: bool) -> Self {
        if let Some(repository) = repository {
            self.repository = Some(repository);
        }

        if dry_run {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration with all overrides applied and validate it
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        path: Option<&Path>,
        repository: Option<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let mut config = Self::load(path)?
            .with_env_overrides()?
            .with_cli_overrides(repository, dry_run);
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable, normalising where possible
    pub fn validate(&mut self) -> Result<()> {
        self.routing.validate()?;
        self.repository()?;

        if self.github.max_pages == 0 {
            return Err(Error::Config("github.max_pages must be at least 1".to_string()));
        }
        if self.slack.max_message_chars == 0 {
            return Err(Error::Config(
                "slack.max_message_chars must be at least 1".to_string(),
            ));
        }
        if self.github.api_url.trim().is_empty() || self.slack.api_url.trim().is_empty() {
            return Err(Error::Config("API URLs must not be empty".to_string()));
        }

        Ok(())
    }

    /// The target repository
    pub fn repository(&self) -> Result<Repository> {
        let repository = self.repository.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "Repository not configured. Pass --repo or set {}",
                ENV_REPOSITORY
            ))
        })?;
        Repository::parse(repository)
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoutingRule;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.repository.is_none());
        assert!(!config.dry_run);
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.max_pages, 100);
        assert_eq!(config.slack.max_message_chars, 3500);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
repository = "acme/widgets"

[routing]
default_channel_id = "C0"

[[routing.rules]]
labels_any = ["frontend", "ui"]
channel_id = "C1"

[[routing.rules]]
labels_any = ["backend"]
channel_id = "C2"

[mentions]
alice = "U1"

[slack]
max_message_chars = 2000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.repository.as_deref(), Some("acme/widgets"));
        assert_eq!(config.routing.default_channel(), Some("C0"));
        assert_eq!(config.routing.rules[0], RoutingRule::new(["frontend", "ui"], "C1"));
        assert_eq!(config.routing.rules.len(), 2);
        assert_eq!(config.mentions.mention("alice"), "<@U1>");
        assert_eq!(config.slack.max_message_chars, 2000);
        // untouched sections keep defaults
        assert_eq!(config.slack.api_url, "https://slack.com/api");
        assert_eq!(config.messages, MessageConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "repository = \"acme/widgets\"\ndry_run = true").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.repository.as_deref(), Some("acme/widgets"));
        assert!(config.dry_run);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/pr-reminder.toml"))).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_overrides_from(env(&[
                (
                    ENV_LABEL_CHANNEL_MAP,
                    r#"{"rules":[{"labels_any":["api"],"channel_id":"C9"}]}"#,
                ),
                (ENV_SLACK_USER_MAP, r#"{"bob":"U2"}"#),
                (ENV_REPOSITORY, "acme/widgets"),
                (ENV_DRY_RUN, " TRUE "),
                (ENV_GITHUB_API_URL, "https://ghe.example.test/api/v3"),
            ]))
            .unwrap();

        assert_eq!(config.routing.route(&["api".to_string()]), Some("C9"));
        assert_eq!(config.routing.default_channel(), None);
        assert_eq!(config.mentions.mention("bob"), "<@U2>");
        assert_eq!(config.repository.as_deref(), Some("acme/widgets"));
        assert!(config.dry_run);
        assert_eq!(config.github.api_url, "https://ghe.example.test/api/v3");
    }

    #[test]
    fn test_dry_run_flag_values() {
        for (value, expected) in [("1", true), ("true", true), ("false", false), ("yes", false)] {
            let config = Config::default()
                .with_overrides_from(env(&[(ENV_DRY_RUN, value)]))
                .unwrap();
            assert_eq!(config.dry_run, expected, "DRY_RUN={}", value);
        }
    }

    #[test]
    fn test_malformed_env_json_is_config_error() {
        let err = Config::default()
            .with_overrides_from(env(&[(ENV_LABEL_CHANNEL_MAP, "{not json")]))
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config {
            repository: Some("from/file".to_string()),
            ..Default::default()
        }
        .with_cli_overrides(Some("from/cli".to_string()), true);

        assert_eq!(config.repository.as_deref(), Some("from/cli"));
        assert!(config.dry_run);

        let untouched = Config {
            dry_run: true,
            ..Default::default()
        }
        .with_cli_overrides(None, false);
        assert!(untouched.dry_run);
    }

    #[test]
    fn test_validate_requires_repository() {
        let mut config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Repository not configured"));

        config.repository = Some("acme/widgets".to_string());
        config.validate().unwrap();
        assert_eq!(config.repository().unwrap(), Repository::new("acme", "widgets"));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = Config {
            repository: Some("acme/widgets".to_string()),
            ..Default::default()
        };
        config.slack.max_message_chars = 0;
        assert!(config.validate().is_err());

        config.slack.max_message_chars = 10;
        config.github.max_pages = 0;
        assert!(config.validate().is_err());
    }
}
