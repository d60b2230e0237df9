//! Secrets management for pr-reminder
//!
//! Tokens are stored separately from configuration to avoid accidental sharing.
//! The secrets file is located at `~/.config/pr-reminder/secrets.toml` and must
//! have restrictive permissions (0600 on Unix).
//!
//! Loading priority:
//! 1. Environment variables (GITHUB_TOKEN, SLACK_BOT_TOKEN)
//! 2. Secrets file (~/.config/pr-reminder/secrets.toml)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// GitHub token environment variable
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// Slack bot token environment variable
pub const ENV_SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";

/// Secrets structure
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// GitHub configuration
    pub github: GitHubSecrets,
    /// Slack configuration
    pub slack: SlackSecrets,
}

/// GitHub-related secrets
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubSecrets {
    /// Token with read access to pull requests
    pub token: Option<String>,
}

/// Slack-related secrets
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SlackSecrets {
    /// Bot OAuth token (`xoxb-...`) with `chat:write`
    pub bot_token: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("github_token", &self.github.token.as_ref().map(|_| "<redacted>"))
            .field("slack_bot_token", &self.slack.bot_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_secrets_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &Path) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::metadata(path).map_err(Error::Io)?;
            let mode = metadata.permissions().mode();

            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }

            debug!(path = %path.display(), mode = format!("{:o}", mode & 0o777), "Secrets file permissions OK");
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        for token in [&mut secrets.github.token, &mut secrets.slack.bot_token]
            .into_iter()
            .flatten()
        {
            *token = token.trim().to_string();
        }

        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/pr-reminder/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pr-reminder").join("secrets.toml"))
    }

    /// GitHub token, `GITHUB_TOKEN` taking priority over the file
    pub fn github_token(&self) -> Option<String> {
        pick_token(
            ENV_GITHUB_TOKEN,
            std::env::var(ENV_GITHUB_TOKEN).ok(),
            self.github.token.as_deref(),
        )
    }

    /// Slack bot token, `SLACK_BOT_TOKEN` taking priority over the file
    pub fn slack_bot_token(&self) -> Option<String> {
        pick_token(
            ENV_SLACK_BOT_TOKEN,
            std::env::var(ENV_SLACK_BOT_TOKEN).ok(),
            self.slack.bot_token.as_deref(),
        )
    }

    /// GitHub token or a configuration error naming where to put it
    pub fn require_github_token(&self) -> Result<String> {
        self.github_token().ok_or_else(|| {
            Error::Config(format!(
                "GitHub token not found. Set {} or add [github] token to the secrets file",
                ENV_GITHUB_TOKEN
            ))
        })
    }

    /// Slack bot token or a configuration error naming where to put it
    pub fn require_slack_bot_token(&self) -> Result<String> {
        self.slack_bot_token().ok_or_else(|| {
            Error::Config(format!(
                "Slack bot token not found. Set {} or add [slack] bot_token to the secrets file",
                ENV_SLACK_BOT_TOKEN
            ))
        })
    }
}

fn pick_token(var: &str, from_env: Option<String>, from_file: Option<&str>) -> Option<String> {
    if let Some(token) = from_env.map(|t| t.trim().to_string()) {
        if !token.is_empty() {
            debug!(var, "Using token from environment");
            return Some(token);
        }
    }

    from_file.filter(|t| !t.is_empty()).map(|t| {
        debug!(var, "Using token from secrets file");
        t.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_secrets() {
        let toml = r#"
[github]
token = "ghp_xxxxxxxxxxxx"

[slack]
bot_token = "xoxb-123"
"#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(secrets.github.token.as_deref(), Some("ghp_xxxxxxxxxxxx"));
        assert_eq!(secrets.slack.bot_token.as_deref(), Some("xoxb-123"));
    }

    #[test]
    fn test_env_takes_priority() {
        assert_eq!(
            pick_token("T", Some(" from_env ".to_string()), Some("from_file")),
            Some("from_env".to_string())
        );
        assert_eq!(
            pick_token("T", Some("   ".to_string()), Some("from_file")),
            Some("from_file".to_string())
        );
        assert_eq!(pick_token("T", None, Some("")), None);
        assert_eq!(pick_token("T", None, None), None);
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let secrets = Secrets {
            github: GitHubSecrets {
                token: Some("ghp_secret".to_string()),
            },
            slack: SlackSecrets::default(),
        };
        let debug = format!("{:?}", secrets);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[cfg(unix)]
    #[test]
    fn test_insecure_permissions_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github]\ntoken = \"test\"").unwrap();
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = Secrets::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("insecure permissions"));
    }

    #[cfg(unix)]
    #[test]
    fn test_secure_permissions_accepted_and_trimmed() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[slack]\nbot_token = \"  xoxb-test  \"").unwrap();
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o600)).unwrap();

        let secrets = Secrets::load_from_file(file.path()).unwrap();
        assert_eq!(secrets.slack.bot_token.as_deref(), Some("xoxb-test"));
        assert!(secrets.github.token.is_none());
    }
}
