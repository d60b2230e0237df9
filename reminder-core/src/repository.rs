//! Target repository identifier

use std::fmt;

use crate::{Error, Result};

/// A repository on the hosting service, addressed as `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl Repository {
    /// Create a repository identifier from its parts
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse a repository identifier
    ///
    /// Supports formats:
    /// - owner/repo
    /// - https://github.com/owner/repo
    /// - git@github.com:owner/repo.git
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if !input.contains("://") && !input.contains('@') {
            let parts: Vec<&str> = input.split('/').collect();
            if let [owner, name] = parts.as_slice() {
                return Self::from_parts(owner, name.trim_end_matches(".git"), input);
            }
            return Err(Error::Config(format!(
                "Invalid repository format: {}. Expected owner/repo",
                input
            )));
        }

        if input.starts_with("https://") || input.starts_with("http://") {
            let url = url::Url::parse(input).map_err(|e| Error::Config(e.to_string()))?;
            let path = url.path().trim_start_matches('/').trim_end_matches(".git");
            let parts: Vec<&str> = path.split('/').collect();
            if parts.len() >= 2 {
                return Self::from_parts(parts[0], parts[1], input);
            }
            return Err(Error::Config(format!("Invalid repository URL path: {}", path)));
        }

        if input.starts_with("git@") {
            if let Some(path) = input.split(':').nth(1) {
                let parts: Vec<&str> = path.trim_end_matches(".git").split('/').collect();
                if parts.len() >= 2 {
                    return Self::from_parts(parts[0], parts[1], input);
                }
            }
            return Err(Error::Config(format!("Invalid SSH URL: {}", input)));
        }

        Err(Error::Config(format!(
            "Unrecognized repository format: {}",
            input
        )))
    }

    fn from_parts(owner: &str, name: &str, input: &str) -> Result<Self> {
        if owner.is_empty() || name.is_empty() {
            return Err(Error::Config(format!(
                "Invalid repository format: {}. Expected owner/repo",
                input
            )));
        }
        Ok(Self::new(owner, name))
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
