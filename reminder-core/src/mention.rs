//! GitHub login to Slack mention resolution

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Mapping from GitHub login to Slack user ID
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct MentionTable(BTreeMap<String, String>);

impl MentionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from a JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Failed to parse user mention map: {}", e)))
    }

    /// Map `login` to `slack_id`
    pub fn insert(&mut self, login: impl Into<String>, slack_id: impl Into<String>) {
        self.0.insert(login.into(), slack_id.into());
    }

    /// Number of mapped users
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no user is mapped
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render a mention for `login`
    pub fn mention(&self, login: &str) -> String {
        mention(login, self)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MentionTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// `<@U12345>` for mapped users, `@login` otherwise
pub fn mention(login: &str, table: &MentionTable) -> String {
    match table.0.get(login).filter(|id| !id.is_empty()) {
        Some(id) => format!("<@{}>", id),
        None => format!("@{}", login),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_user() {
        let table: MentionTable = [("octocat", "U12345")].into_iter().collect();
        assert_eq!(table.mention("octocat"), "<@U12345>");
    }

    #[test]
    fn test_unmapped_user_falls_back() {
        let table: MentionTable = [("octocat", "U12345")].into_iter().collect();
        assert_eq!(table.mention("hubot"), "@hubot");
        assert_eq!(mention("anyuser", &MentionTable::new()), "@anyuser");
    }

    #[test]
    fn test_blank_mapping_falls_back() {
        let table: MentionTable = [("octocat", "")].into_iter().collect();
        assert_eq!(table.mention("octocat"), "@octocat");
    }

    #[test]
    fn test_from_json() {
        let table = MentionTable::from_json(r#"{"alice":"U1","bob":"U2"}"#).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.mention("bob"), "<@U2>");
        assert!(MentionTable::from_json("[]").is_err());
    }
}
