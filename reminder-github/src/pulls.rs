//! Open pull request listing

use async_trait::async_trait;
use reminder_core::{PrSource, PullRequest, Repository};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{GitHubClient, Result};

/// Items requested per page; a shorter page ends the listing
pub const PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct ApiUser {
    #[serde(default)]
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    #[serde(default)]
    name: Option<String>,
}

/// The subset of the pulls API response the reminder reads
#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    number: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    draft: Option<bool>,
    #[serde(default)]
    user: Option<ApiUser>,
    #[serde(default)]
    labels: Option<Vec<ApiLabel>>,
    #[serde(default)]
    requested_reviewers: Option<Vec<ApiUser>>,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(pr: ApiPullRequest) -> Self {
        PullRequest {
            number: pr.number,
            title: pr.title.unwrap_or_default(),
            url: pr.html_url.unwrap_or_default(),
            author: pr.user.and_then(|u| u.login).filter(|l| !l.is_empty()),
            draft: pr.draft.unwrap_or(false),
            labels: pr
                .labels
                .unwrap_or_default()
                .into_iter()
                .filter_map(|l| l.name)
                .filter(|n| !n.is_empty())
                .collect(),
            requested_reviewers: pr
                .requested_reviewers
                .unwrap_or_default()
                .into_iter()
                .filter_map(|u| u.login)
                .filter(|l| !l.is_empty())
                .collect(),
        }
    }
}

impl GitHubClient {
    /// List all open PRs, following pages until one comes back short
    ///
    /// A repository with an exact multiple of [`PAGE_SIZE`] open PRs costs
    /// one extra (empty) request. Stops early with a warning once
    /// `max_pages` full pages have been read.
    pub async fn list_open_prs(&self, repo: &Repository) -> Result<Vec<PullRequest>> {
        let path = format!("/repos/{}/{}/pulls", repo.owner, repo.name);
        let mut prs = Vec::new();
        let mut page = 1u32;

        loop {
            let batch: Vec<ApiPullRequest> = self
                .get_json(
                    &path,
                    &[
                        ("state", "open".to_string()),
                        ("per_page", PAGE_SIZE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let batch_len = batch.len();
            debug!(page, count = batch_len, "Fetched page of open PRs");
            prs.extend(batch.into_iter().map(PullRequest::from));

            if batch_len < PAGE_SIZE {
                break;
            }
            if page >= self.max_pages() {
                warn!(
                    max_pages = self.max_pages(),
                    count = prs.len(),
                    "Page limit reached, remaining open PRs are not included"
                );
                break;
            }
            page += 1;
        }

        info!(repo = %repo, count = prs.len(), "Fetched open pull requests");
        Ok(prs)
    }
}

#[async_trait]
impl PrSource for GitHubClient {
    async fn fetch_open_prs(&self, repo: &Repository) -> reminder_core::Result<Vec<PullRequest>> {
        Ok(self.list_open_prs(repo).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use httpmock::prelude::*;
    use serde_json::{json, Value};

    fn client(server: &MockServer) -> GitHubClient {
        GitHubClient::new("test-token")
            .unwrap()
            .with_api_url(&server.base_url())
    }

    fn repo() -> Repository {
        Repository::new("owner", "repo")
    }

    fn page_of(range: std::ops::RangeInclusive<u64>) -> Value {
        Value::Array(
            range
                .map(|n| {
                    json!({
                        "number": n,
                        "title": format!("PR {}", n),
                        "html_url": format!("https://github.com/owner/repo/pull/{}", n),
                    })
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_single_page_with_headers() {
        let server = MockServer::start();
        let page = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/owner/repo/pulls")
                .query_param("state", "open")
                .query_param("per_page", "100")
                .query_param("page", "1")
                .header("authorization", "Bearer test-token")
                .header("accept", "application/vnd.github+json")
                .header("x-github-api-version", "2022-11-28");
            then.status(200).json_body(page_of(1..=2));
        });

        let prs = client(&server).list_open_prs(&repo()).await.unwrap();
        assert_eq!(prs.len(), 2);
        assert_eq!(prs[0].number, 1);
        assert_eq!(prs[1].url, "https://github.com/owner/repo/pull/2");
        assert_eq!(page.calls(), 1);
    }

    #[tokio::test]
    async fn test_full_page_then_empty_page() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/owner/repo/pulls")
                .query_param("page", "1");
            then.status(200).json_body(page_of(1..=100));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/owner/repo/pulls")
                .query_param("page", "2");
            then.status(200).json_body(json!([]));
        });

        let prs = client(&server).list_open_prs(&repo()).await.unwrap();
        assert_eq!(prs.len(), 100);
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn test_concatenates_pages_in_order() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/owner/repo/pulls")
                .query_param("page", "1");
            then.status(200).json_body(page_of(1..=100));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/owner/repo/pulls")
                .query_param("page", "2");
            then.status(200).json_body(page_of(101..=101));
        });

        let prs = client(&server).list_open_prs(&repo()).await.unwrap();
        assert_eq!(prs.len(), 101);
        assert_eq!(prs[0].number, 1);
        assert_eq!(prs[100].number, 101);
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_repository() {
        let server = MockServer::start();
        let page = server.mock(|when, then| {
            when.method(GET).path("/repos/owner/repo/pulls");
            then.status(200).json_body(json!([]));
        });

        let prs = client(&server).list_open_prs(&repo()).await.unwrap();
        assert!(prs.is_empty());
        assert_eq!(page.calls(), 1);
    }

    #[tokio::test]
    async fn test_page_limit_stops_listing() {
        let server = MockServer::start();
        let page = server.mock(|when, then| {
            when.method(GET).path("/repos/owner/repo/pulls");
            then.status(200).json_body(page_of(1..=100));
        });

        let prs = client(&server)
            .with_max_pages(2)
            .list_open_prs(&repo())
            .await
            .unwrap();
        assert_eq!(prs.len(), 200);
        assert_eq!(page.calls(), 2);
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/owner/repo/pulls");
            then.status(404).body("Not found");
        });

        let err = client(&server).list_open_prs(&repo()).await.unwrap_err();
        match err {
            Error::Transport { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "Not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_source_maps_into_core_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/owner/repo/pulls");
            then.status(500).body("boom");
        });

        let err = client(&server).fetch_open_prs(&repo()).await.unwrap_err();
        assert!(matches!(
            err,
            reminder_core::Error::Transport { status: 500, ref body } if body == "boom"
        ));
        assert_eq!(err.to_string(), "GitHub API error 500: boom");
    }

    #[tokio::test]
    async fn test_converts_api_fields() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/owner/repo/pulls");
            then.status(200).json_body(json!([
                {
                    "number": 7,
                    "title": "Add login",
                    "html_url": "https://github.com/owner/repo/pull/7",
                    "draft": true,
                    "user": {"login": "octocat"},
                    "labels": [{"name": "frontend"}, {"name": null}, {"id": 3}],
                    "requested_reviewers": [{"login": "alice"}, {"login": "bob"}]
                },
                {
                    "number": 8,
                    "title": null,
                    "html_url": "https://github.com/owner/repo/pull/8",
                    "draft": null,
                    "user": null,
                    "labels": null,
                    "requested_reviewers": []
                }
            ]));
        });

        let prs = client(&server).list_open_prs(&repo()).await.unwrap();
        assert_eq!(
            prs[0],
            PullRequest {
                number: 7,
                title: "Add login".to_string(),
                url: "https://github.com/owner/repo/pull/7".to_string(),
                author: Some("octocat".to_string()),
                draft: true,
                labels: vec!["frontend".to_string()],
                requested_reviewers: vec!["alice".to_string(), "bob".to_string()],
            }
        );
        assert_eq!(prs[1].title, "");
        assert!(prs[1].author.is_none());
        assert!(!prs[1].draft);
        assert!(prs[1].labels.is_empty());
    }
}
