use serde::{Deserialize, Serialize};
use std::future::Future;

use super::GitHubApiError;
use crate::comment::ExistingComment;
use crate::git::GitHubClient;
use crate::target::CommentTarget;

/// Query filters for finding the pull requests that contain a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestFilter {
    pub state: String,
    pub base: String,
}

#[derive(Deserialize)]
struct PullRequestNumber {
    number: u64,
}

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait GitHubReader {
    /// First page of comments on the target, in API order
    fn list_comments(
        &self,
        target: &CommentTarget,
    ) -> impl Future<Output = Result<Vec<ExistingComment>, GitHubApiError>> + Send;

    /// Numbers of the pull requests associated with `sha`, in API order
    fn pull_requests_for_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        filter: &PullRequestFilter,
    ) -> impl Future<Output = Result<Vec<u64>, GitHubApiError>> + Send;
}

impl GitHubReader for GitHubClient {
    fn list_comments(
        &self,
        target: &CommentTarget,
    ) -> impl Future<Output = Result<Vec<ExistingComment>, GitHubApiError>> + Send {
        let octocrab = self.octocrab.clone();
        let supported = target.supports_reconciliation();
        let label = target.label();
        let route = target.comments_route();
        let description = target.to_string();

        async move {
            if !supported {
                return Err(GitHubApiError::Unsupported {
                    operation: "list",
                    target: label,
                });
            }

            log::debug!("Fetching {} comments for {} ({})", label, description, route);
            let comments: Vec<ExistingComment> = octocrab
                .get(route, None::<&()>)
                .await
                .map_err(GitHubApiError::APIError)?;

            log::debug!("Successfully fetched {} {} comments", comments.len(), label);
            Ok(comments)
        }
    }

    fn pull_requests_for_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        filter: &PullRequestFilter,
    ) -> impl Future<Output = Result<Vec<u64>, GitHubApiError>> + Send {
        let octocrab = self.octocrab.clone();
        let route = format!("/repos/{}/{}/commits/{}/pulls", owner, repo, sha);
        let filter = filter.clone();

        async move {
            log::debug!(
                "Fetching pull requests containing {} (state: {}, base: {})",
                route,
                filter.state,
                filter.base
            );
            let pulls: Vec<PullRequestNumber> = octocrab
                .get(route, Some(&filter))
                .await
                .map_err(GitHubApiError::APIError)?;

            let numbers: Vec<u64> = pulls.into_iter().map(|p| p.number).collect();
            log::debug!("Found pull requests {:?}", numbers);
            Ok(numbers)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_pull_request_numbers_keep_api_order() {
        let content = fs::read_to_string("src/tests/github_api/pulls/commit_pulls.json").unwrap();
        let pulls: Vec<PullRequestNumber> = serde_json::from_str(&content).unwrap();
        let numbers: Vec<u64> = pulls.into_iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![7, 11]);
    }

    #[test]
    fn test_filter_serializes_as_query() {
        let filter = PullRequestFilter {
            state: "open".to_string(),
            base: "main".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            serde_json::json!({ "state": "open", "base": "main" })
        );
    }
}
