use serde::Deserialize;
use std::future::Future;

use super::GitHubApiError;
use crate::git::GitHubClient;
use crate::target::CommentTarget;

#[derive(Deserialize)]
struct CreatedComment {
    id: u64,
}

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait GitHubWriter {
    /// Post a new comment (or review) and return its id
    fn create_comment(
        &self,
        target: &CommentTarget,
        body: &str,
    ) -> impl Future<Output = Result<u64, GitHubApiError>> + Send;

    /// Replace the body of an existing comment. Only the body is sent.
    fn edit_comment(
        &self,
        target: &CommentTarget,
        comment_id: u64,
        body: &str,
    ) -> impl Future<Output = Result<(), GitHubApiError>> + Send;

    fn delete_comment(
        &self,
        target: &CommentTarget,
        comment_id: u64,
    ) -> impl Future<Output = Result<(), GitHubApiError>> + Send;
}

impl GitHubWriter for GitHubClient {
    fn create_comment(
        &self,
        target: &CommentTarget,
        body: &str,
    ) -> impl Future<Output = Result<u64, GitHubApiError>> + Send {
        let octocrab = self.octocrab.clone();
        let route = target.comments_route();
        let payload = target.create_payload(body);
        let description = target.to_string();

        async move {
            log::debug!("Posting comment to {} ({})", description, route);

            let created: CreatedComment = octocrab
                .post(route, Some(&payload))
                .await
                .map_err(GitHubApiError::APIError)?;

            log::debug!("Successfully posted comment {} to {}", created.id, description);
            Ok(created.id)
        }
    }

    fn edit_comment(
        &self,
        target: &CommentTarget,
        comment_id: u64,
        body: &str,
    ) -> impl Future<Output = Result<(), GitHubApiError>> + Send {
        let octocrab = self.octocrab.clone();
        let route = target.comment_route(comment_id);
        let label = target.label();
        let update_request = target.edit_payload(body);

        async move {
            let route = route.ok_or(GitHubApiError::Unsupported {
                operation: "edit",
                target: label,
            })?;
            log::debug!("Editing {} comment {} ({})", label, comment_id, route);

            let _: serde_json::Value = octocrab
                .patch(route, Some(&update_request))
                .await
                .map_err(GitHubApiError::APIError)?;

            log::debug!("Successfully edited {} comment {}", label, comment_id);
            Ok(())
        }
    }

    fn delete_comment(
        &self,
        target: &CommentTarget,
        comment_id: u64,
    ) -> impl Future<Output = Result<(), GitHubApiError>> + Send {
        let octocrab = self.octocrab.clone();
        let route = target.comment_route(comment_id);
        let label = target.label();

        async move {
            let route = route.ok_or(GitHubApiError::Unsupported {
                operation: "delete",
                target: label,
            })?;
            log::debug!("Deleting {} comment {} ({})", label, comment_id, route);
            let uri: http::Uri = route.parse()?;

            // 204 No Content: there is no body to deserialize
            let response = octocrab
                ._delete(uri, None::<&()>)
                .await
                .map_err(GitHubApiError::APIError)?;
            octocrab::map_github_error(response)
                .await
                .map_err(GitHubApiError::APIError)?;

            log::debug!("Successfully deleted {} comment {}", label, comment_id);
            Ok(())
        }
    }
}
