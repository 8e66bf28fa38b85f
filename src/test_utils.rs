//! Shared test utilities for mocking the GitHub comment API

use crate::comment::ExistingComment;
use crate::git::{
    GitHubApiError, GitHubReader, GitHubWriter, MockGitHubReader, MockGitHubWriter,
    PullRequestFilter,
};
use crate::target::CommentTarget;

/// Combines the reader and writer mocks into one provider
pub struct MockGitHub {
    pub reader: MockGitHubReader,
    pub writer: MockGitHubWriter,
}

impl MockGitHub {
    pub fn new() -> Self {
        Self {
            reader: MockGitHubReader::new(),
            writer: MockGitHubWriter::new(),
        }
    }

    pub fn lists(&mut self, times: usize, comments: Vec<ExistingComment>) {
        self.reader
            .expect_list_comments()
            .times(times)
            .returning(move |_| {
                let comments = comments.clone();
                Box::pin(async move { Ok(comments) })
            });
    }

    pub fn creates(&mut self, body: &'static str, id: u64) {
        self.writer
            .expect_create_comment()
            .withf(move |_, b| b == body)
            .times(1)
            .returning(move |_, _| Box::pin(async move { Ok(id) }));
    }

    pub fn never_creates(&mut self) {
        self.writer.expect_create_comment().never();
    }
}

impl GitHubReader for MockGitHub {
    async fn list_comments(
        &self,
        target: &CommentTarget,
    ) -> Result<Vec<ExistingComment>, GitHubApiError> {
        self.reader.list_comments(target).await
    }

    async fn pull_requests_for_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        filter: &PullRequestFilter,
    ) -> Result<Vec<u64>, GitHubApiError> {
        self.reader
            .pull_requests_for_commit(owner, repo, sha, filter)
            .await
    }
}

impl GitHubWriter for MockGitHub {
    async fn create_comment(
        &self,
        target: &CommentTarget,
        body: &str,
    ) -> Result<u64, GitHubApiError> {
        self.writer.create_comment(target, body).await
    }

    async fn edit_comment(
        &self,
        target: &CommentTarget,
        comment_id: u64,
        body: &str,
    ) -> Result<(), GitHubApiError> {
        self.writer.edit_comment(target, comment_id, body).await
    }

    async fn delete_comment(
        &self,
        target: &CommentTarget,
        comment_id: u64,
    ) -> Result<(), GitHubApiError> {
        self.writer.delete_comment(target, comment_id).await
    }
}

/// Any API failure, for tests that only care that a call failed
pub fn api_error() -> GitHubApiError {
    GitHubApiError::Unsupported {
        operation: "test",
        target: "mock",
    }
}
