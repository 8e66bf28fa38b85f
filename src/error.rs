use crate::comment::CommentInputError;
use crate::configuration::ConfigurationError;
use crate::format::FormatError;
use crate::git::GitHubApiError;
use crate::reconcile::ReconcileError;

#[derive(thiserror::Error, Debug)]
pub enum CommenterError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    CommentInput(#[from] CommentInputError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("GitHub API error: {0}")]
    GitHubApi(#[from] GitHubApiError),
    #[error("No pull request found for commit {sha}")]
    NoPullRequestForCommit { sha: String },
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl CommenterError {
    /// `2` for invalid invocations, `1` for everything that failed afterwards
    pub fn exit_code(&self) -> u8 {
        match self {
            CommenterError::Configuration(_) => 2,
            _ => 1,
        }
    }

    pub fn is_usage_error(&self) -> bool {
        match self {
            CommenterError::Configuration(e) => e.is_usage_error(),
            _ => false,
        }
    }
}
