mod read;
mod write;

pub use read::{GitHubReader, PullRequestFilter};
pub use write::GitHubWriter;

#[cfg(test)]
pub use read::MockGitHubReader;
#[cfg(test)]
pub use write::MockGitHubWriter;

#[derive(thiserror::Error, Debug)]
pub enum GitHubApiError {
    #[error("GitHub API URL access failed due to: {0}")]
    APIError(octocrab::Error),
    #[error("Invalid API route: {0}")]
    InvalidRoute(#[from] http::uri::InvalidUri),
    #[error("Failed to create GitHub client: {0}")]
    ClientCreation(#[from] crate::git::AuthError),
    #[error("Cannot {operation} {target} comments")]
    Unsupported {
        operation: &'static str,
        target: &'static str,
    },
}
