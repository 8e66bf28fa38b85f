use octocrab::Octocrab;

pub(crate) mod api;
pub(crate) mod auth;
pub(crate) mod provider;
mod tls;

pub use api::{GitHubApiError, GitHubReader, GitHubWriter, PullRequestFilter};
#[cfg(test)]
pub use api::{MockGitHubReader, MockGitHubWriter};
pub use auth::{AuthError, EnterpriseUrls, create_authenticated_client};
pub use provider::CommentProvider;

/// Octocrab-backed implementation of the comment API
#[derive(Debug, Clone)]
pub struct GitHubClient {
    pub(crate) octocrab: Octocrab,
}

impl GitHubClient {
    pub fn new(
        token: &str,
        enterprise: Option<&EnterpriseUrls>,
        insecure: bool,
    ) -> Result<Self, GitHubApiError> {
        let octocrab = create_authenticated_client(token, enterprise, insecure)?;
        log::debug!("Successfully initialized GitHub client");
        Ok(Self { octocrab })
    }
}
