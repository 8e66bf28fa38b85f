//! Provider trait combining the comment operations.

use super::api::{GitHubReader, GitHubWriter};

/// Super-trait combining the read and write halves of the comment API.
///
/// Lets the reconciler take either the octocrab-backed `GitHubClient` or a
/// mock in tests.
pub trait CommentProvider: GitHubReader + GitHubWriter + Sync {}

// Blanket implementation: any type implementing both traits is a provider
impl<T> CommentProvider for T where T: GitHubReader + GitHubWriter + Sync {}
