mod comment;
mod commenter;
mod configuration;
mod error;
mod format;
mod git;
mod reconcile;
mod target;
pub mod utils;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(test)]
mod test_utils;

pub use comment::{CommentInputError, ExistingComment, read_comment_body};
pub use commenter::{post_comment, prepare_body, resolve_target, run};
pub use configuration::{CommentOptions, Configuration, ConfigurationError};
pub use error::CommenterError;
pub use format::{CommentFormatter, FormatError, TemplateSource};
pub use git::{
    AuthError, CommentProvider, EnterpriseUrls, GitHubApiError, GitHubClient, GitHubReader,
    GitHubWriter, PullRequestFilter,
};
pub use reconcile::{CommentPatterns, Outcome, PatternError, ReconcileError, reconcile};
pub use target::{
    CommentKind, CommentTarget, PullRequestRef, TargetAddress, TargetKind, UnknownCommentKind,
};
