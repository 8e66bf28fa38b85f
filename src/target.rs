use std::fmt;
use std::str::FromStr;

use crate::git::PullRequestFilter;

/// The comment surface requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Commit,
    PullRequest,
    Issue,
    PullRequestReview,
    PullRequestFile,
}

impl CommentKind {
    pub const VARIANTS: [&'static str; 5] = ["commit", "pr", "issue", "pr-review", "pr-file"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommentKind::Commit => "commit",
            CommentKind::PullRequest => "pr",
            CommentKind::Issue => "issue",
            CommentKind::PullRequestReview => "pr-review",
            CommentKind::PullRequestFile => "pr-file",
        }
    }
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("unknown comment type '{0}'")]
pub struct UnknownCommentKind(pub String);

impl FromStr for CommentKind {
    type Err = UnknownCommentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commit" => Ok(CommentKind::Commit),
            "pr" => Ok(CommentKind::PullRequest),
            "issue" => Ok(CommentKind::Issue),
            "pr-review" => Ok(CommentKind::PullRequestReview),
            "pr-file" => Ok(CommentKind::PullRequestFile),
            other => Err(UnknownCommentKind(other.to_string())),
        }
    }
}

/// A fully addressed comment surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentTarget {
    pub owner: String,
    pub repo: String,
    pub kind: TargetKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    Commit {
        sha: String,
    },
    /// Issues and pull requests share the issue comment API
    IssueOrPullRequest {
        number: u64,
    },
    PullRequestReview {
        number: u64,
    },
    PullRequestFile {
        number: u64,
        sha: String,
        path: String,
        position: u64,
    },
}

impl CommentTarget {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            kind,
        }
    }

    /// Reviews can only be created; there is nothing to list, edit or delete
    pub fn supports_reconciliation(&self) -> bool {
        !matches!(self.kind, TargetKind::PullRequestReview { .. })
    }

    /// Human readable name used in log lines
    pub fn label(&self) -> &'static str {
        match self.kind {
            TargetKind::Commit { .. } => "commit",
            TargetKind::IssueOrPullRequest { .. } => "Issue/PR",
            TargetKind::PullRequestReview { .. } => "PR review",
            TargetKind::PullRequestFile { .. } => "PR file",
        }
    }

    fn repo_route(&self) -> String {
        format!("/repos/{}/{}", self.owner, self.repo)
    }

    /// Route listing existing comments, and where new comments are posted
    pub fn comments_route(&self) -> String {
        let base = self.repo_route();
        match &self.kind {
            TargetKind::Commit { sha } => format!("{base}/commits/{sha}/comments"),
            TargetKind::IssueOrPullRequest { number } => {
                format!("{base}/issues/{number}/comments")
            }
            TargetKind::PullRequestReview { number } => format!("{base}/pulls/{number}/reviews"),
            TargetKind::PullRequestFile { number, .. } => {
                format!("{base}/pulls/{number}/comments")
            }
        }
    }

    /// Route addressing a single existing comment for edit and delete.
    /// `None` for reviews.
    pub fn comment_route(&self, comment_id: u64) -> Option<String> {
        let base = self.repo_route();
        match &self.kind {
            TargetKind::Commit { .. } => Some(format!("{base}/comments/{comment_id}")),
            TargetKind::IssueOrPullRequest { .. } => {
                Some(format!("{base}/issues/comments/{comment_id}"))
            }
            TargetKind::PullRequestReview { .. } => None,
            TargetKind::PullRequestFile { .. } => {
                Some(format!("{base}/pulls/comments/{comment_id}"))
            }
        }
    }

    /// Request payload for editing a comment. Only the body is sent; the file
    /// comment API rejects edits carrying `path`, `position` or `commit_id`.
    pub fn edit_payload(&self, body: &str) -> serde_json::Value {
        serde_json::json!({ "body": body })
    }

    /// Request payload for creating a comment on this target
    pub fn create_payload(&self, body: &str) -> serde_json::Value {
        match &self.kind {
            TargetKind::Commit { .. } | TargetKind::IssueOrPullRequest { .. } => {
                serde_json::json!({ "body": body })
            }
            TargetKind::PullRequestReview { .. } => serde_json::json!({
                "body": body,
                "event": "COMMENT",
            }),
            TargetKind::PullRequestFile {
                sha,
                path,
                position,
                ..
            } => serde_json::json!({
                "body": body,
                "path": path,
                "position": position,
                "commit_id": sha,
            }),
        }
    }
}

impl fmt::Display for CommentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repo = format!("{}/{}", self.owner, self.repo);
        match &self.kind {
            TargetKind::Commit { sha } => write!(f, "commit {sha} in {repo}"),
            TargetKind::IssueOrPullRequest { number } => write!(f, "#{number} in {repo}"),
            TargetKind::PullRequestReview { number } => write!(f, "review on #{number} in {repo}"),
            TargetKind::PullRequestFile {
                number,
                path,
                position,
                ..
            } => write!(f, "{path}:{position} on #{number} in {repo}"),
        }
    }
}

/// How the pull request number is known: given directly, or looked up from a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestRef {
    Number(u64),
    Commit {
        sha: String,
        filter: PullRequestFilter,
    },
}

/// A target as configured, before any pull request number lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetAddress {
    Commit {
        sha: String,
    },
    IssueOrPullRequest {
        number: PullRequestRef,
    },
    PullRequestReview {
        number: PullRequestRef,
    },
    PullRequestFile {
        number: PullRequestRef,
        sha: String,
        path: String,
        position: u64,
    },
}
