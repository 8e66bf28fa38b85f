//! Delete / edit / create reconciliation of a comment against the comments
//! already on its target.

use std::fmt;

use regex::Regex;

use crate::comment::ExistingComment;
use crate::git::{CommentProvider, GitHubApiError};
use crate::target::CommentTarget;

#[derive(thiserror::Error, Debug)]
#[error("Invalid {which} regex '{pattern}': {source}")]
pub struct PatternError {
    pub which: &'static str,
    pub pattern: String,
    pub source: regex::Error,
}

/// The optional delete and edit patterns, compiled up front
#[derive(Debug, Clone, Default)]
pub struct CommentPatterns {
    pub delete: Option<Regex>,
    pub edit: Option<Regex>,
}

impl CommentPatterns {
    /// Empty strings count as "not set"
    pub fn compile(delete: Option<&str>, edit: Option<&str>) -> Result<Self, PatternError> {
        Ok(Self {
            delete: compile_one("delete-comment", delete)?,
            edit: compile_one("edit-comment", edit)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.delete.is_none() && self.edit.is_none()
    }
}

fn compile_one(which: &'static str, pattern: Option<&str>) -> Result<Option<Regex>, PatternError> {
    match pattern.filter(|p| !p.is_empty()) {
        Some(pattern) => Regex::new(pattern).map(Some).map_err(|source| PatternError {
            which,
            pattern: pattern.to_string(),
            source,
        }),
        None => Ok(None),
    }
}

/// What a reconciliation run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(u64),
    Edited(Vec<u64>),
    DeletedThenCreated { deleted: Vec<u64>, created: u64 },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created(id) => write!(f, "created comment {id}"),
            Outcome::Edited(ids) => write!(f, "edited comment(s) {}", join_ids(ids)),
            Outcome::DeletedThenCreated { deleted, created } => write!(
                f,
                "deleted comment(s) {} and created comment {created}",
                join_ids(deleted)
            ),
        }
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(thiserror::Error, Debug)]
pub enum ReconcileError {
    #[error("Error updating {target} comment {id}: {source}")]
    Edit {
        target: &'static str,
        id: u64,
        source: GitHubApiError,
    },
    #[error("Error creating {target} comment: {source}")]
    Create {
        target: &'static str,
        source: GitHubApiError,
    },
}

/// Run the delete, edit and create phases for one target.
///
/// Listing and deleting failures are logged and skipped. An edit failure
/// aborts the run, and so does a create failure. When the edit pattern matches
/// anything, nothing is created.
pub async fn reconcile(
    api: &impl CommentProvider,
    target: &CommentTarget,
    body: &str,
    patterns: &CommentPatterns,
) -> Result<Outcome, ReconcileError> {
    let label = target.label();
    let mut deleted = Vec::new();

    if target.supports_reconciliation() {
        if let Some(pattern) = &patterns.delete {
            deleted = delete_matching(api, target, pattern).await;
        }

        if let Some(pattern) = &patterns.edit {
            let edited = edit_matching(api, target, pattern, body).await?;
            if !edited.is_empty() {
                return Ok(Outcome::Edited(edited));
            }
        }
    } else if !patterns.is_empty() {
        log::warn!(
            "github-commenter: delete/edit patterns are not supported for {} comments, ignoring them",
            label
        );
    }

    let created = api
        .create_comment(target, body)
        .await
        .map_err(|source| ReconcileError::Create {
            target: label,
            source,
        })?;
    log::info!("github-commenter: Created GitHub {} comment {}", label, created);

    if deleted.is_empty() {
        Ok(Outcome::Created(created))
    } else {
        Ok(Outcome::DeletedThenCreated { deleted, created })
    }
}

async fn matching_comments(
    api: &impl CommentProvider,
    target: &CommentTarget,
    pattern: &Regex,
) -> Vec<ExistingComment> {
    match api.list_comments(target).await {
        Ok(comments) => {
            let total = comments.len();
            let matched: Vec<ExistingComment> = comments
                .into_iter()
                .filter(|c| pattern.is_match(&c.body))
                .collect();
            log::debug!(
                "{} of {} {} comments match '{}'",
                matched.len(),
                total,
                target.label(),
                pattern
            );
            matched
        }
        Err(e) => {
            log::warn!(
                "github-commenter: Error listing {} comments: {}",
                target.label(),
                e
            );
            Vec::new()
        }
    }
}

async fn delete_matching(
    api: &impl CommentProvider,
    target: &CommentTarget,
    pattern: &Regex,
) -> Vec<u64> {
    let mut deleted = Vec::new();
    for comment in matching_comments(api, target, pattern).await {
        match api.delete_comment(target, comment.id).await {
            Ok(()) => {
                log::info!(
                    "github-commenter: Deleted {} comment: {}",
                    target.label(),
                    comment.id
                );
                deleted.push(comment.id);
            }
            Err(e) => log::warn!(
                "github-commenter: Error deleting {} comment {}: {}",
                target.label(),
                comment.id,
                e
            ),
        }
    }
    deleted
}

async fn edit_matching(
    api: &impl CommentProvider,
    target: &CommentTarget,
    pattern: &Regex,
    body: &str,
) -> Result<Vec<u64>, ReconcileError> {
    let mut edited = Vec::new();
    for comment in matching_comments(api, target, pattern).await {
        api.edit_comment(target, comment.id, body)
            .await
            .map_err(|source| ReconcileError::Edit {
                target: target.label(),
                id: comment.id,
                source,
            })?;
        log::info!(
            "github-commenter: Updated {} comment: {}",
            target.label(),
            comment.id
        );
        edited.push(comment.id);
    }
    Ok(edited)
}
