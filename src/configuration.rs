use std::fmt;
use std::path::PathBuf;

use crate::format::TemplateSource;
use crate::git::{EnterpriseUrls, PullRequestFilter};
use crate::reconcile::{CommentPatterns, PatternError};
use crate::target::{CommentKind, PullRequestRef, TargetAddress};

/// Raw option values, as read from flags or their environment fallbacks.
///
/// Empty strings are treated the same as unset values.
#[derive(Debug, Clone, Default)]
pub struct CommentOptions {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub comment_type: Option<String>,
    pub sha: Option<String>,
    pub number: Option<String>,
    pub file: Option<String>,
    pub position: Option<String>,
    pub template: Option<String>,
    pub template_file: Option<String>,
    pub format: Option<String>,
    pub format_file: Option<String>,
    pub comment: Option<String>,
    pub delete_comment_regex: Option<String>,
    pub edit_comment_regex: Option<String>,
    pub base_url: Option<String>,
    pub upload_url: Option<String>,
    pub insecure: bool,
    pub use_sha_for_pr: bool,
    pub pr_state: Option<String>,
    pub base_branch: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("--{flag} or {env} required")]
    Missing {
        flag: &'static str,
        env: &'static str,
    },
    #[error("--{flag} or {env} must be an integer, got '{value}'")]
    InvalidInteger {
        flag: &'static str,
        env: &'static str,
        value: String,
    },
    #[error("--type or GITHUB_COMMENT_TYPE must be one of {}, got '{0}'", quoted_kinds())]
    InvalidType(String),
    #[error("--baseURL or GITHUB_BASE_URL required when using --uploadURL or GITHUB_UPLOAD_URL")]
    MissingBaseUrl,
    #[error("--uploadURL or GITHUB_UPLOAD_URL required when using --baseURL or GITHUB_BASE_URL")]
    MissingUploadUrl,
    #[error("Invalid GitHub Enterprise URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(
        "(--pr-state or GITHUB_PR_STATE) and (--base-branch or GITHUB_PR_BASE_BRANCH) must be provided when using --use-sha-for-pr"
    )]
    PullRequestLookup,
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl ConfigurationError {
    /// Whether the error is about how the tool was invoked, so usage is worth printing
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, ConfigurationError::Pattern(_))
    }
}

fn quoted_kinds() -> String {
    CommentKind::VARIANTS
        .iter()
        .map(|k| format!("'{k}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validated, immutable settings for one invocation
#[derive(Clone)]
pub struct Configuration {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub address: TargetAddress,
    pub template: Option<TemplateSource>,
    pub comment: Option<String>,
    pub patterns: CommentPatterns,
    pub enterprise: Option<EnterpriseUrls>,
    pub insecure: bool,
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("token", &"***")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("address", &self.address)
            .field("template", &self.template)
            .field("comment", &self.comment)
            .field("patterns", &self.patterns)
            .field("enterprise", &self.enterprise)
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl Configuration {
    pub fn from_options(options: CommentOptions) -> Result<Self, ConfigurationError> {
        let token = required(&options.token, "token", "GITHUB_TOKEN")?;
        let owner = required(&options.owner, "owner", "GITHUB_OWNER")?;
        let repo = required(&options.repo, "repo", "GITHUB_REPO")?;
        let comment_type = required(&options.comment_type, "type", "GITHUB_COMMENT_TYPE")?;
        let kind: CommentKind = comment_type
            .parse()
            .map_err(|_| ConfigurationError::InvalidType(comment_type.clone()))?;

        let enterprise = enterprise_urls(&options)?;
        let address = target_address(kind, &options)?;

        let patterns = CommentPatterns::compile(
            options.delete_comment_regex.as_deref(),
            options.edit_comment_regex.as_deref(),
        )?;

        let configuration = Configuration {
            token,
            owner,
            repo,
            address,
            template: template_source(&options),
            comment: non_empty(&options.comment),
            patterns,
            enterprise,
            insecure: options.insecure,
        };
        log::debug!("Resolved configuration: {:?}", configuration);
        Ok(configuration)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

fn required(
    value: &Option<String>,
    flag: &'static str,
    env: &'static str,
) -> Result<String, ConfigurationError> {
    non_empty(value).ok_or(ConfigurationError::Missing { flag, env })
}

fn integer(
    value: &Option<String>,
    flag: &'static str,
    env: &'static str,
) -> Result<u64, ConfigurationError> {
    let value = required(value, flag, env)?;
    value
        .trim()
        .parse()
        .map_err(|_| ConfigurationError::InvalidInteger { flag, env, value })
}

fn enterprise_urls(options: &CommentOptions) -> Result<Option<EnterpriseUrls>, ConfigurationError> {
    match (non_empty(&options.base_url), non_empty(&options.upload_url)) {
        (None, None) => Ok(None),
        (None, Some(_)) => Err(ConfigurationError::MissingBaseUrl),
        (Some(_), None) => Err(ConfigurationError::MissingUploadUrl),
        (Some(base), Some(upload)) => Ok(Some(EnterpriseUrls::new(&base, &upload)?)),
    }
}

// Inline templates win over files; within each, `template` wins over its `format` alias
fn template_source(options: &CommentOptions) -> Option<TemplateSource> {
    non_empty(&options.template)
        .or_else(|| non_empty(&options.format))
        .map(TemplateSource::Inline)
        .or_else(|| {
            non_empty(&options.template_file)
                .or_else(|| non_empty(&options.format_file))
                .map(|path| TemplateSource::File(PathBuf::from(path)))
        })
}

fn pull_request(options: &CommentOptions) -> Result<PullRequestRef, ConfigurationError> {
    if !options.use_sha_for_pr {
        let number = integer(&options.number, "number", "GITHUB_PR_ISSUE_NUMBER")?;
        return Ok(PullRequestRef::Number(number));
    }

    let (Some(state), Some(base)) = (non_empty(&options.pr_state), non_empty(&options.base_branch))
    else {
        return Err(ConfigurationError::PullRequestLookup);
    };
    let sha = required(&options.sha, "sha", "GITHUB_COMMIT_SHA")?;

    Ok(PullRequestRef::Commit {
        sha,
        filter: PullRequestFilter { state, base },
    })
}

fn target_address(
    kind: CommentKind,
    options: &CommentOptions,
) -> Result<TargetAddress, ConfigurationError> {
    let address = match kind {
        CommentKind::Commit => TargetAddress::Commit {
            sha: required(&options.sha, "sha", "GITHUB_COMMIT_SHA")?,
        },
        CommentKind::Issue => {
            if options.use_sha_for_pr {
                log::warn!("--use-sha-for-pr has no effect on issue comments");
            }
            let number = integer(&options.number, "number", "GITHUB_PR_ISSUE_NUMBER")?;
            TargetAddress::IssueOrPullRequest {
                number: PullRequestRef::Number(number),
            }
        }
        CommentKind::PullRequest => TargetAddress::IssueOrPullRequest {
            number: pull_request(options)?,
        },
        CommentKind::PullRequestReview => TargetAddress::PullRequestReview {
            number: pull_request(options)?,
        },
        CommentKind::PullRequestFile => {
            let number = pull_request(options)?;
            let sha = required(&options.sha, "sha", "GITHUB_COMMIT_SHA")?;
            let path = required(&options.file, "file", "GITHUB_PR_FILE")?;
            let position = integer(&options.position, "position", "GITHUB_PR_FILE_POSITION")?;
            TargetAddress::PullRequestFile {
                number,
                sha,
                path,
                position,
            }
        }
    };
    Ok(address)
}
