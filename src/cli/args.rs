use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

use crate::configuration::CommentOptions;
use crate::utils::{EnvProvider, env_flag};

/// Create, update or delete comments on GitHub commits, pull requests, issues,
/// PR reviews and PR files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Github access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Github repository owner
    #[arg(long, env = "GITHUB_OWNER")]
    pub owner: Option<String>,

    /// Github repository name
    #[arg(long, env = "GITHUB_REPO")]
    pub repo: Option<String>,

    /// Comment type: 'commit', 'pr', 'issue', 'pr-review' or 'pr-file'
    #[arg(long = "type", env = "GITHUB_COMMENT_TYPE")]
    pub comment_type: Option<String>,

    /// Commit SHA
    #[arg(long, env = "GITHUB_COMMIT_SHA")]
    pub sha: Option<String>,

    /// Pull Request or Issue number
    #[arg(long, env = "GITHUB_PR_ISSUE_NUMBER")]
    pub number: Option<String>,

    /// Pull Request file name
    #[arg(long, env = "GITHUB_PR_FILE")]
    pub file: Option<String>,

    /// Position in the Pull Request file diff
    #[arg(long, env = "GITHUB_PR_FILE_POSITION")]
    pub position: Option<String>,

    /// Template to format the comment, e.g. `My comment:<br/>{{ comment }}`.
    /// Use either `template` or `template_file`
    #[arg(long, env = "GITHUB_COMMENT_TEMPLATE")]
    pub template: Option<String>,

    /// Path to a template file to format the comment
    #[arg(long = "template_file", env = "GITHUB_COMMENT_TEMPLATE_FILE")]
    pub template_file: Option<String>,

    /// Alias of `template`
    #[arg(long, env = "GITHUB_COMMENT_FORMAT")]
    pub format: Option<String>,

    /// Alias of `template_file`
    #[arg(long = "format_file", env = "GITHUB_COMMENT_FORMAT_FILE")]
    pub format_file: Option<String>,

    /// Comment text. Read from stdin when not given
    #[arg(long, env = "GITHUB_COMMENT")]
    pub comment: Option<String>,

    /// Regex to find previous comments to delete before creating the new comment.
    /// Supported for comment types `commit`, `pr-file`, `issue` and `pr`
    #[arg(long = "delete-comment-regex", env = "GITHUB_DELETE_COMMENT_REGEX")]
    pub delete_comment_regex: Option<String>,

    /// Regex to find previous comments to replace with the new content, or create
    /// a new comment if none found. Supported for comment types `commit`,
    /// `pr-file`, `issue` and `pr`
    #[arg(long = "edit-comment-regex", env = "GITHUB_EDIT_COMMENT_REGEX")]
    pub edit_comment_regex: Option<String>,

    /// Base URL of Github Enterprise
    #[arg(long = "baseURL", env = "GITHUB_BASE_URL")]
    pub base_url: Option<String>,

    /// Upload URL of Github Enterprise
    #[arg(long = "uploadURL", env = "GITHUB_UPLOAD_URL")]
    pub upload_url: Option<String>,

    /// Ignore SSL certificate check [env: GITHUB_INSECURE]
    #[arg(long)]
    pub insecure: bool,

    /// Use the commit SHA to find the PR number [env: GITHUB_USE_SHA_FOR_PR]
    #[arg(long = "use-sha-for-pr")]
    pub use_sha_for_pr: bool,

    /// State of the PR, e.g. closed, open
    #[arg(long = "pr-state", env = "GITHUB_PR_STATE")]
    pub pr_state: Option<String>,

    /// Base branch of the pull request
    #[arg(long = "base-branch", env = "GITHUB_PR_BASE_BRANCH")]
    pub base_branch: Option<String>,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Cli {
    /// Raw options, with the boolean switches also honoring their environment
    /// variables when set to `true` in any case
    pub fn options(&self, env: &impl EnvProvider) -> CommentOptions {
        CommentOptions {
            token: self.token.clone(),
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            comment_type: self.comment_type.clone(),
            sha: self.sha.clone(),
            number: self.number.clone(),
            file: self.file.clone(),
            position: self.position.clone(),
            template: self.template.clone(),
            template_file: self.template_file.clone(),
            format: self.format.clone(),
            format_file: self.format_file.clone(),
            comment: self.comment.clone(),
            delete_comment_regex: self.delete_comment_regex.clone(),
            edit_comment_regex: self.edit_comment_regex.clone(),
            base_url: self.base_url.clone(),
            upload_url: self.upload_url.clone(),
            insecure: self.insecure || env_flag(env, "GITHUB_INSECURE"),
            use_sha_for_pr: self.use_sha_for_pr || env_flag(env, "GITHUB_USE_SHA_FOR_PR"),
            pr_state: self.pr_state.clone(),
            base_branch: self.base_branch.clone(),
        }
    }
}
