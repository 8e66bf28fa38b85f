use std::io::Read;

use crate::comment::read_comment_body;
use crate::configuration::Configuration;
use crate::error::CommenterError;
use crate::format::CommentFormatter;
use crate::git::{CommentProvider, GitHubClient, GitHubReader, PullRequestFilter};
use crate::reconcile::{Outcome, reconcile};
use crate::target::{CommentTarget, PullRequestRef, TargetAddress, TargetKind};

/// Turn a configured address into a concrete target, looking up the pull
/// request number from the commit when asked to
pub async fn resolve_target(
    api: &impl GitHubReader,
    owner: &str,
    repo: &str,
    address: TargetAddress,
) -> Result<CommentTarget, CommenterError> {
    let kind = match address {
        TargetAddress::Commit { sha } => TargetKind::Commit { sha },
        TargetAddress::IssueOrPullRequest { number } => TargetKind::IssueOrPullRequest {
            number: pull_request_number(api, owner, repo, &number).await?,
        },
        TargetAddress::PullRequestReview { number } => TargetKind::PullRequestReview {
            number: pull_request_number(api, owner, repo, &number).await?,
        },
        TargetAddress::PullRequestFile {
            number,
            sha,
            path,
            position,
        } => TargetKind::PullRequestFile {
            number: pull_request_number(api, owner, repo, &number).await?,
            sha,
            path,
            position,
        },
    };
    Ok(CommentTarget::new(owner, repo, kind))
}

async fn pull_request_number(
    api: &impl GitHubReader,
    owner: &str,
    repo: &str,
    reference: &PullRequestRef,
) -> Result<u64, CommenterError> {
    match reference {
        PullRequestRef::Number(number) => Ok(*number),
        PullRequestRef::Commit { sha, filter } => {
            pull_request_for_commit(api, owner, repo, sha, filter).await
        }
    }
}

async fn pull_request_for_commit(
    api: &impl GitHubReader,
    owner: &str,
    repo: &str,
    sha: &str,
    filter: &PullRequestFilter,
) -> Result<u64, CommenterError> {
    let numbers = api.pull_requests_for_commit(owner, repo, sha, filter).await?;
    if numbers.len() > 1 {
        log::debug!(
            "Commit {} belongs to {} pull requests, using #{}",
            sha,
            numbers.len(),
            numbers[0]
        );
    }
    numbers
        .first()
        .copied()
        .ok_or_else(|| CommenterError::NoPullRequestForCommit {
            sha: sha.to_string(),
        })
}

/// The formatted comment body: the configured text, else `stdin`, rendered
/// through the configured template
pub fn prepare_body(config: &Configuration, stdin: impl Read) -> Result<String, CommenterError> {
    let raw = read_comment_body(config.comment.as_deref(), stdin)?;
    Ok(CommentFormatter::new(config.template.clone()).format(&raw)?)
}

pub async fn post_comment(
    api: &impl CommentProvider,
    config: &Configuration,
    body: &str,
) -> Result<Outcome, CommenterError> {
    let target = resolve_target(api, &config.owner, &config.repo, config.address.clone()).await?;
    log::debug!("Posting comment to {}", target);
    Ok(reconcile(api, &target, body, &config.patterns).await?)
}

/// Everything after validation. The body is prepared before the client is
/// built, so bad input never reaches the API.
pub async fn run(config: &Configuration, stdin: impl Read) -> Result<Outcome, CommenterError> {
    let body = prepare_body(config, stdin)?;
    let client = GitHubClient::new(&config.token, config.enterprise.as_ref(), config.insecure)?;
    post_comment(&client, config, &body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::ExistingComment;
    use crate::configuration::CommentOptions;
    use crate::format::TemplateSource;
    use crate::test_utils::{MockGitHub, api_error};
    use std::io::Cursor;

    fn open_on_main() -> PullRequestFilter {
        PullRequestFilter {
            state: "open".to_string(),
            base: "main".to_string(),
        }
    }

    fn lookup(sha: &str) -> PullRequestRef {
        PullRequestRef::Commit {
            sha: sha.to_string(),
            filter: open_on_main(),
        }
    }

    fn finds_pulls(api: &mut MockGitHub, numbers: Vec<u64>) {
        api.reader
            .expect_pull_requests_for_commit()
            .withf(|owner, repo, sha, filter| {
                owner == "cloudposse"
                    && repo == "infra"
                    && sha == "a1b2c3"
                    && *filter == open_on_main()
            })
            .times(1)
            .returning(move |_, _, _, _| {
                let numbers = numbers.clone();
                Box::pin(async move { Ok(numbers) })
            });
    }

    fn config(options: CommentOptions) -> Configuration {
        Configuration::from_options(CommentOptions {
            token: Some("ghp_test_token_123".to_string()),
            owner: Some("cloudposse".to_string()),
            repo: Some("infra".to_string()),
            ..options
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_direct_number_needs_no_lookup() {
        let mut api = MockGitHub::new();
        api.reader.expect_pull_requests_for_commit().never();

        let target = resolve_target(
            &api,
            "cloudposse",
            "infra",
            TargetAddress::PullRequestReview {
                number: PullRequestRef::Number(3),
            },
        )
        .await
        .unwrap();
        assert_eq!(target.kind, TargetKind::PullRequestReview { number: 3 });
    }

    #[tokio::test]
    async fn test_lookup_takes_first_pull_request() {
        let mut api = MockGitHub::new();
        finds_pulls(&mut api, vec![7, 11]);

        let target = resolve_target(
            &api,
            "cloudposse",
            "infra",
            TargetAddress::IssueOrPullRequest {
                number: lookup("a1b2c3"),
            },
        )
        .await
        .unwrap();
        assert_eq!(target.kind, TargetKind::IssueOrPullRequest { number: 7 });
    }

    #[tokio::test]
    async fn test_lookup_without_pull_requests_fails() {
        let mut api = MockGitHub::new();
        finds_pulls(&mut api, vec![]);

        let err = resolve_target(
            &api,
            "cloudposse",
            "infra",
            TargetAddress::PullRequestReview {
                number: lookup("a1b2c3"),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            CommenterError::NoPullRequestForCommit { ref sha } if sha == "a1b2c3"
        ));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_lookup_api_failure() {
        let mut api = MockGitHub::new();
        api.reader
            .expect_pull_requests_for_commit()
            .times(1)
            .returning(|_, _, _, _| Box::pin(async move { Err(api_error()) }));

        let err = resolve_target(
            &api,
            "cloudposse",
            "infra",
            TargetAddress::PullRequestReview {
                number: lookup("a1b2c3"),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommenterError::GitHubApi(_)));
    }

    #[tokio::test]
    async fn test_post_file_comment_found_by_commit() {
        let config = config(CommentOptions {
            comment_type: Some("pr-file".to_string()),
            use_sha_for_pr: true,
            sha: Some("a1b2c3".to_string()),
            pr_state: Some("open".to_string()),
            base_branch: Some("main".to_string()),
            file: Some("main.tf".to_string()),
            position: Some("4".to_string()),
            edit_comment_regex: Some("^tflint:".to_string()),
            ..Default::default()
        });

        let mut api = MockGitHub::new();
        finds_pulls(&mut api, vec![11]);
        api.reader
            .expect_list_comments()
            .withf(|target| target.comments_route() == "/repos/cloudposse/infra/pulls/11/comments")
            .times(1)
            .returning(|_| {
                Box::pin(async move { Ok(vec![ExistingComment::new(3001, "tflint: old")]) })
            });
        api.writer
            .expect_edit_comment()
            .withf(|_, id, body| *id == 3001 && body == "tflint: clean")
            .times(1)
            .returning(|_, _, _| Box::pin(async move { Ok(()) }));
        api.never_creates();

        let outcome = post_comment(&api, &config, "tflint: clean").await.unwrap();
        assert_eq!(outcome, Outcome::Edited(vec![3001]));
    }

    #[tokio::test]
    async fn test_post_commit_comment() {
        let config = config(CommentOptions {
            comment_type: Some("commit".to_string()),
            sha: Some("a1b2c3".to_string()),
            ..Default::default()
        });

        let mut api = MockGitHub::new();
        api.reader.expect_pull_requests_for_commit().never();
        api.writer
            .expect_create_comment()
            .withf(|target, body| {
                target.comments_route() == "/repos/cloudposse/infra/commits/a1b2c3/comments"
                    && body == "deployed"
            })
            .times(1)
            .returning(|_, _| Box::pin(async move { Ok(42) }));

        let outcome = post_comment(&api, &config, "deployed").await.unwrap();
        assert_eq!(outcome, Outcome::Created(42));
    }

    #[test]
    fn test_prepare_body_from_stdin_with_template() {
        let mut config = config(CommentOptions {
            comment_type: Some("issue".to_string()),
            number: Some("5".to_string()),
            template: Some("Result: {{.}}".to_string()),
            ..Default::default()
        });
        let body = prepare_body(&config, Cursor::new("\x1b[1mOK\x1b[0m")).unwrap();
        assert_eq!(body, "Result: OK");

        config.comment = Some("from flag".to_string());
        config.template = None;
        let body = prepare_body(&config, Cursor::new("ignored")).unwrap();
        assert_eq!(body, "from flag");
    }

    #[test]
    fn test_prepare_body_template_error() {
        let mut config = config(CommentOptions {
            comment_type: Some("issue".to_string()),
            number: Some("5".to_string()),
            ..Default::default()
        });
        config.template = Some(TemplateSource::Inline("{% if %}".to_string()));

        let err = prepare_body(&config, Cursor::new("x")).unwrap_err();
        assert!(matches!(err, CommenterError::Format(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
