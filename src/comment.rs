use std::io::Read;

use serde::{Deserialize, Deserializer};

/// A comment already present on the target, as returned by the list endpoints.
///
/// Commit, issue and review comments share `id` and `body`; nothing else is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExistingComment {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
}

impl ExistingComment {
    pub fn new(id: u64, body: impl Into<String>) -> Self {
        Self {
            id,
            body: body.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(thiserror::Error, Debug)]
#[error("Comment must be provided either as command-line argument, ENV variable, or from 'stdin': {0}")]
pub struct CommentInputError(#[from] pub std::io::Error);

/// Resolve the raw comment text: the flag/env value if non-empty, else all of `stdin`
pub fn read_comment_body(
    comment: Option<&str>,
    mut stdin: impl Read,
) -> Result<String, CommentInputError> {
    if let Some(comment) = comment.filter(|c| !c.is_empty()) {
        return Ok(comment.to_string());
    }

    log::debug!("No comment argument given, reading comment from stdin");
    let mut bytes = Vec::new();
    stdin.read_to_end(&mut bytes)?;
    // piped tool output may carry stray non UTF-8 bytes
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
