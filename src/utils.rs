use lazy_static::lazy_static;
use regex::Regex;

#[cfg(test)]
use mockall::automock;

// Trait for environment variable access (mockable in tests)
#[cfg_attr(test, automock)]
pub trait EnvProvider {
    fn var(&self, key: &str) -> Result<String, std::env::VarError>;
}

// Default implementation that uses std::env
#[derive(Default)]
pub struct StdEnvProvider;

impl EnvProvider for StdEnvProvider {
    fn var(&self, key: &str) -> Result<String, std::env::VarError> {
        std::env::var(key)
    }
}

/// Boolean switches are on only when the variable reads `true`, ignoring case
pub fn env_flag(env: &impl EnvProvider, key: &str) -> bool {
    env.var(key)
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

lazy_static! {
    static ref ANSI_ESCAPE: Regex = Regex::new(
        r"[\x1B\x{9B}][\[\]()#;?]*(?:(?:(?:[a-zA-Z\d]*(?:;[a-zA-Z\d]*)*)?\x07)|(?:(?:\d{1,4}(?:;\d{0,4})*)?[\dA-PRZcf-ntqry=><~]))"
    )
    .expect("ANSI escape pattern is valid");
}

/// Remove terminal escape sequences (colors, cursor movement) from text
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_colors() {
        let colored = "\x1b[31mFAIL\x1b[0m: \x1b[1;32mok\x1b[0m";
        assert_eq!(strip_ansi(colored), "FAIL: ok");
    }

    #[test]
    fn test_strip_ansi_leaves_plain_text() {
        let plain = "## Plan\n\n* 3 to add, 0 to change [x]";
        assert_eq!(strip_ansi(plain), plain);
    }

    #[test]
    fn test_strip_ansi_cursor_movement() {
        let progress = "\x1b[2K\x1b[1Gprogress";
        assert_eq!(strip_ansi(progress), "progress");
    }

    #[test]
    fn test_env_flag_parsing() {
        let mut mock_env = MockEnvProvider::new();
        mock_env
            .expect_var()
            .with(mockall::predicate::eq("GITHUB_INSECURE"))
            .returning(|_| Ok("TRUE".to_string()));
        mock_env
            .expect_var()
            .with(mockall::predicate::eq("GITHUB_USE_SHA_FOR_PR"))
            .returning(|_| Ok("yes".to_string()));
        mock_env
            .expect_var()
            .with(mockall::predicate::eq("UNSET"))
            .returning(|_| Err(std::env::VarError::NotPresent));

        assert!(env_flag(&mock_env, "GITHUB_INSECURE"));
        assert!(!env_flag(&mock_env, "GITHUB_USE_SHA_FOR_PR"));
        assert!(!env_flag(&mock_env, "UNSET"));
    }
}
