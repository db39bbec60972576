//! Command line and environment configuration.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Dotfiles read from the working directory, highest precedence first.
const ENV_FILES: [&str; 2] = [".env.local", ".env"];

const URL_VAR: &str = "JIRA_URL";
const EMAIL_VAR: &str = "JIRA_EMAIL";
const TOKEN_VAR: &str = "JIRA_API_TOKEN";
const DEFAULT_ISSUE_VARS: [&str; 2] = ["DEFAULT_ISSUE_KEY", "JIRA_PROJECT_KEY"];

/// Command line configuration for jiranote.
#[derive(Debug, Clone, Parser)]
#[command(name = "jiranote", version, about, long_about = None)]
pub struct Config {
    /// Issue key to comment on (e.g. WEB-123)
    #[arg(short, long, global = true)]
    pub issue: Option<String>,

    /// Repository path for post-commit
    #[arg(long, global = true, default_value = ".")]
    pub repo: PathBuf,

    /// Print the comment instead of sending it
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Comment on the issue referenced by the HEAD commit
    PostCommit,

    /// Add a plain text comment (text or @file)
    Comment {
        /// Comment text, or @path to read it from a file
        #[arg(allow_hyphen_values = true)]
        text: Option<OsString>,

        /// More words, joined to the text with spaces
        words: Vec<OsString>,
    },

    /// Add a conversation log comment
    Log {
        /// User request text or @path
        #[arg(allow_hyphen_values = true)]
        request: Option<OsString>,

        /// Response text or @path
        #[arg(allow_hyphen_values = true)]
        response: Option<OsString>,
    },

    /// Add a markdown work summary comment
    Summary {
        /// Summary text or @path
        #[arg(allow_hyphen_values = true)]
        text: Option<OsString>,

        /// Read summary from file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Delete the latest comment of the issue
    Delete,

    /// Create a summary template file to edit and post
    CreateCommentFile,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

/// Loads `.env.local` and `.env` from a directory into the process environment.
///
/// Variables that are already set keep their value, so the environment wins
/// over `.env.local`, which wins over `.env`. Missing files are skipped.
pub fn load_env_files(dir: &Path) {
    for name in ENV_FILES {
        let path = dir.join(name);
        match dotenvy::from_path(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "loaded env file"),
            Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => eprintln!("Warning: Failed to read {}: {}", path.display(), err),
        }
    }
}

/// Returns the configured fallback issue key.
pub fn default_issue_key() -> Option<String> {
    default_issue_key_from(|name| std::env::var(name).ok())
}

fn default_issue_key_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    DEFAULT_ISSUE_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
        .map(|v| v.trim().to_string())
}

/// Tracker endpoint and account secrets.
#[derive(Clone)]
pub struct Credentials {
    base_url: String,
    email: String,
    api_token: String,
}

impl Credentials {
    /// Reads credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Returns error naming every missing variable if any of `JIRA_URL`,
    /// `JIRA_EMAIL` or `JIRA_API_TOKEN` is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let (Some(url), Some(email), Some(api_token)) =
            (read(URL_VAR), read(EMAIL_VAR), read(TOKEN_VAR))
        else {
            let missing: Vec<_> = [URL_VAR, EMAIL_VAR, TOKEN_VAR]
                .into_iter()
                .filter(|name| read(name).is_none())
                .collect();
            bail!("Missing configuration: set {}", missing.join(", "));
        };

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            email,
            api_token,
        })
    }

    /// Tracker base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Account email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// API token.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Config::command().debug_assert();
    }

    #[test]
    fn test_parse_comment_with_global_issue() {
        // Arrange
        let args = ["jiranote", "comment", "hello", "world", "--issue", "WEB-7"];

        // Act
        let config = Config::try_parse_from(args).expect("Should parse comment");

        // Assert
        assert_eq!(config.issue.as_deref(), Some("WEB-7"));
        match config.command {
            Some(Command::Comment { text, words }) => {
                assert_eq!(text, Some(OsString::from("hello")));
                assert_eq!(words, vec![OsString::from("world")]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_summary_file_short_flags() {
        // Arrange
        let args = ["jiranote", "-i", "WEB-1", "summary", "-f", "notes.md"];

        // Act
        let config = Config::try_parse_from(args).expect("Should parse summary");

        // Assert
        assert_eq!(config.issue.as_deref(), Some("WEB-1"));
        assert!(!config.dry_run);
        match config.command {
            Some(Command::Summary { text, file }) => {
                assert!(text.is_none());
                assert_eq!(file, Some(PathBuf::from("notes.md")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_content_starting_with_dash() {
        // Arrange
        let summary = ["jiranote", "summary", "- done\n- next", "--issue", "WEB-1"];
        let comment = ["jiranote", "comment", "-5 degrees", "outside", "-i", "WEB-2"];
        let log = ["jiranote", "log", "- fix it", "- fixed"];

        // Act
        let summary = Config::try_parse_from(summary).expect("Should parse summary");
        let comment = Config::try_parse_from(comment).expect("Should parse comment");
        let log = Config::try_parse_from(log).expect("Should parse log");

        // Assert
        assert_eq!(summary.issue.as_deref(), Some("WEB-1"));
        match summary.command {
            Some(Command::Summary { text, file }) => {
                assert_eq!(text, Some(OsString::from("- done\n- next")));
                assert!(file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert_eq!(comment.issue.as_deref(), Some("WEB-2"));
        match comment.command {
            Some(Command::Comment { text, words }) => {
                assert_eq!(text, Some(OsString::from("-5 degrees")));
                assert_eq!(words, vec![OsString::from("outside")]);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        match log.command {
            Some(Command::Log { request, response }) => {
                assert_eq!(request, Some(OsString::from("- fix it")));
                assert_eq!(response, Some(OsString::from("- fixed")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_without_command() {
        // Arrange & Act
        let config = Config::try_parse_from(["jiranote"]).expect("Should parse");

        // Assert
        assert!(config.command.is_none());
        assert_eq!(config.repo, PathBuf::from("."));
    }

    #[test]
    fn test_parse_unknown_command_fails() {
        assert!(Config::try_parse_from(["jiranote", "frobnicate"]).is_err());
    }

    #[test]
    fn test_credentials_trim_trailing_slash() {
        // Arrange
        let env = lookup(&[
            ("JIRA_URL", "https://example.atlassian.net/"),
            ("JIRA_EMAIL", "dev@example.com"),
            ("JIRA_API_TOKEN", "secret"),
        ]);

        // Act
        let credentials = Credentials::from_lookup(env).expect("Should read credentials");

        // Assert
        assert_eq!(credentials.base_url(), "https://example.atlassian.net");
        assert_eq!(credentials.email(), "dev@example.com");
        assert_eq!(credentials.api_token(), "secret");
    }

    #[test]
    fn test_credentials_report_missing_variables() {
        // Arrange
        let env = lookup(&[("JIRA_URL", "https://example.atlassian.net"), ("JIRA_EMAIL", " ")]);

        // Act
        let result = Credentials::from_lookup(env);

        // Assert
        let err_msg = format!("{:#}", result.unwrap_err());
        assert!(err_msg.contains("JIRA_EMAIL"));
        assert!(err_msg.contains("JIRA_API_TOKEN"));
        assert!(!err_msg.contains("JIRA_URL"));
    }

    #[test]
    fn test_credentials_debug_hides_token() {
        // Arrange
        let env = lookup(&[
            ("JIRA_URL", "https://x"),
            ("JIRA_EMAIL", "a@b"),
            ("JIRA_API_TOKEN", "hunter2"),
        ]);
        let credentials = Credentials::from_lookup(env).expect("Should read credentials");

        // Act
        let debug_str = format!("{:?}", credentials);

        // Assert
        assert!(!debug_str.contains("hunter2"));
    }

    #[test]
    fn test_default_issue_key_precedence() {
        assert_eq!(
            default_issue_key_from(lookup(&[
                ("DEFAULT_ISSUE_KEY", "WEB-1"),
                ("JIRA_PROJECT_KEY", "WEB-2"),
            ])),
            Some("WEB-1".to_string())
        );
        assert_eq!(
            default_issue_key_from(lookup(&[("JIRA_PROJECT_KEY", "WEB-2")])),
            Some("WEB-2".to_string())
        );
        assert_eq!(default_issue_key_from(lookup(&[])), None);
    }

    #[test]
    fn test_load_env_files_missing_dir_is_silent() {
        load_env_files(Path::new("/definitely/not/a/real/path/anywhere"));
    }
}
