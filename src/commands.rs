//! Command dispatch.
//!
//! Each subcommand builds one [`Document`] from its input and hands it to an
//! [`IssueTracker`]. The tracker is created lazily through a connect
//! function, so input errors and dry runs never touch credentials or the
//! network.

use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::client::IssueTracker;
use crate::config::{Command, Config};
use crate::convert::{markdown_to_document, text_to_document};
use crate::document::Document;
use crate::encoding::{decode_text, normalize_content, strip_bom};
use crate::git::read_head_commit;
use crate::templates::{
    COMMENT_FILE_NAME, COMMENT_FILE_TEMPLATE, commit_comment, conversation_log, extract_issue_key,
};

const COMMENT_USAGE: &str = "\
Usage: jiranote comment \"text\" [--issue WEB-123]
   or: jiranote comment @file.txt [--issue WEB-123]";

const SUMMARY_USAGE: &str = "\
Usage: jiranote summary \"summary\" [--issue WEB-123]
   or: jiranote summary --file file.md [--issue WEB-123]";

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command did its work.
    Completed,
    /// Nothing to do; not a failure.
    Skipped,
    /// Required content was missing and usage was printed.
    Usage,
}

impl Outcome {
    /// Process exit code for the outcome.
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Completed | Self::Skipped => ExitCode::SUCCESS,
            Self::Usage => ExitCode::from(1),
        }
    }
}

/// Runs commands against a lazily connected tracker.
pub struct Dispatcher<F> {
    workdir: PathBuf,
    default_issue: Option<String>,
    connect: F,
}

impl<T, F> Dispatcher<F>
where
    T: IssueTracker,
    F: Fn() -> Result<T>,
{
    /// Creates dispatcher.
    ///
    /// # Arguments
    ///
    /// * `workdir`: Directory that `@path` references and the comment file resolve against
    /// * `default_issue`: Issue key used when `--issue` is not given
    /// * `connect`: Creates the tracker client on first network use
    pub fn new(workdir: impl Into<PathBuf>, default_issue: Option<String>, connect: F) -> Self {
        Self {
            workdir: workdir.into(),
            default_issue,
            connect,
        }
    }

    /// Executes the configured command.
    ///
    /// Returns [`Outcome::Usage`] after printing usage when required content
    /// is missing.
    ///
    /// # Errors
    ///
    /// Returns error if input files cannot be read, configuration is
    /// incomplete, or a tracker request fails.
    pub fn run(&self, config: &Config) -> Result<Outcome> {
        let Some(command) = &config.command else {
            Config::command()
                .print_help()
                .context("Failed to print help")?;
            return Ok(Outcome::Completed);
        };

        match command {
            Command::PostCommit => self.post_commit(config),
            Command::Comment { text, words } => {
                let args: Vec<&OsStr> =
                    text.iter().chain(words).map(OsString::as_os_str).collect();
                self.comment(config, &args)
            }
            Command::Log { request, response } => {
                self.log(config, request.as_deref(), response.as_deref())
            }
            Command::Summary { text, file } => {
                self.summary(config, text.as_deref(), file.as_deref())
            }
            Command::Delete => self.delete(config),
            Command::CreateCommentFile => self.create_comment_file(config),
        }
    }

    fn post_commit(&self, config: &Config) -> Result<Outcome> {
        let commit = match read_head_commit(&config.repo) {
            Ok(commit) => commit,
            Err(e) => {
                eprintln!(
                    "Warning: Could not read commit information, skipping comment: {:#}",
                    e
                );
                return Ok(Outcome::Skipped);
            }
        };

        let issue_key = extract_issue_key(commit.message())
            .map(String::from)
            .or_else(|| config.issue.clone())
            .or_else(|| self.default_issue.clone());
        let Some(issue_key) = issue_key else {
            eprintln!(
                "Warning: No issue key in commit {} and no default issue, skipping comment",
                commit.short_oid()
            );
            return Ok(Outcome::Skipped);
        };

        let document = text_to_document(&commit_comment(&commit));
        self.send(config, &issue_key, &document)?;
        if !config.dry_run {
            println!("Commit {} posted to {}", commit.short_oid(), issue_key);
        }

        Ok(Outcome::Completed)
    }

    fn comment(&self, config: &Config, args: &[&OsStr]) -> Result<Outcome> {
        let content = match args.first() {
            Some(&first) if is_file_reference(first) => self.read_content(first)?,
            Some(_) => args
                .iter()
                .map(|arg| decode_text(arg.as_encoded_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(" "),
            None => String::new(),
        };

        if content.trim().is_empty() {
            eprintln!("{}", COMMENT_USAGE);
            return Ok(Outcome::Usage);
        }

        let issue_key = self.issue_key(config)?;
        self.send(config, &issue_key, &text_to_document(&content))?;
        if !config.dry_run {
            println!("Comment added: {}", issue_key);
        }

        Ok(Outcome::Completed)
    }

    fn log(
        &self,
        config: &Config,
        request: Option<&OsStr>,
        response: Option<&OsStr>,
    ) -> Result<Outcome> {
        let request = request
            .map(|arg| self.read_content(arg))
            .transpose()?
            .unwrap_or_default();
        let response = response
            .map(|arg| self.read_content(arg))
            .transpose()?
            .unwrap_or_default();

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let document = conversation_log(&request, &response, &timestamp);

        let issue_key = self.issue_key(config)?;
        self.send(config, &issue_key, &document)?;
        if !config.dry_run {
            println!("Conversation logged: {}", issue_key);
        }

        Ok(Outcome::Completed)
    }

    fn summary(
        &self,
        config: &Config,
        text: Option<&OsStr>,
        file: Option<&Path>,
    ) -> Result<Outcome> {
        let summary = match (file, text) {
            (Some(file), _) => self.read_file(file)?,
            (None, Some(text)) => self.read_content(text)?,
            (None, None) => String::new(),
        };

        if summary.is_empty() {
            eprintln!("{}", SUMMARY_USAGE);
            return Ok(Outcome::Usage);
        }

        let issue_key = self.issue_key(config)?;
        self.send(config, &issue_key, &markdown_to_document(&summary))?;
        if !config.dry_run {
            println!("Work summary added: {}", issue_key);
        }

        Ok(Outcome::Completed)
    }

    fn delete(&self, config: &Config) -> Result<Outcome> {
        let issue_key = self.issue_key(config)?;
        let tracker = (self.connect)()?;

        let Some(comment_id) = tracker.fetch_latest_comment_id(&issue_key)? else {
            println!("No comments to delete on {}", issue_key);
            return Ok(Outcome::Skipped);
        };

        if config.dry_run {
            println!("Would delete comment {} on {}", comment_id, issue_key);
            return Ok(Outcome::Completed);
        }

        tracker.delete(&issue_key, &comment_id)?;
        println!("Comment {} deleted: {}", comment_id, issue_key);

        Ok(Outcome::Completed)
    }

    fn create_comment_file(&self, config: &Config) -> Result<Outcome> {
        let path = self.workdir.join(COMMENT_FILE_NAME);
        let issue_hint = config
            .issue
            .clone()
            .or_else(|| self.default_issue.clone())
            .unwrap_or_else(|| "<ISSUE-KEY>".to_string());
        let next_step = format!(
            "After editing: jiranote summary --file {} --issue {}",
            COMMENT_FILE_NAME, issue_hint
        );

        if path.exists() {
            let bytes = fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            println!("Current file content:");
            println!("{}", strip_bom(&decode_text(&bytes)));
            println!();
            println!("{}", next_step);
        } else {
            fs::write(&path, format!("\u{feff}{}", COMMENT_FILE_TEMPLATE))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Created: {}", path.display());
            println!("{}", next_step);
        }

        Ok(Outcome::Completed)
    }

    /// Posts document, or prints it when `--dry-run` is set.
    fn send(&self, config: &Config, issue_key: &str, document: &Document) -> Result<()> {
        if config.dry_run {
            let json = serde_json::to_string_pretty(&document.to_comment_body())
                .context("Failed to serialize comment body")?;
            println!("Issue: {}", issue_key);
            println!("{}", document.to_plain_text());
            println!();
            println!("{}", json);
            return Ok(());
        }

        let tracker = (self.connect)()?;
        tracker
            .submit(issue_key, document)
            .with_context(|| format!("Failed to add comment to {}", issue_key))?;

        Ok(())
    }

    fn issue_key(&self, config: &Config) -> Result<String> {
        match config.issue.clone().or_else(|| self.default_issue.clone()) {
            Some(key) => Ok(key),
            None => bail!("No issue key: pass --issue or set DEFAULT_ISSUE_KEY"),
        }
    }

    /// Resolves a content argument: `@path` reads the file, anything else is literal text.
    fn read_content(&self, arg: &OsStr) -> Result<String> {
        if is_file_reference(arg) {
            let reference = arg.to_string_lossy();
            return self.read_file(Path::new(&reference[1..]));
        }

        Ok(normalize_content(arg.as_encoded_bytes()))
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        let path = self.workdir.join(path);
        let bytes =
            fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;

        Ok(normalize_content(&bytes))
    }
}

fn is_file_reference(arg: &OsStr) -> bool {
    arg.as_encoded_bytes().starts_with(b"@")
}
