//! Post commit summaries, conversation logs and notes as Jira comments.

mod client;
mod commands;
mod config;
mod convert;
mod document;
mod encoding;
mod git;
mod templates;

pub use client::{CommentId, IssueTracker, JiraClient};
pub use commands::{Dispatcher, Outcome};
pub use config::{Command, Config, Credentials, default_issue_key, load_env_files};
pub use convert::{markdown_to_document, text_to_document};
pub use document::{Document, DocumentNode, TextRun};
pub use encoding::{decode_text, normalize_content, strip_bom};
pub use git::{CommitSummary, read_head_commit};
pub use templates::{
    COMMENT_FILE_NAME, COMMENT_FILE_TEMPLATE, commit_comment, conversation_log, extract_issue_key,
};
