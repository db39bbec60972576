//! Comment text and document templates.

use regex::Regex;
use std::sync::LazyLock;

use crate::document::{Document, DocumentNode};
use crate::git::CommitSummary;

/// Changed files listed in a commit comment before the rest are summarized.
const MAX_LISTED_FILES: usize = 10;

/// Name of the summary draft written by `create-comment-file`.
pub const COMMENT_FILE_NAME: &str = "jira-comment.txt";

/// Initial content of the summary draft.
pub const COMMENT_FILE_TEMPLATE: &str = "\
Write the work summary here.

### Completed
- Task 1
- Task 2

### Next
- Task 3
";

/// Matches issue keys like `WEB-123`.
static ISSUE_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]+-\d+").unwrap());

/// Returns the first issue key mentioned in text.
pub fn extract_issue_key(text: &str) -> Option<&str> {
    ISSUE_KEY.find(text).map(|m| m.as_str())
}

/// Builds the plain text body posted after a commit.
///
/// Section labels use the `**Label:**` form so the plain text converter
/// turns them into headings.
pub fn commit_comment(commit: &CommitSummary) -> String {
    let files = commit.files();
    let mut lines = vec![
        format!("Commit: {}", commit.short_oid()),
        format!("Author: {}", commit.author()),
        format!("Date: {}", commit.formatted_date()),
        String::new(),
        "**Commit message:**".to_string(),
        commit.message().to_string(),
        String::new(),
        "**Change stats:**".to_string(),
        format!(
            "+{} lines added, -{} lines deleted",
            commit.additions(),
            commit.deletions()
        ),
        String::new(),
        format!("**Changed files ({}):**", files.len()),
    ];

    lines.extend(
        files
            .iter()
            .take(MAX_LISTED_FILES)
            .map(|file| format!("- {}", file)),
    );
    if files.len() > MAX_LISTED_FILES {
        lines.push(format!(
            "... and {} more files",
            files.len() - MAX_LISTED_FILES
        ));
    }

    lines.join("\n")
}

/// Builds the conversation log document for a request and its response.
///
/// The request is kept verbatim in a code block; each non-blank response
/// line becomes its own paragraph.
pub fn conversation_log(request: &str, response: &str, timestamp: &str) -> Document {
    let mut nodes = vec![
        DocumentNode::heading(3, format!("Conversation log - {}", timestamp)),
        DocumentNode::empty_paragraph(),
        DocumentNode::heading(4, "User request"),
        DocumentNode::code_block("plain", request),
        DocumentNode::empty_paragraph(),
        DocumentNode::heading(4, "Response"),
    ];

    nodes.extend(
        response
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(DocumentNode::paragraph),
    );

    Document::new(nodes)
}
