//! Plain text conversion with bold runs.

use regex::Regex;
use std::sync::LazyLock;

use crate::document::{Document, DocumentNode, TextRun};
use crate::encoding::strip_bom;

/// Matches the shortest `**...**` span.
static BOLD_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

/// Converts plain text to a document.
///
/// Blank lines are dropped. Each remaining line becomes either a level 3
/// heading (a single bold span followed by or ending in a colon, like
/// `**Changes:**` or `**Changes**:`), a paragraph split into bold and plain
/// runs, or a paragraph with the line as one plain run.
///
/// # Examples
///
/// ```
/// use jiranote::{DocumentNode, TextRun, text_to_document};
///
/// let doc = text_to_document("**Done:**\nHello **world**");
/// assert_eq!(doc.nodes()[0], DocumentNode::heading(3, "Done:"));
/// assert_eq!(
///     doc.nodes()[1],
///     DocumentNode::Paragraph {
///         runs: vec![TextRun::plain("Hello "), TextRun::bold("world")],
///     }
/// );
/// ```
pub fn text_to_document(text: &str) -> Document {
    let nodes = strip_bom(text)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(classify_line)
        .collect();

    Document::new(nodes)
}

fn classify_line(line: &str) -> DocumentNode {
    if let Some(text) = bold_heading(line) {
        return DocumentNode::Heading { level: 3, text };
    }

    match split_bold_runs(line) {
        Some(runs) => DocumentNode::Paragraph { runs },
        None => DocumentNode::paragraph(line),
    }
}

/// Returns heading text when the whole trimmed line is one bold label.
///
/// The label content must be non-empty and free of `**`, so a line such as
/// `**A** and **B**:` is not a heading.
fn bold_heading(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix("**")?;

    let content = match inner.strip_suffix("**:") {
        Some(content) => content,
        None => inner.strip_suffix("**").filter(|c| c.ends_with(':'))?,
    };

    if content.is_empty() || content.contains("**") {
        return None;
    }

    Some(trimmed.replace("**", ""))
}

/// Splits line into runs around `**...**` spans, left to right.
///
/// Returns None when the line has no complete span.
fn split_bold_runs(line: &str) -> Option<Vec<TextRun>> {
    let mut runs = Vec::new();
    let mut cursor = 0;

    for caps in BOLD_SPAN.captures_iter(line) {
        let (Some(span), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        if span.start() > cursor {
            runs.push(TextRun::plain(&line[cursor..span.start()]));
        }
        runs.push(TextRun::bold(inner.as_str()));
        cursor = span.end();
    }

    if cursor == 0 {
        return None;
    }

    if cursor < line.len() {
        runs.push(TextRun::plain(&line[cursor..]));
    }

    Some(runs)
}
