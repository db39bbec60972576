//! Restricted markdown conversion.

use crate::document::{Document, DocumentNode, TextRun};
use crate::encoding::strip_bom;

/// Converts a markdown subset to a document.
///
/// Supported syntax, one construct per line:
/// - `# `, `## `, `### ` headings
/// - `- ` bullet items, consecutive items grouped into one list
/// - blank lines, kept as empty paragraphs
/// - anything else as a paragraph of the trimmed line
///
/// # Examples
///
/// ```
/// use jiranote::{DocumentNode, markdown_to_document};
///
/// let doc = markdown_to_document("# Title");
/// assert_eq!(doc.nodes(), &[DocumentNode::heading(1, "Title")]);
/// ```
pub fn markdown_to_document(text: &str) -> Document {
    let text = strip_bom(text);
    let mut nodes = Vec::new();
    let mut pending_items = Vec::new();

    for line in text.split('\n') {
        let trimmed = line.trim();

        if let Some(item) = trimmed.strip_prefix("- ") {
            pending_items.push(vec![TextRun::plain(item)]);
            continue;
        }

        flush_list(&mut nodes, &mut pending_items);

        let node = if trimmed.is_empty() {
            DocumentNode::empty_paragraph()
        } else if let Some(rest) = trimmed.strip_prefix("### ") {
            DocumentNode::heading(3, rest)
        } else if let Some(rest) = trimmed.strip_prefix("## ") {
            DocumentNode::heading(2, rest)
        } else if let Some(rest) = trimmed.strip_prefix("# ") {
            DocumentNode::heading(1, rest)
        } else {
            DocumentNode::paragraph(trimmed)
        };
        nodes.push(node);
    }

    flush_list(&mut nodes, &mut pending_items);

    if nodes.is_empty() {
        nodes.push(DocumentNode::paragraph(text));
    }

    Document::new(nodes)
}

/// Moves pending bullet items into one list node.
fn flush_list(nodes: &mut Vec<DocumentNode>, pending_items: &mut Vec<Vec<TextRun>>) {
    if pending_items.is_empty() {
        return;
    }
    nodes.push(DocumentNode::BulletList {
        items: std::mem::take(pending_items),
    });
}
