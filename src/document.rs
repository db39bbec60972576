//! Structured comment documents.
//!
//! A [`Document`] is the in-memory form of one tracker comment body. It is
//! built fresh from raw text, serialized to Atlassian Document Format (ADF)
//! JSON with [`Document::to_adf`], and then dropped.

use serde_json::{Value, json};

/// Inline text span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
}

impl TextRun {
    /// Creates a run without marks.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    /// Creates a run with strong emphasis.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }

    fn to_adf(&self) -> Value {
        if self.bold {
            json!({ "type": "text", "text": self.text, "marks": [{ "type": "strong" }] })
        } else {
            json!({ "type": "text", "text": self.text })
        }
    }
}

/// Block level node of a comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    Heading { level: u8, text: String },
    Paragraph { runs: Vec<TextRun> },
    /// Each item is the runs of the single paragraph inside one list item.
    BulletList { items: Vec<Vec<TextRun>> },
    CodeBlock { language: String, text: String },
}

impl DocumentNode {
    /// Heading node.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    /// Paragraph holding a single plain run.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            runs: vec![TextRun::plain(text)],
        }
    }

    /// Paragraph holding one empty run.
    ///
    /// The tracker renders it as a blank line between blocks.
    pub fn empty_paragraph() -> Self {
        Self::paragraph("")
    }

    /// Bullet list with one plain run per item.
    pub fn bullet_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::BulletList {
            items: items
                .into_iter()
                .map(|item| vec![TextRun::plain(item)])
                .collect(),
        }
    }

    /// Code block with a language hint.
    pub fn code_block(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CodeBlock {
            language: language.into(),
            text: text.into(),
        }
    }

    /// Converts node to its ADF JSON object.
    pub fn to_adf(&self) -> Value {
        match self {
            Self::Heading { level, text } => json!({
                "type": "heading",
                "attrs": { "level": level },
                "content": [TextRun::plain(text.as_str()).to_adf()],
            }),
            Self::Paragraph { runs } => paragraph_adf(runs),
            Self::BulletList { items } => json!({
                "type": "bulletList",
                "content": items
                    .iter()
                    .map(|runs| json!({ "type": "listItem", "content": [paragraph_adf(runs)] }))
                    .collect::<Vec<_>>(),
            }),
            Self::CodeBlock { language, text } => json!({
                "type": "codeBlock",
                "attrs": { "language": language },
                "content": [TextRun::plain(text.as_str()).to_adf()],
            }),
        }
    }

    fn render_plain(&self, out: &mut Vec<String>) {
        match self {
            Self::Heading { text, .. } => {
                if text.ends_with(':') {
                    out.push(format!("**{}**", text));
                } else {
                    out.push(format!("**{}**:", text));
                }
            }
            Self::Paragraph { runs } => out.push(render_runs(runs)),
            Self::BulletList { items } => {
                for runs in items {
                    out.push(format!("- {}", render_runs(runs)));
                }
            }
            Self::CodeBlock { text, .. } => out.push(text.clone()),
        }
    }
}

fn paragraph_adf(runs: &[TextRun]) -> Value {
    json!({
        "type": "paragraph",
        "content": runs.iter().map(TextRun::to_adf).collect::<Vec<_>>(),
    })
}

fn render_runs(runs: &[TextRun]) -> String {
    runs.iter()
        .map(|run| {
            if run.bold {
                format!("**{}**", run.text)
            } else {
                run.text.clone()
            }
        })
        .collect()
}

/// One tracker comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<DocumentNode>,
}

impl Document {
    /// Creates document from nodes.
    ///
    /// An empty node list is replaced by a single empty paragraph since the
    /// tracker rejects comment bodies without content.
    pub fn new(nodes: Vec<DocumentNode>) -> Self {
        if nodes.is_empty() {
            return Self {
                nodes: vec![DocumentNode::empty_paragraph()],
            };
        }
        Self { nodes }
    }

    /// Top level nodes in order.
    pub fn nodes(&self) -> &[DocumentNode] {
        &self.nodes
    }

    /// Serializes to an ADF `doc` object.
    pub fn to_adf(&self) -> Value {
        json!({
            "type": "doc",
            "version": 1,
            "content": self.nodes.iter().map(DocumentNode::to_adf).collect::<Vec<_>>(),
        })
    }

    /// Request payload for the create comment endpoint.
    pub fn to_comment_body(&self) -> Value {
        json!({ "body": self.to_adf() })
    }

    /// Renders document back to the lightweight text syntax.
    ///
    /// Headings of every level come out as `**text**:`, so only level 3
    /// headings produced from plain text map back to the same node.
    pub fn to_plain_text(&self) -> String {
        let mut lines = Vec::new();
        for node in &self.nodes {
            node.render_plain(&mut lines);
        }
        lines.join("\n")
    }
}
