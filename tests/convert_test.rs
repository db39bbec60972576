//! Converter properties over the public API.

use jiranote::{DocumentNode, TextRun, markdown_to_document, text_to_document};

const SAMPLES: &[&str] = &[
    "",
    " ",
    "\n",
    "\n\n\n",
    "\u{feff}",
    "\r\n",
    "plain",
    "**",
    "****",
    "**:",
    "**Done:**",
    "- ",
    "-",
    "# ",
    "#",
    "### \n- \n\n",
    "- a\n- b\n\nc",
    "# Title\n## Sub\n### Leaf\n- x\ntext",
    "**A** and **B**:",
    "unterminated **bold",
    "한글 **강조** 문장",
];

#[test]
fn test_converters_never_return_empty_documents() {
    for sample in SAMPLES {
        assert!(
            !text_to_document(sample).nodes().is_empty(),
            "plain text converter returned no nodes for {:?}",
            sample
        );
        assert!(
            !markdown_to_document(sample).nodes().is_empty(),
            "markdown converter returned no nodes for {:?}",
            sample
        );
    }
}

#[test]
fn test_documents_serialize_to_adf_doc() {
    for sample in SAMPLES {
        let adf = markdown_to_document(sample).to_adf();
        assert_eq!(adf["type"], "doc");
        assert_eq!(adf["version"], 1);
        assert!(!adf["content"].as_array().map_or(true, Vec::is_empty));
    }
}

#[test]
fn test_markdown_empty_input() {
    let doc = markdown_to_document("");

    assert_eq!(
        doc.nodes(),
        &[DocumentNode::Paragraph {
            runs: vec![TextRun::plain("")],
        }]
    );
}

#[test]
fn test_markdown_single_heading() {
    assert_eq!(
        markdown_to_document("# Title").nodes(),
        &[DocumentNode::heading(1, "Title")]
    );
}

#[test]
fn test_markdown_list_then_paragraph() {
    assert_eq!(
        markdown_to_document("- a\n- b\n\nc").nodes(),
        &[
            DocumentNode::bullet_list(["a", "b"]),
            DocumentNode::paragraph(""),
            DocumentNode::paragraph("c"),
        ]
    );
}

#[test]
fn test_plain_bold_heading() {
    assert_eq!(
        text_to_document("**Done:**").nodes(),
        &[DocumentNode::heading(3, "Done:")]
    );
}

#[test]
fn test_plain_bold_runs() {
    assert_eq!(
        text_to_document("Hello **world** end").nodes(),
        &[DocumentNode::Paragraph {
            runs: vec![
                TextRun::plain("Hello "),
                TextRun::bold("world"),
                TextRun::plain(" end"),
            ],
        }]
    );
}

#[test]
fn test_bold_runs_serialize_with_strong_mark() {
    let adf = text_to_document("a **b**").to_adf();
    let runs = &adf["content"][0]["content"];

    assert_eq!(runs[0]["text"], "a ");
    assert!(runs[0].get("marks").is_none());
    assert_eq!(runs[1]["text"], "b");
    assert_eq!(runs[1]["marks"][0]["type"], "strong");
}

/// Only level 3 headings from the plain text path survive a render and
/// reconvert; markdown headings come back as level 3 labels with a colon.
#[test]
fn test_heading_round_trip_asymmetry() {
    let plain = text_to_document("**Stats:**");
    assert_eq!(text_to_document(&plain.to_plain_text()), plain);

    let markdown = markdown_to_document("## Stats");
    assert_eq!(
        text_to_document(&markdown.to_plain_text()).nodes(),
        &[DocumentNode::heading(3, "Stats:")]
    );
}
