//! Text to document conversion.
//!
//! Two independent line oriented converters build a [`crate::Document`]
//! from raw text:
//!
//! - [`text_to_document`] for plain notes and the commit summary template,
//!   recognizing `**bold**` runs and bold lines ending in a colon.
//! - [`markdown_to_document`] for work summaries, recognizing `#` to `###`
//!   headings and `- ` bullet items.
//!
//! Both are total: any input, including the empty string, yields a document
//! with at least one node.

mod markdown;
mod plain;

pub use markdown::markdown_to_document;
pub use plain::text_to_document;
