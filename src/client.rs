//! Issue tracker comment client.
//!
//! [`IssueTracker`] is the seam between commands and the remote service.
//! [`JiraClient`] implements it against the Jira Cloud REST API v3 with a
//! blocking HTTP client: every call is sent and awaited in order, with no
//! retries.

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::fmt;

use crate::config::Credentials;
use crate::document::Document;

/// Comment identifier assigned by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentId(String);

impl CommentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comment operations on a remote issue tracker.
pub trait IssueTracker {
    /// Adds a comment to the issue and returns its identifier.
    fn submit(&self, issue_key: &str, document: &Document) -> Result<CommentId>;

    /// Returns the most recently created comment, if any.
    fn fetch_latest_comment_id(&self, issue_key: &str) -> Result<Option<CommentId>>;

    /// Deletes a comment.
    fn delete(&self, issue_key: &str, comment_id: &CommentId) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct CommentRef {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct CommentPage {
    #[serde(default)]
    comments: Vec<CommentRef>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default, rename = "errorMessages")]
    error_messages: Vec<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Jira Cloud comment client.
pub struct JiraClient {
    http: Client,
    base_url: String,
}

impl JiraClient {
    /// Creates client authenticating with email and API token.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials cannot form a header or the HTTP
    /// client cannot be built.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let token = STANDARD.encode(format!(
            "{}:{}",
            credentials.email(),
            credentials.api_token()
        ));
        let mut auth = HeaderValue::from_str(&format!("Basic {}", token))
            .context("Credentials contain characters not allowed in a header")?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: credentials.base_url().to_string(),
        })
    }

    /// Comment collection URL of an issue.
    fn comments_url(&self, issue_key: &str) -> String {
        comments_url(&self.base_url, issue_key)
    }
}

impl IssueTracker for JiraClient {
    fn submit(&self, issue_key: &str, document: &Document) -> Result<CommentId> {
        let url = self.comments_url(issue_key);
        let body = serde_json::to_vec(&document.to_comment_body())
            .context("Failed to serialize comment body")?;
        tracing::debug!(%url, bytes = body.len(), "creating comment");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(body)
            .send()
            .with_context(|| format!("Failed to send comment to {}", issue_key))?;

        let created: CommentRef = ensure_success(response)?
            .json()
            .context("Failed to parse created comment")?;
        tracing::info!(issue = issue_key, comment = %created.id, "comment created");

        Ok(CommentId(created.id))
    }

    fn fetch_latest_comment_id(&self, issue_key: &str) -> Result<Option<CommentId>> {
        let url = self.comments_url(issue_key);
        tracing::debug!(%url, "listing comments");

        let response = self
            .http
            .get(&url)
            .query(&[("orderBy", "-created")])
            .send()
            .with_context(|| format!("Failed to list comments of {}", issue_key))?;

        let page: CommentPage = ensure_success(response)?
            .json()
            .context("Failed to parse comment list")?;

        Ok(latest_comment(page.comments))
    }

    fn delete(&self, issue_key: &str, comment_id: &CommentId) -> Result<()> {
        let url = format!("{}/{}", self.comments_url(issue_key), comment_id);
        tracing::debug!(%url, "deleting comment");

        let response = self
            .http
            .delete(&url)
            .send()
            .with_context(|| format!("Failed to delete comment {}", comment_id))?;

        ensure_success(response)?;
        tracing::info!(issue = issue_key, comment = %comment_id, "comment deleted");

        Ok(())
    }
}

fn comments_url(base_url: &str, issue_key: &str) -> String {
    format!("{}/rest/api/3/issue/{}/comment", base_url, issue_key)
}

/// Picks the comment with the highest numeric ID.
///
/// Jira IDs grow monotonically, so this is the newest comment regardless of
/// the order the page was returned in. Non-numeric IDs fall back to list
/// order.
fn latest_comment(comments: Vec<CommentRef>) -> Option<CommentId> {
    comments
        .into_iter()
        .enumerate()
        .max_by_key(|(idx, comment)| (comment.id.parse::<u64>().ok(), *idx))
        .map(|(_, comment)| CommentId(comment.id))
}

/// Passes successful responses through, turning others into errors.
fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    tracing::debug!(%status, %body, "request failed");
    bail!("{}", api_error_message(status, &body))
}

/// Extracts a readable error from a failed response.
///
/// Prefers the joined `errorMessages`, then `message`, then the status
/// reason phrase.
fn api_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(error) = serde_json::from_str::<ApiError>(body) {
        if !error.error_messages.is_empty() {
            return error.error_messages.join(", ");
        }
        if let Some(message) = error.message.filter(|m| !m.is_empty()) {
            return message;
        }
    }

    status
        .canonical_reason()
        .map(String::from)
        .unwrap_or_else(|| status.to_string())
}
