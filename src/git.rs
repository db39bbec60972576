//! Git repository operations.

use anyhow::{Context, Result};
use chrono::{FixedOffset, TimeZone};
use gix::bstr::ByteSlice;
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeMap;
use std::path::Path;

/// Bytes inspected when deciding whether a blob is binary.
const BINARY_PROBE_LEN: usize = 8000;

/// Metadata of a single commit, including its diff against the first parent.
#[derive(Debug, Clone)]
pub struct CommitSummary {
    oid: String,
    short_oid: String,
    author: String,
    date: i64,
    offset: i32,
    message: String,
    files: Vec<String>,
    additions: usize,
    deletions: usize,
}

impl CommitSummary {
    /// Full commit hash.
    pub fn oid(&self) -> &str {
        &self.oid
    }

    /// Short commit hash (7 characters).
    pub fn short_oid(&self) -> &str {
        &self.short_oid
    }

    /// Author name.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Author timestamp (Unix seconds).
    pub fn date(&self) -> i64 {
        self.date
    }

    /// Full commit message, trimmed.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Changed file paths, sorted.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Lines added across all text files.
    pub fn additions(&self) -> usize {
        self.additions
    }

    /// Lines deleted across all text files.
    pub fn deletions(&self) -> usize {
        self.deletions
    }

    /// Author date in the author's timezone, formatted like `git log --pretty=%ai`.
    pub fn formatted_date(&self) -> String {
        format_commit_date(self.date, self.offset)
    }
}

/// Formats Unix seconds at a fixed UTC offset as `YYYY-MM-DD HH:MM:SS +ZZZZ`.
///
/// Falls back to the raw seconds if the offset or timestamp is out of range.
fn format_commit_date(seconds: i64, offset: i32) -> String {
    FixedOffset::east_opt(offset)
        .and_then(|tz| tz.timestamp_opt(seconds, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S %z").to_string())
        .unwrap_or_else(|| seconds.to_string())
}

/// Reads HEAD commit metadata and its changes against the first parent.
///
/// Root commits are compared against an empty tree. Files whose content
/// looks binary are listed but contribute no line counts.
///
/// # Arguments
///
/// * `repo_path`: Path to git repository
///
/// # Errors
///
/// Returns error if:
/// - Repository cannot be opened
/// - HEAD does not point to a commit
/// - Commit, tree or blob objects cannot be read
pub fn read_head_commit(repo_path: impl AsRef<Path>) -> Result<CommitSummary> {
    let repo = gix::open(repo_path.as_ref()).with_context(|| {
        format!(
            "Failed to open repository at {}",
            repo_path.as_ref().display()
        )
    })?;

    let commit = repo.head_commit().context("Failed to read HEAD commit")?;

    let author = commit.author().context("Failed to read author")?;
    let message = commit
        .message_raw()
        .context("Failed to read commit message")?
        .to_str_lossy()
        .trim()
        .to_string();

    let new_files = tree_files(&commit)?;
    let old_files = match commit.parent_ids().next() {
        Some(parent_id) => {
            let parent = parent_id
                .object()
                .context("Failed to read parent commit")?
                .try_into_commit()
                .map_err(|_| anyhow::anyhow!("Parent of HEAD is not a commit"))?;
            tree_files(&parent)?
        }
        None => BTreeMap::new(),
    };

    let mut files = Vec::new();
    let mut additions = 0;
    let mut deletions = 0;

    for (path, old, new) in changed_paths(&old_files, &new_files) {
        let old_data = read_object(&repo, old)?;
        let new_data = read_object(&repo, new)?;
        let (added, deleted) = line_stats(&old_data, &new_data);
        additions += added;
        deletions += deleted;
        files.push(path.to_string());
    }

    Ok(CommitSummary {
        oid: commit.id.to_hex().to_string(),
        short_oid: commit.id.to_hex_with_len(7).to_string(),
        author: author.name.to_str_lossy().to_string(),
        date: author.time.seconds,
        offset: author.time.offset,
        message,
        files,
        additions,
        deletions,
    })
}

/// Maps every non-tree entry of the commit tree to its object ID.
fn tree_files(commit: &gix::Commit<'_>) -> Result<BTreeMap<String, gix::ObjectId>> {
    let tree = commit.tree().context("Failed to read commit tree")?;

    let files = tree
        .traverse()
        .breadthfirst
        .files()
        .context("Failed to traverse tree")?
        .into_iter()
        .map(|entry| (entry.filepath.to_str_lossy().to_string(), entry.oid))
        .collect();

    Ok(files)
}

/// Paths added, deleted, or modified between two trees, in path order.
fn changed_paths<'a>(
    old: &'a BTreeMap<String, gix::ObjectId>,
    new: &'a BTreeMap<String, gix::ObjectId>,
) -> Vec<(&'a str, Option<gix::ObjectId>, Option<gix::ObjectId>)> {
    let mut changes: BTreeMap<&str, (Option<gix::ObjectId>, Option<gix::ObjectId>)> =
        BTreeMap::new();

    for (path, oid) in old {
        if new.get(path) != Some(oid) {
            changes.entry(path.as_str()).or_default().0 = Some(*oid);
        }
    }
    for (path, oid) in new {
        if old.get(path) != Some(oid) {
            changes.entry(path.as_str()).or_default().1 = Some(*oid);
        }
    }

    changes
        .into_iter()
        .map(|(path, (old, new))| (path, old, new))
        .collect()
}

fn read_object(repo: &gix::Repository, oid: Option<gix::ObjectId>) -> Result<Vec<u8>> {
    let Some(oid) = oid else {
        return Ok(Vec::new());
    };

    let object = repo
        .find_object(oid)
        .with_context(|| format!("Failed to read object {}", oid))?;

    Ok(object.data.to_vec())
}

/// Counts added and deleted lines between two blob contents.
///
/// Returns zero counts when either side looks binary.
fn line_stats(old: &[u8], new: &[u8]) -> (usize, usize) {
    if is_binary(old) || is_binary(new) {
        return (0, 0);
    }

    let old = String::from_utf8_lossy(old);
    let new = String::from_utf8_lossy(new);
    let diff = TextDiff::from_lines(old.as_ref(), new.as_ref());

    diff.iter_all_changes()
        .fold((0, 0), |(added, deleted), change| match change.tag() {
            ChangeTag::Insert => (added + 1, deleted),
            ChangeTag::Delete => (added, deleted + 1),
            ChangeTag::Equal => (added, deleted),
        })
}

fn is_binary(data: &[u8]) -> bool {
    data.iter().take(BINARY_PROBE_LEN).any(|b| *b == 0)
}


#[cfg(test)]
impl CommitSummary {
    /// Creates a new CommitSummary instance for testing.
    ///
    /// This constructor is only available in test builds.
    /// Production code should use read_head_commit() to retrieve commit data.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_for_test(
        oid: &str,
        author: &str,
        date: i64,
        offset: i32,
        message: &str,
        files: Vec<String>,
        additions: usize,
        deletions: usize,
    ) -> Self {
        Self {
            oid: oid.to_string(),
            short_oid: oid.chars().take(7).collect(),
            author: author.to_string(),
            date,
            offset,
            message: message.to_string(),
            files,
            additions,
            deletions,
        }
    }
}
