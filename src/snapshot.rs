//! Read-only repository snapshot consumed by the prompt renderer.
//!
//! These types mirror what the surrounding orchestration fetches from the
//! GitHub/GitLab APIs before invoking the core: primary resource metadata,
//! the ordered comment thread, the ordered changed-file list with diff
//! stats, and the ordered review thread with nested inline comments. The
//! core never fetches anything itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything the renderer may reference about the issue/PR under action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    pub title: String,
    pub body: Option<String>,
    pub author: Option<String>,
    /// `open`, `closed`, `merged`, ...
    pub state: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// PR head branch, when the resource is a PR.
    pub source_branch: Option<String>,
    /// PR merge target, when the resource is a PR.
    pub target_branch: Option<String>,
    /// Chronological comment thread.
    pub comments: Vec<CommentEntry>,
    /// Changed files, PR events only.
    pub changed_files: Vec<ChangedFile>,
    /// Code reviews, PR events only.
    pub reviews: Vec<ReviewEntry>,
}

/// One comment in the thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentEntry {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// One changed file with per-file diff stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
    pub path: String,
    /// `ADDED`, `MODIFIED`, `DELETED`, `RENAMED` (provider wording kept).
    pub change_type: String,
    pub additions: u64,
    pub deletions: u64,
    /// Blob SHA at the PR head.
    pub sha: String,
}

/// One submitted code review, possibly with nested inline comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub author: String,
    pub body: Option<String>,
    /// `APPROVED`, `CHANGES_REQUESTED`, `COMMENTED`, ...
    pub state: String,
    pub submitted_at: DateTime<Utc>,
    pub comments: Vec<InlineComment>,
}

/// Inline comment attached to a review, anchored to a file/line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineComment {
    pub path: String,
    pub line: Option<u64>,
    pub author: String,
    pub body: String,
}
