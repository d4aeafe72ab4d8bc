//! Pure formatting helpers for prompt sections.
//!
//! Every helper is deterministic and total: missing optional fields render
//! as placeholders, never panic and never drop the section entirely.
//! Timestamps are rendered as RFC 3339 with second precision so re-running
//! the same event yields a byte-identical prompt.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::snapshot::{ChangedFile, CommentEntry, RepositorySnapshot, ReviewEntry};

pub const NO_DESCRIPTION: &str = "No description provided";
pub const NO_COMMENTS: &str = "No comments";
pub const NO_CHANGED_FILES: &str = "No files changed";
pub const NO_REVIEWS: &str = "No reviews";
const UNKNOWN: &str = "Unknown";

fn ts(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn opt(field: Option<&str>) -> &str {
    match field {
        Some(v) if !v.trim().is_empty() => v,
        _ => UNKNOWN,
    }
}

/// Header block summarizing the primary resource (issue or PR).
pub fn format_context(snapshot: &RepositorySnapshot, is_pr: bool) -> String {
    let mut s = String::new();
    if is_pr {
        s.push_str(&format!("PR Title: {}\n", snapshot.title));
        s.push_str(&format!("PR Author: {}\n", opt(snapshot.author.as_deref())));
        s.push_str(&format!(
            "PR Branch: {} -> {}\n",
            opt(snapshot.source_branch.as_deref()),
            opt(snapshot.target_branch.as_deref())
        ));
        s.push_str(&format!("PR State: {}\n", opt(snapshot.state.as_deref())));
        let additions: u64 = snapshot.changed_files.iter().map(|f| f.additions).sum();
        let deletions: u64 = snapshot.changed_files.iter().map(|f| f.deletions).sum();
        s.push_str(&format!("PR Additions: {additions}\n"));
        s.push_str(&format!("PR Deletions: {deletions}\n"));
        s.push_str(&format!(
            "Total Files Changed: {}",
            snapshot.changed_files.len()
        ));
    } else {
        s.push_str(&format!("Issue Title: {}\n", snapshot.title));
        s.push_str(&format!(
            "Issue Author: {}\n",
            opt(snapshot.author.as_deref())
        ));
        s.push_str(&format!("Issue State: {}", opt(snapshot.state.as_deref())));
    }
    if let Some(created) = &snapshot.created_at {
        s.push_str(&format!("\nCreated At: {}", ts(created)));
    }
    if let Some(updated) = &snapshot.updated_at {
        s.push_str(&format!("\nUpdated At: {}", ts(updated)));
    }
    s
}

/// Issue/PR body, or the standard placeholder.
pub fn format_body(body: Option<&str>) -> String {
    match body {
        Some(b) if !b.trim().is_empty() => b.to_string(),
        _ => NO_DESCRIPTION.to_string(),
    }
}

/// Chronological `[author at timestamp]: body` lines.
pub fn format_comments(comments: &[CommentEntry]) -> String {
    if comments.is_empty() {
        return NO_COMMENTS.to_string();
    }
    comments
        .iter()
        .map(|c| format!("[{} at {}]: {}", c.author, ts(&c.created_at), c.body))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `- path (changeType) +additions/-deletions SHA: sha` lines.
pub fn format_changed_files(files: &[ChangedFile]) -> String {
    if files.is_empty() {
        return NO_CHANGED_FILES.to_string();
    }
    files
        .iter()
        .map(|f| {
            format!(
                "- {} ({}) +{}/-{} SHA: {}",
                f.path, f.change_type, f.additions, f.deletions, f.sha
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Review thread: `[Review by author at time]: STATE`, review body, then
/// nested inline comments indented underneath.
pub fn format_reviews(reviews: &[ReviewEntry]) -> String {
    if reviews.is_empty() {
        return NO_REVIEWS.to_string();
    }
    let mut out: Vec<String> = Vec::with_capacity(reviews.len());
    for r in reviews {
        let mut s = format!("[Review by {} at {}]: {}", r.author, ts(&r.submitted_at), r.state);
        if let Some(body) = r.body.as_deref().filter(|b| !b.trim().is_empty()) {
            s.push('\n');
            s.push_str(body);
        }
        for c in &r.comments {
            let line = c
                .line
                .map(|l| l.to_string())
                .unwrap_or_else(|| "?".to_string());
            s.push_str(&format!(
                "\n  [Comment on {}:{} by {}]: {}",
                c.path, line, c.author, c.body
            ));
        }
        out.push(s);
    }
    out.join("\n\n")
}
