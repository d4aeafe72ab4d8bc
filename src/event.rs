//! Event normalization: raw platform events → one `EventData` variant.
//!
//! GitHub Actions contexts and GitLab webhooks both funnel into the loose
//! `RawEvent` bag (the GitLab side via [`crate::gitlab`]); `normalize` then
//! classifies the bag into exactly one variant of the closed `EventData`
//! union. Everything downstream (validation, permissions, rendering)
//! pattern-matches on the union, never on raw strings.
//!
//! Classification is keyed by `name` and, for the `issues` family only, by
//! `action`. GitHub delivers both issue comments and PR comments as
//! `issue_comment`; the `is_pr` flag on the raw payload disambiguates.

use serde::{Deserialize, Serialize};

use crate::errors::{BridgeResult, Error};

/// Loosely-typed field bag extracted from the platform payload.
///
/// Collected by the CI/webhook wrapper (or by [`crate::gitlab`] for GitLab
/// payloads) before normalization. Fields are optional here; `normalize`
/// enforces what each event family actually requires.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    /// Canonical event name: `issue_comment`, `issues`, `pull_request`,
    /// `pull_request_review`, `pull_request_review_comment`.
    pub name: String,
    /// Event action where the platform provides one (`opened`, `assigned`,
    /// `synchronize`, ...).
    pub action: Option<String>,
    /// For `issue_comment`: whether the "issue" is actually a pull request.
    #[serde(default)]
    pub is_pr: bool,
    pub issue_number: Option<String>,
    pub pr_number: Option<String>,
    pub comment_id: Option<String>,
    pub comment_body: Option<String>,
    /// Login of the user whose comment/issue/assignment fired the event.
    pub actor: Option<String>,
    /// For `issues`/`assigned`: the assignee login that matched the trigger.
    pub assignee_login: Option<String>,
}

/// Normalized event representation. Exactly one variant per invocation.
///
/// Fields absent from a variant's shape must never be read; the renderer
/// narrows by matching on the variant before touching anything
/// variant-specific.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventData {
    /// Inline review comment on a PR diff.
    PullRequestReviewComment {
        pr_number: String,
        comment_id: Option<String>,
        comment_body: String,
        claude_branch: Option<String>,
        base_branch: Option<String>,
    },
    /// Top-level PR review submission (approve/request-changes/comment).
    PullRequestReview {
        pr_number: String,
        comment_body: String,
        claude_branch: Option<String>,
        base_branch: Option<String>,
    },
    /// Comment on a plain issue. Branches are mandatory: the agent always
    /// works on a dedicated branch for issue work.
    IssueComment {
        issue_number: String,
        comment_id: String,
        comment_body: String,
        base_branch: String,
        claude_branch: String,
    },
    /// Comment on a PR delivered through the `issue_comment` event.
    PullRequestComment {
        pr_number: String,
        comment_id: String,
        comment_body: String,
        claude_branch: Option<String>,
        base_branch: Option<String>,
    },
    IssueOpened {
        issue_number: String,
        base_branch: String,
        claude_branch: String,
    },
    IssueAssigned {
        issue_number: String,
        base_branch: String,
        claude_branch: String,
        assignee_trigger: String,
    },
    /// PR lifecycle event (opened/synchronize/closed...).
    PullRequest {
        pr_number: String,
        event_action: Option<String>,
        claude_branch: Option<String>,
        base_branch: Option<String>,
    },
}

impl EventData {
    /// Whether this event targets a pull request (vs a plain issue).
    pub fn is_pr(&self) -> bool {
        matches!(
            self,
            EventData::PullRequestReviewComment { .. }
                | EventData::PullRequestReview { .. }
                | EventData::PullRequestComment { .. }
                | EventData::PullRequest { .. }
        )
    }

    /// The PR or issue number this event refers to.
    pub fn number(&self) -> &str {
        match self {
            EventData::PullRequestReviewComment { pr_number, .. }
            | EventData::PullRequestReview { pr_number, .. }
            | EventData::PullRequestComment { pr_number, .. }
            | EventData::PullRequest { pr_number, .. } => pr_number,
            EventData::IssueComment { issue_number, .. }
            | EventData::IssueOpened { issue_number, .. }
            | EventData::IssueAssigned { issue_number, .. } => issue_number,
        }
    }

    /// Dedicated working branch, when one was created for this invocation.
    pub fn claude_branch(&self) -> Option<&str> {
        match self {
            EventData::PullRequestReviewComment { claude_branch, .. }
            | EventData::PullRequestReview { claude_branch, .. }
            | EventData::PullRequestComment { claude_branch, .. }
            | EventData::PullRequest { claude_branch, .. } => claude_branch.as_deref(),
            EventData::IssueComment { claude_branch, .. }
            | EventData::IssueOpened { claude_branch, .. }
            | EventData::IssueAssigned { claude_branch, .. } => Some(claude_branch),
        }
    }

    /// Merge target for a PR created off the dedicated branch.
    pub fn base_branch(&self) -> Option<&str> {
        match self {
            EventData::PullRequestReviewComment { base_branch, .. }
            | EventData::PullRequestReview { base_branch, .. }
            | EventData::PullRequestComment { base_branch, .. }
            | EventData::PullRequest { base_branch, .. } => base_branch.as_deref(),
            EventData::IssueComment { base_branch, .. }
            | EventData::IssueOpened { base_branch, .. }
            | EventData::IssueAssigned { base_branch, .. } => Some(base_branch),
        }
    }

    /// The comment body that carried the trigger, where the event has one.
    pub fn comment_body(&self) -> Option<&str> {
        match self {
            EventData::PullRequestReviewComment { comment_body, .. }
            | EventData::PullRequestReview { comment_body, .. }
            | EventData::IssueComment { comment_body, .. }
            | EventData::PullRequestComment { comment_body, .. } => Some(comment_body),
            EventData::IssueOpened { .. }
            | EventData::IssueAssigned { .. }
            | EventData::PullRequest { .. } => None,
        }
    }
}

fn require(field: Option<&String>, what: &str, event: &str) -> BridgeResult<String> {
    field
        .cloned()
        .ok_or_else(|| Error::Validation(format!("{what} missing for {event} event")))
}

/// Classify a raw event (plus resolved branch state) into one `EventData`.
///
/// Pure mapping, no side effects. The event set is deliberately closed:
/// anything outside it fails with [`Error::UnsupportedEvent`] naming the raw
/// event, and support for a new event means a new union variant.
///
/// Branch requirements per family:
/// - `issue_comment` on an issue: `CLAUDE_BRANCH` checked first, then
///   `BASE_BRANCH` (observed order, kept as a contract).
/// - `issues` (opened/assigned): `BASE_BRANCH` checked first, then
///   `CLAUDE_BRANCH`.
/// - PR-context events: both optional; presence means "closed PR, work on a
///   fresh branch", absence means "open PR, work on the PR branch".
pub fn normalize(
    raw: &RawEvent,
    base_branch: Option<&str>,
    claude_branch: Option<&str>,
) -> BridgeResult<EventData> {
    match raw.name.as_str() {
        "pull_request_review_comment" => Ok(EventData::PullRequestReviewComment {
            pr_number: require(raw.pr_number.as_ref(), "PR number", &raw.name)?,
            comment_id: raw.comment_id.clone(),
            comment_body: require(raw.comment_body.as_ref(), "comment body", &raw.name)?,
            claude_branch: claude_branch.map(str::to_owned),
            base_branch: base_branch.map(str::to_owned),
        }),
        "pull_request_review" => Ok(EventData::PullRequestReview {
            pr_number: require(raw.pr_number.as_ref(), "PR number", &raw.name)?,
            comment_body: require(raw.comment_body.as_ref(), "comment body", &raw.name)?,
            claude_branch: claude_branch.map(str::to_owned),
            base_branch: base_branch.map(str::to_owned),
        }),
        "issue_comment" if raw.is_pr => Ok(EventData::PullRequestComment {
            pr_number: require(raw.pr_number.as_ref(), "PR number", &raw.name)?,
            comment_id: require(raw.comment_id.as_ref(), "comment id", &raw.name)?,
            comment_body: require(raw.comment_body.as_ref(), "comment body", &raw.name)?,
            claude_branch: claude_branch.map(str::to_owned),
            base_branch: base_branch.map(str::to_owned),
        }),
        "issue_comment" => {
            let claude_branch = claude_branch
                .ok_or_else(|| Error::missing_branch("CLAUDE_BRANCH", "issue_comment"))?;
            let base_branch =
                base_branch.ok_or_else(|| Error::missing_branch("BASE_BRANCH", "issue_comment"))?;
            Ok(EventData::IssueComment {
                issue_number: require(raw.issue_number.as_ref(), "issue number", &raw.name)?,
                comment_id: require(raw.comment_id.as_ref(), "comment id", &raw.name)?,
                comment_body: require(raw.comment_body.as_ref(), "comment body", &raw.name)?,
                base_branch: base_branch.to_owned(),
                claude_branch: claude_branch.to_owned(),
            })
        }
        "issues" => {
            let base_branch =
                base_branch.ok_or_else(|| Error::missing_branch("BASE_BRANCH", "issues"))?;
            let claude_branch =
                claude_branch.ok_or_else(|| Error::missing_branch("CLAUDE_BRANCH", "issues"))?;
            let issue_number = require(raw.issue_number.as_ref(), "issue number", &raw.name)?;
            match raw.action.as_deref() {
                Some("opened") => Ok(EventData::IssueOpened {
                    issue_number,
                    base_branch: base_branch.to_owned(),
                    claude_branch: claude_branch.to_owned(),
                }),
                Some("assigned") => Ok(EventData::IssueAssigned {
                    issue_number,
                    base_branch: base_branch.to_owned(),
                    claude_branch: claude_branch.to_owned(),
                    assignee_trigger: require(
                        raw.assignee_login.as_ref(),
                        "assignee login",
                        &raw.name,
                    )?,
                }),
                other => Err(Error::UnsupportedEvent(format!(
                    "issues (action: {})",
                    other.unwrap_or("none")
                ))),
            }
        }
        "pull_request" => Ok(EventData::PullRequest {
            pr_number: require(raw.pr_number.as_ref(), "PR number", &raw.name)?,
            event_action: raw.action.clone(),
            claude_branch: claude_branch.map(str::to_owned),
            base_branch: base_branch.map(str::to_owned),
        }),
        other => Err(Error::UnsupportedEvent(other.to_string())),
    }
}
