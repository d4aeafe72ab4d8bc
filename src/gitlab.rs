//! GitLab webhook payloads → canonical [`RawEvent`] field bags.
//!
//! GitLab names its events differently from GitHub Actions (`note`,
//! `issue`, `merge_request` object kinds instead of `issue_comment`,
//! `issues`, `pull_request`). This adapter flattens the relevant corner of a
//! GitLab webhook into the same canonical bag the GitHub side produces, so
//! the normalizer stays platform-agnostic.
//!
//! Only the fields the normalizer consumes are modeled; the rest of the
//! webhook body is ignored during deserialization.

use serde::Deserialize;

use crate::errors::{BridgeResult, Error};
use crate::event::RawEvent;

/// Minimal shape of a GitLab webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GitLabEvent {
    /// `note`, `issue`, or `merge_request`.
    pub object_kind: String,
    pub object_attributes: GitLabObjectAttributes,
    /// Present on `note` hooks attached to a merge request.
    pub merge_request: Option<GitLabMergeRequestRef>,
    /// Present on `note` hooks attached to an issue.
    pub issue: Option<GitLabIssueRef>,
    pub user: Option<GitLabUser>,
    /// Present on `issue` hooks when assignees changed.
    #[serde(default)]
    pub assignees: Vec<GitLabUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabObjectAttributes {
    pub id: Option<u64>,
    pub iid: Option<u64>,
    /// `open`, `close`, `reopen`, `update` for issues/MRs.
    pub action: Option<String>,
    /// Note body for `note` hooks.
    pub note: Option<String>,
    /// `Issue` or `MergeRequest` for `note` hooks.
    pub noteable_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabMergeRequestRef {
    pub iid: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabIssueRef {
    pub iid: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabUser {
    pub username: String,
}

/// Map a GitLab webhook into the canonical raw-event bag.
///
/// - `note` on a merge request → `issue_comment` with `is_pr = true`
/// - `note` on an issue → `issue_comment`
/// - `issue` with action `open` → `issues`/`opened`
/// - `issue` with action `update` and assignees → `issues`/`assigned`
/// - `merge_request` → `pull_request` (action mapped to GitHub terms)
///
/// Anything else is outside the supported closed set.
pub fn to_raw_event(ev: &GitLabEvent) -> BridgeResult<RawEvent> {
    let actor = ev.user.as_ref().map(|u| u.username.clone());
    match ev.object_kind.as_str() {
        "note" => {
            let comment_id = ev.object_attributes.id.map(|id| id.to_string());
            let comment_body = ev.object_attributes.note.clone();
            if let Some(mr) = &ev.merge_request {
                Ok(RawEvent {
                    name: "issue_comment".into(),
                    is_pr: true,
                    pr_number: Some(mr.iid.to_string()),
                    comment_id,
                    comment_body,
                    actor,
                    ..RawEvent::default()
                })
            } else if let Some(issue) = &ev.issue {
                Ok(RawEvent {
                    name: "issue_comment".into(),
                    issue_number: Some(issue.iid.to_string()),
                    comment_id,
                    comment_body,
                    actor,
                    ..RawEvent::default()
                })
            } else {
                Err(Error::Validation(
                    "note hook without merge_request or issue attachment".into(),
                ))
            }
        }
        "issue" => {
            let iid = ev
                .object_attributes
                .iid
                .ok_or_else(|| Error::Validation("issue hook without iid".into()))?;
            let action = match ev.object_attributes.action.as_deref() {
                Some("open") => "opened",
                Some("update") if !ev.assignees.is_empty() => "assigned",
                other => {
                    return Err(Error::UnsupportedEvent(format!(
                        "issue (action: {})",
                        other.unwrap_or("none")
                    )));
                }
            };
            Ok(RawEvent {
                name: "issues".into(),
                action: Some(action.into()),
                issue_number: Some(iid.to_string()),
                actor,
                assignee_login: ev.assignees.first().map(|u| u.username.clone()),
                ..RawEvent::default()
            })
        }
        "merge_request" => {
            let iid = ev
                .object_attributes
                .iid
                .ok_or_else(|| Error::Validation("merge_request hook without iid".into()))?;
            let action = ev.object_attributes.action.as_deref().map(|a| {
                match a {
                    "open" => "opened",
                    "reopen" => "reopened",
                    "update" => "synchronize",
                    "close" | "merge" => "closed",
                    other => other,
                }
                .to_string()
            });
            Ok(RawEvent {
                name: "pull_request".into(),
                action,
                pr_number: Some(iid.to_string()),
                actor,
                ..RawEvent::default()
            })
        }
        other => Err(Error::UnsupportedEvent(other.to_string())),
    }
}
