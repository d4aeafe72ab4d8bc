//! Context assembly: raw inputs → one immutable [`PreparedContext`].
//!
//! Combines the normalized event with repository-level fields into the
//! single value the permission builder and the renderer consume. Validation
//! is strict: success or a descriptive error, never a silently incomplete
//! context.

use crate::config::BridgeConfig;
use crate::errors::{BridgeResult, Error};
use crate::event::{EventData, RawEvent, normalize};

/// Username rendered when no trigger author could be resolved.
pub const UNKNOWN_USER: &str = "Unknown";

/// Repository-level fields shared by every event variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonFields {
    /// `owner/name` identifier of the repository under action.
    pub repository: String,
    /// Id of the tracking comment updated in place with results.
    pub claude_comment_id: String,
    pub trigger_phrase: String,
    /// Resolved trigger author; rendered as [`UNKNOWN_USER`] when `None`.
    pub trigger_username: Option<String>,
    pub custom_instructions: Option<String>,
    pub allowed_tools: Vec<String>,
    pub disallowed_tools: Vec<String>,
    /// Caller instruction that overrides inference from the thread.
    pub direct_prompt: Option<String>,
}

/// Fully-validated input to the permission builder and prompt renderer.
///
/// Constructed once per invocation, consumed synchronously, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedContext {
    pub common: CommonFields,
    pub event: EventData,
}

impl PreparedContext {
    pub fn is_pr(&self) -> bool {
        self.event.is_pr()
    }

    /// Trigger author, falling back to the `Unknown` placeholder.
    pub fn trigger_display_username(&self) -> &str {
        self.common
            .trigger_username
            .as_deref()
            .unwrap_or(UNKNOWN_USER)
    }
}

/// Assemble and validate the full invocation context.
///
/// Branch requirements are enforced per event family (see
/// [`crate::event::normalize`]); `issue_comment`-on-issue and the `issues`
/// family require both branches, PR-context events treat their presence as
/// the "closed PR, new branch created" signal.
///
/// The trigger username resolves from the explicit config override first,
/// then the event actor; absence is kept as `None` and rendered as
/// `Unknown`.
pub fn prepare_context(
    cfg: &BridgeConfig,
    raw: &RawEvent,
    comment_id: &str,
    base_branch: Option<&str>,
    claude_branch: Option<&str>,
) -> BridgeResult<PreparedContext> {
    if cfg.repository.trim().is_empty() {
        return Err(Error::Validation("repository must not be empty".into()));
    }
    if comment_id.trim().is_empty() {
        return Err(Error::Validation(
            "claude comment id must not be empty".into(),
        ));
    }

    let event = normalize(raw, base_branch, claude_branch)?;

    let trigger_username = cfg
        .trigger_username
        .clone()
        .or_else(|| raw.actor.clone())
        .filter(|u| !u.trim().is_empty());

    Ok(PreparedContext {
        common: CommonFields {
            repository: cfg.repository.clone(),
            claude_comment_id: comment_id.to_string(),
            trigger_phrase: cfg.trigger_phrase.clone(),
            trigger_username,
            custom_instructions: cfg.custom_instructions.clone(),
            allowed_tools: cfg.allowed_tools.clone(),
            disallowed_tools: cfg.disallowed_tools.clone(),
            direct_prompt: cfg.direct_prompt.clone(),
        },
        event,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> BridgeConfig {
        BridgeConfig::for_repository("octo/repo", "2001")
    }

    fn issue_comment_raw() -> RawEvent {
        RawEvent {
            name: "issue_comment".into(),
            issue_number: Some("42".into()),
            comment_id: Some("555".into()),
            comment_body: Some("@claude fix this".into()),
            actor: Some("johndoe".into()),
            ..RawEvent::default()
        }
    }

    #[test]
    fn builds_full_context_for_issue_comment() {
        let ctx = prepare_context(
            &cfg(),
            &issue_comment_raw(),
            "2001",
            Some("main"),
            Some("claude/issue-42-20240101_123000"),
        )
        .unwrap();
        assert_eq!(ctx.common.repository, "octo/repo");
        assert_eq!(ctx.common.claude_comment_id, "2001");
        assert_eq!(ctx.common.trigger_phrase, "@claude");
        assert_eq!(ctx.trigger_display_username(), "johndoe");
        assert!(!ctx.is_pr());
    }

    #[test]
    fn missing_claude_branch_fails_before_base_branch() {
        let err = prepare_context(&cfg(), &issue_comment_raw(), "2001", None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CLAUDE_BRANCH is required for issue_comment event"
        );

        let err = prepare_context(
            &cfg(),
            &issue_comment_raw(),
            "2001",
            None,
            Some("claude/issue-42"),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "BASE_BRANCH is required for issue_comment event"
        );
    }

    #[test]
    fn issues_opened_requires_branches() {
        let raw = RawEvent {
            name: "issues".into(),
            action: Some("opened".into()),
            issue_number: Some("7".into()),
            ..RawEvent::default()
        };
        let err = prepare_context(&cfg(), &raw, "2001", Some("main"), None).unwrap_err();
        assert_eq!(err.to_string(), "CLAUDE_BRANCH is required for issues event");

        let err = prepare_context(&cfg(), &raw, "2001", None, Some("claude/issue-7")).unwrap_err();
        assert_eq!(err.to_string(), "BASE_BRANCH is required for issues event");
    }

    #[test]
    fn unsupported_event_propagates() {
        let raw = RawEvent {
            name: "deployment_status".into(),
            ..RawEvent::default()
        };
        let err = prepare_context(&cfg(), &raw, "2001", None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported event type: deployment_status"
        );
    }

    #[test]
    fn explicit_username_override_wins_over_actor() {
        let mut c = cfg();
        c.trigger_username = Some("release-bot".into());
        let ctx = prepare_context(
            &c,
            &issue_comment_raw(),
            "2001",
            Some("main"),
            Some("claude/issue-42"),
        )
        .unwrap();
        assert_eq!(ctx.trigger_display_username(), "release-bot");
    }

    #[test]
    fn absent_username_renders_unknown() {
        let mut raw = issue_comment_raw();
        raw.actor = None;
        let ctx = prepare_context(&cfg(), &raw, "2001", Some("main"), Some("claude/issue-42"))
            .unwrap();
        assert_eq!(ctx.trigger_display_username(), "Unknown");
    }
}
