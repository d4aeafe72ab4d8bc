//! Prompt rendering: `(PreparedContext, RepositorySnapshot) -> String`.
//!
//! Two stages:
//! 1. **Classification** — [`get_event_type_and_context`] maps every event
//!    variant to a machine-readable tag plus a human-readable phrase
//!    describing how the assistant was triggered. Total over the union; new
//!    event variants are registered here.
//! 2. **Structural rendering** — [`generate_prompt`] assembles the fixed
//!    sections (context header, body, comments, PR-only diff/review
//!    sections, metadata tags, operating instructions) into one string.
//!
//! The operating-mode block is selected by an explicit decision table over
//! `(is_pr, claude_branch present)` only — never by event name — so all
//! four PR-bearing variants behave identically. Rendering is deterministic
//! and has no error path: missing optionals fall back to placeholders.

pub mod format;

use crate::context::PreparedContext;
use crate::event::EventData;
use crate::snapshot::RepositorySnapshot;

use format::{
    format_body, format_changed_files, format_comments, format_context, format_reviews,
};

/// Canonical machine-readable event tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Inline comment on a PR diff.
    ReviewComment,
    /// Top-level PR review submission.
    PrReview,
    /// Plain comment, on an issue or a PR.
    GeneralComment,
    IssueCreated,
    IssueAssigned,
    PullRequest,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::ReviewComment => "REVIEW_COMMENT",
            EventType::PrReview => "PR_REVIEW",
            EventType::GeneralComment => "GENERAL_COMMENT",
            EventType::IssueCreated => "ISSUE_CREATED",
            EventType::IssueAssigned => "ISSUE_ASSIGNED",
            EventType::PullRequest => "PULL_REQUEST",
        }
    }
}

/// Classify the event into its canonical tag and trigger description.
///
/// Total over all seven variants; this is the single registration point for
/// new event types.
pub fn get_event_type_and_context(context: &PreparedContext) -> (EventType, String) {
    let phrase = &context.common.trigger_phrase;
    match &context.event {
        EventData::PullRequestReviewComment { .. } => (
            EventType::ReviewComment,
            format!("PR review comment with '{phrase}'"),
        ),
        EventData::PullRequestReview { .. } => {
            (EventType::PrReview, format!("PR review with '{phrase}'"))
        }
        EventData::IssueComment { .. } | EventData::PullRequestComment { .. } => (
            EventType::GeneralComment,
            format!("issue comment with '{phrase}'"),
        ),
        EventData::IssueOpened { .. } => (
            EventType::IssueCreated,
            format!("new issue with '{phrase}' in body"),
        ),
        EventData::IssueAssigned {
            assignee_trigger, ..
        } => (
            EventType::IssueAssigned,
            format!("issue assigned to '{assignee_trigger}'"),
        ),
        EventData::PullRequest { event_action, .. } => (
            EventType::PullRequest,
            match event_action {
                Some(action) => format!("pull request {action}"),
                None => "pull request event".to_string(),
            },
        ),
    }
}

/// Operating mode for the working-branch instruction block.
///
/// Keyed solely on the two structural signals; the event name plays no part
/// in this decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OperatingMode {
    /// Issue work: a dedicated branch was prepared, a PR must be offered.
    DedicatedBranch,
    /// Open PR: push to the PR's own branch, never branch off.
    ExistingPrBranch,
    /// Closed PR: dedicated branch like issue work, plus a back-reference
    /// to the original PR.
    PrDedicatedBranch,
}

pub(crate) fn operating_mode(is_pr: bool, has_claude_branch: bool) -> OperatingMode {
    match (is_pr, has_claude_branch) {
        // Issue-family validation guarantees the branch exists.
        (false, _) => OperatingMode::DedicatedBranch,
        (true, false) => OperatingMode::ExistingPrBranch,
        (true, true) => OperatingMode::PrDedicatedBranch,
    }
}

/// Render the complete agent prompt. Pure, deterministic, no I/O, no error
/// path: identical inputs yield a byte-identical string.
pub fn generate_prompt(context: &PreparedContext, snapshot: &RepositorySnapshot) -> String {
    let (event_type, trigger_context) = get_event_type_and_context(context);
    let common = &context.common;
    let is_pr = context.is_pr();

    let mut p = String::new();
    p.push_str(
        "You are Claude, an AI assistant designed to help with GitHub and GitLab issues and \
         pull requests. Think carefully as you analyze the context and respond appropriately. \
         Here's the context for your current task:\n\n",
    );

    p.push_str("<formatted_context>\n");
    p.push_str(&format_context(snapshot, is_pr));
    p.push_str("\n</formatted_context>\n\n");

    p.push_str("<pr_or_issue_body>\n");
    p.push_str(&format_body(snapshot.body.as_deref()));
    p.push_str("\n</pr_or_issue_body>\n\n");

    p.push_str("<comments>\n");
    p.push_str(&format_comments(&snapshot.comments));
    p.push_str("\n</comments>\n\n");

    if is_pr {
        p.push_str("<review_comments>\n");
        p.push_str(&format_reviews(&snapshot.reviews));
        p.push_str("\n</review_comments>\n\n");

        p.push_str("<changed_files>\n");
        p.push_str(&format_changed_files(&snapshot.changed_files));
        p.push_str("\n</changed_files>\n\n");
    }

    p.push_str(&format!("<event_type>{}</event_type>\n", event_type.as_str()));
    p.push_str(&format!("<is_pr>{is_pr}</is_pr>\n"));
    if is_pr {
        p.push_str(&format!("<pr_number>{}</pr_number>\n", context.event.number()));
    } else {
        p.push_str(&format!(
            "<issue_number>{}</issue_number>\n",
            context.event.number()
        ));
    }
    p.push_str(&format!(
        "<trigger_context>{trigger_context}</trigger_context>\n"
    ));
    p.push_str(&format!("<repository>{}</repository>\n", common.repository));
    p.push_str(&format!(
        "<claude_comment_id>{}</claude_comment_id>\n",
        common.claude_comment_id
    ));
    p.push_str(&format!(
        "<trigger_username>{}</trigger_username>\n",
        context.trigger_display_username()
    ));
    p.push_str(&format!(
        "<trigger_phrase>{}</trigger_phrase>\n",
        common.trigger_phrase
    ));
    if let Some(body) = context.event.comment_body() {
        p.push_str(&format!(
            "<trigger_comment>\n{body}\n</trigger_comment>\n"
        ));
    }
    if let Some(direct) = common.direct_prompt.as_deref() {
        p.push_str(&format!("<direct_prompt>\n{direct}\n</direct_prompt>\n"));
    }
    p.push('\n');

    p.push_str(&format!(
        "Your task is to analyze the context, understand the request, and respond helpfully. \
         Track your progress by updating the comment with id {} using \
         mcp__github_comment__update_claude_comment.\n\n",
        common.claude_comment_id
    ));

    p.push_str("IMPORTANT CLARIFICATIONS:\n");
    p.push_str(
        "- When asked to \"review\" code, read the code and provide review feedback; do not \
         implement changes unless explicitly asked to.\n",
    );
    if common.direct_prompt.is_some() {
        p.push_str(
            "- DIRECT INSTRUCTION: a direct instruction was provided in the <direct_prompt> tag \
             above. Treat it as the primary instruction for this task; it overrides anything you \
             might infer from the comment thread.\n",
        );
    } else if context.event.comment_body().is_some() {
        p.push_str(
            "- Your instructions are in the <trigger_comment> tag above; address that request \
             directly.\n",
        );
    }
    p.push('\n');

    p.push_str("Follow these steps:\n\n");
    p.push_str(
        "1. Gather context: read the formatted context, body, comments and (for PRs) the diff \
         and review threads above.\n",
    );
    p.push_str("2. Understand the request and plan your changes or your answer.\n");
    p.push_str("3. Execute:\n");
    p.push_str(&render_branch_instructions(context));
    p.push_str(
        "4. Finally, update the tracking comment with a concise summary of what you did or \
         found.\n",
    );

    if let Some(user) = real_username(context) {
        p.push_str(&format!(
            "\nWhen committing changes, include a `Co-authored-by: {user} \
             <{user}@users.noreply.github.com>` trailer to credit the user who triggered this \
             run.\n"
        ));
    }

    if let Some(custom) = common.custom_instructions.as_deref() {
        p.push_str(&format!("\nCUSTOM INSTRUCTIONS:\n{custom}\n"));
    }

    p
}

fn real_username(context: &PreparedContext) -> Option<&str> {
    context
        .common
        .trigger_username
        .as_deref()
        .filter(|u| !u.trim().is_empty() && *u != crate::context::UNKNOWN_USER)
}

/// Branch/operating-mode block, selected by the `(is_pr, claude_branch)`
/// decision table.
fn render_branch_instructions(context: &PreparedContext) -> String {
    let repo = &context.common.repository;
    let claude_branch = context.event.claude_branch();
    let base_branch = context.event.base_branch().unwrap_or("main");

    match operating_mode(context.is_pr(), claude_branch.is_some()) {
        OperatingMode::DedicatedBranch => {
            dedicated_branch_block(repo, claude_branch.unwrap_or_default(), base_branch, None)
        }
        OperatingMode::ExistingPrBranch => {
            let mut s = String::new();
            s.push_str(
                "   - Push directly using mcp__github_file_ops__commit_files to the existing \
                 branch (works for both new and existing files).\n",
            );
            s.push_str(
                "   - Always push to the existing branch; never create a new branch when \
                 triggered on an open PR.\n",
            );
            s.push_str(
                "   - Use mcp__github_file_ops__delete_files to delete files rather than shell \
                 commands.\n",
            );
            s
        }
        OperatingMode::PrDedicatedBranch => dedicated_branch_block(
            repo,
            claude_branch.unwrap_or_default(),
            base_branch,
            Some(context.event.number()),
        ),
    }
}

fn dedicated_branch_block(
    repo: &str,
    claude_branch: &str,
    base_branch: &str,
    original_pr: Option<&str>,
) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "   - You are already on the correct branch ({claude_branch}). Do not create a new \
         branch.\n"
    ));
    if let Some(pr) = original_pr {
        s.push_str(&format!(
            "   - The original PR (#{pr}) is closed; your changes live on this new branch. \
             Reference the original PR in your summary.\n"
        ));
    }
    s.push_str(
        "   - Commit changes using mcp__github_file_ops__commit_files (works for both new and \
         existing files).\n",
    );
    s.push_str(&format!(
        "   - Provide a URL to create a PR manually in this format:\n     \
         [Create a PR](https://github.com/{repo}/compare/{base_branch}...{claude_branch}?\
         quick_pull=1&title=<url-encoded-title>&body=<url-encoded-body>)\n"
    ));
    s.push_str(
        "   - If you created anything in your branch, your final comment must include the PR \
         URL with prefilled title and body shown above.\n",
    );
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::context::prepare_context;
    use crate::event::RawEvent;

    const OPEN_PR_PUSH: &str =
        "Push directly using mcp__github_file_ops__commit_files to the existing branch";
    const ON_BRANCH: &str = "You are already on the correct branch (";

    fn cfg() -> BridgeConfig {
        BridgeConfig::for_repository("octo/repo", "2001")
    }

    fn ctx_for(
        name: &str,
        action: Option<&str>,
        is_pr: bool,
        base: Option<&str>,
        claude: Option<&str>,
    ) -> PreparedContext {
        let raw = RawEvent {
            name: name.into(),
            action: action.map(str::to_owned),
            is_pr,
            issue_number: Some("42".into()),
            pr_number: Some("789".into()),
            comment_id: Some("555".into()),
            comment_body: Some("@claude please take a look".into()),
            actor: Some("johndoe".into()),
            assignee_login: Some("claude-bot".into()),
        };
        prepare_context(&cfg(), &raw, "2001", base, claude).unwrap()
    }

    fn all_variants() -> Vec<PreparedContext> {
        vec![
            ctx_for("pull_request_review_comment", None, true, None, None),
            ctx_for("pull_request_review", None, true, None, None),
            ctx_for("issue_comment", None, false, Some("main"), Some("claude/issue-42")),
            ctx_for("issue_comment", None, true, None, None),
            ctx_for("issues", Some("opened"), false, Some("main"), Some("claude/issue-42")),
            ctx_for("issues", Some("assigned"), false, Some("main"), Some("claude/issue-42")),
            ctx_for("pull_request", Some("opened"), true, None, None),
        ]
    }

    #[test]
    fn classification_is_total_and_non_empty() {
        for ctx in all_variants() {
            let (event_type, trigger_context) = get_event_type_and_context(&ctx);
            assert!(!event_type.as_str().is_empty());
            assert!(!trigger_context.is_empty(), "{event_type:?}");
        }
    }

    #[test]
    fn classification_tags_match_variants() {
        let tags: Vec<&str> = all_variants()
            .iter()
            .map(|c| get_event_type_and_context(c).0.as_str())
            .collect();
        assert_eq!(
            tags,
            vec![
                "REVIEW_COMMENT",
                "PR_REVIEW",
                "GENERAL_COMMENT",
                "GENERAL_COMMENT",
                "ISSUE_CREATED",
                "ISSUE_ASSIGNED",
                "PULL_REQUEST",
            ]
        );
    }

    #[test]
    fn trigger_contexts_are_human_readable() {
        let ctx = ctx_for("issues", Some("assigned"), false, Some("main"), Some("b"));
        assert_eq!(
            get_event_type_and_context(&ctx).1,
            "issue assigned to 'claude-bot'"
        );

        let ctx = ctx_for("issue_comment", None, false, Some("main"), Some("b"));
        assert_eq!(
            get_event_type_and_context(&ctx).1,
            "issue comment with '@claude'"
        );

        let ctx = ctx_for("pull_request", Some("synchronize"), true, None, None);
        assert_eq!(get_event_type_and_context(&ctx).1, "pull request synchronize");
    }

    #[test]
    fn operating_mode_table_is_exhaustive() {
        assert_eq!(operating_mode(false, true), OperatingMode::DedicatedBranch);
        assert_eq!(operating_mode(false, false), OperatingMode::DedicatedBranch);
        assert_eq!(operating_mode(true, false), OperatingMode::ExistingPrBranch);
        assert_eq!(operating_mode(true, true), OperatingMode::PrDedicatedBranch);
    }

    #[test]
    fn issue_mode_offers_pr_creation_and_never_pushes_to_pr_branch() {
        let ctx = ctx_for("issue_comment", None, false, Some("main"), Some("claude/issue-42"));
        let prompt = generate_prompt(&ctx, &RepositorySnapshot::default());
        assert!(prompt.contains("You are already on the correct branch (claude/issue-42)"));
        assert!(prompt.contains("https://github.com/octo/repo/compare/main...claude/issue-42"));
        assert!(!prompt.contains(OPEN_PR_PUSH));
    }

    #[test]
    fn open_pr_mode_pushes_to_existing_branch() {
        for ctx in [
            ctx_for("issue_comment", None, true, None, None),
            ctx_for("pull_request_review", None, true, None, None),
            ctx_for("pull_request_review_comment", None, true, None, None),
            ctx_for("pull_request", Some("opened"), true, None, None),
        ] {
            let prompt = generate_prompt(&ctx, &RepositorySnapshot::default());
            assert!(prompt.contains(OPEN_PR_PUSH));
            assert!(!prompt.contains(ON_BRANCH));
            assert!(!prompt.contains("[Create a PR]"));
        }
    }

    #[test]
    fn closed_pr_mode_matches_round_trip_fixture() {
        let ctx = ctx_for(
            "pull_request_review",
            None,
            true,
            Some("develop"),
            Some("claude/pr-789-20240101_123000"),
        );
        let prompt = generate_prompt(&ctx, &RepositorySnapshot::default());
        assert!(prompt.contains(
            "You are already on the correct branch (claude/pr-789-20240101_123000)"
        ));
        assert!(prompt.contains(
            "https://github.com/octo/repo/compare/develop...claude/pr-789-20240101_123000"
        ));
        assert!(prompt.contains("The original PR (#789) is closed"));
        assert!(!prompt.contains(OPEN_PR_PUSH));
    }

    #[test]
    fn metadata_tags_are_rendered() {
        let ctx = ctx_for("pull_request", Some("opened"), true, None, None);
        let prompt = generate_prompt(&ctx, &RepositorySnapshot::default());
        assert!(prompt.contains("<event_type>PULL_REQUEST</event_type>"));
        assert!(prompt.contains("<is_pr>true</is_pr>"));
        assert!(prompt.contains("<pr_number>789</pr_number>"));
        assert!(prompt.contains("<repository>octo/repo</repository>"));
        assert!(prompt.contains("<claude_comment_id>2001</claude_comment_id>"));
        assert!(prompt.contains("<trigger_phrase>@claude</trigger_phrase>"));

        let ctx = ctx_for("issues", Some("opened"), false, Some("main"), Some("b"));
        let prompt = generate_prompt(&ctx, &RepositorySnapshot::default());
        assert!(prompt.contains("<is_pr>false</is_pr>"));
        assert!(prompt.contains("<issue_number>42</issue_number>"));
    }

    #[test]
    fn username_fallback_and_co_author_trailer() {
        let mut raw = RawEvent {
            name: "issue_comment".into(),
            issue_number: Some("42".into()),
            comment_id: Some("555".into()),
            comment_body: Some("@claude hi".into()),
            actor: None,
            ..RawEvent::default()
        };
        let ctx = prepare_context(&cfg(), &raw, "2001", Some("main"), Some("b")).unwrap();
        let prompt = generate_prompt(&ctx, &RepositorySnapshot::default());
        assert!(prompt.contains("<trigger_username>Unknown</trigger_username>"));
        assert!(!prompt.contains("Co-authored-by:"));

        raw.actor = Some("johndoe".into());
        let ctx = prepare_context(&cfg(), &raw, "2001", Some("main"), Some("b")).unwrap();
        let prompt = generate_prompt(&ctx, &RepositorySnapshot::default());
        assert!(prompt.contains("<trigger_username>johndoe</trigger_username>"));
        assert!(
            prompt.contains("Co-authored-by: johndoe <johndoe@users.noreply.github.com>")
        );
    }

    #[test]
    fn direct_prompt_block_overrides_thread_inference() {
        let mut c = cfg();
        c.direct_prompt = Some("Only bump the version number".into());
        let raw = RawEvent {
            name: "issue_comment".into(),
            is_pr: true,
            pr_number: Some("789".into()),
            comment_id: Some("555".into()),
            comment_body: Some("@claude do many things".into()),
            ..RawEvent::default()
        };
        let ctx = prepare_context(&c, &raw, "2001", None, None).unwrap();
        let prompt = generate_prompt(&ctx, &RepositorySnapshot::default());
        assert!(prompt.contains("<direct_prompt>\nOnly bump the version number\n</direct_prompt>"));
        assert!(prompt.contains("overrides anything you might infer from the comment thread"));
    }

    #[test]
    fn custom_instructions_appear_verbatim() {
        let mut c = cfg();
        c.custom_instructions = Some("Always run the linter.".into());
        let raw = RawEvent {
            name: "pull_request".into(),
            action: Some("opened".into()),
            pr_number: Some("789".into()),
            ..RawEvent::default()
        };
        let ctx = prepare_context(&c, &raw, "2001", None, None).unwrap();
        let prompt = generate_prompt(&ctx, &RepositorySnapshot::default());
        assert!(prompt.contains("CUSTOM INSTRUCTIONS:\nAlways run the linter."));
    }

    #[test]
    fn pr_sections_only_for_pr_events() {
        let pr_ctx = ctx_for("pull_request", Some("opened"), true, None, None);
        let issue_ctx = ctx_for("issues", Some("opened"), false, Some("main"), Some("b"));
        let snapshot = RepositorySnapshot::default();
        let pr_prompt = generate_prompt(&pr_ctx, &snapshot);
        let issue_prompt = generate_prompt(&issue_ctx, &snapshot);
        assert!(pr_prompt.contains("<changed_files>"));
        assert!(pr_prompt.contains("<review_comments>"));
        assert!(!issue_prompt.contains("<changed_files>"));
        assert!(!issue_prompt.contains("<review_comments>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let ctx = ctx_for("pull_request_review", None, true, Some("develop"), Some("b"));
        let snapshot = RepositorySnapshot::default();
        assert_eq!(
            generate_prompt(&ctx, &snapshot),
            generate_prompt(&ctx, &snapshot)
        );
    }
}
