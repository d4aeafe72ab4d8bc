//! Public entry for the agent-bridge context-to-prompt compiler.
//!
//! Single high-level function to compile one platform event into an agent
//! invocation:
//!
//! 1. **Normalize** — classify the raw GitHub/GitLab event into one variant
//!    of the closed `EventData` union ([`event`], [`gitlab`]).
//! 2. **Assemble** — validate per-event required fields and build the
//!    immutable [`context::PreparedContext`].
//! 3. **Permissions** — derive the allow/deny tool strings for the agent
//!    sandbox from the base policy plus overrides ([`tools`]).
//! 4. **Render** — produce the deterministic natural-language prompt
//!    ([`prompt`]).
//!
//! The four stages are synchronous, pure transformations: all I/O (provider
//! API fetches, the agent run itself, posting results back) belongs to the
//! surrounding CI/webhook wrappers. Errors propagate to the caller with
//! stable messages; the core never retries and never logs — only this
//! orchestration entry emits `tracing` diagnostics.

pub mod config;
pub mod context;
pub mod errors;
pub mod event;
pub mod gitlab;
pub mod prompt;
pub mod snapshot;
pub mod tools;
pub mod trigger;

use tracing::{debug, info};

use config::BridgeConfig;
use context::prepare_context;
use errors::BridgeResult;
use event::RawEvent;
use snapshot::RepositorySnapshot;

/// Everything the downstream agent runner needs for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInvocation {
    /// Rendered task prompt, fed verbatim to the agent.
    pub prompt: String,
    /// Comma-joined allow-list for the agent sandbox.
    pub allowed_tools: String,
    /// Comma-joined deny-list for the agent sandbox; may be empty.
    pub disallowed_tools: String,
}

/// Compile one event into a prompt plus sandbox tool strings.
///
/// Deterministic: identical inputs yield byte-identical output. All
/// validation and classification errors propagate with their stable
/// messages (`"CLAUDE_BRANCH is required for issue_comment event"`,
/// `"Unsupported event type: ..."`).
pub fn compile(
    cfg: &BridgeConfig,
    raw: &RawEvent,
    snapshot: &RepositorySnapshot,
) -> BridgeResult<CompiledInvocation> {
    debug!("compile: prepare context for event '{}'", raw.name);
    let context = prepare_context(
        cfg,
        raw,
        &cfg.claude_comment_id,
        cfg.base_branch.as_deref(),
        cfg.claude_branch.as_deref(),
    )?;
    debug!(
        "compile: context ready (is_pr={}, number={})",
        context.is_pr(),
        context.event.number()
    );

    let allowed_tools = tools::build_allowed_tools(&context.common.allowed_tools);
    let disallowed_tools =
        tools::build_disallowed_tools(&context.common.disallowed_tools, &context.common.allowed_tools);
    debug!(
        "compile: permissions built (allowed={}, disallowed={})",
        allowed_tools.split(',').count(),
        if disallowed_tools.is_empty() {
            0
        } else {
            disallowed_tools.split(',').count()
        }
    );

    let prompt = prompt::generate_prompt(&context, snapshot);
    info!(
        "compile: prompt rendered ({} chars) for {} #{}",
        prompt.chars().count(),
        context.common.repository,
        context.event.number()
    );

    Ok(CompiledInvocation {
        prompt,
        allowed_tools,
        disallowed_tools,
    })
}

pub use context::PreparedContext;
pub use event::EventData;
pub use prompt::{EventType, generate_prompt, get_event_type_and_context};
pub use tools::{build_allowed_tools, build_disallowed_tools};
