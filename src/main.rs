//! Thin CI entrypoint.
//!
//! Gathers the already-resolved inputs from the environment (event fields,
//! branch state, configuration scalars) and a repository snapshot from
//! stdin-adjacent plumbing, runs the compiler, and prints the prompt plus
//! the two tool strings for the surrounding CI wrapper to hand to the agent
//! runner. All provider I/O happens before this process is invoked.

use std::error::Error;
use std::{env, fs};

use tracing_subscriber::EnvFilter;

use agent_bridge::config::BridgeConfig;
use agent_bridge::event::RawEvent;
use agent_bridge::snapshot::RepositorySnapshot;
use agent_bridge::trigger;

fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional outside of local development.
    dotenvy::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cfg = BridgeConfig::from_env()?;
    let raw = raw_event_from_env()?;
    let snapshot = snapshot_from_env()?;

    if !should_act(&cfg, &raw) {
        tracing::info!("no trigger found for event '{}', skipping", raw.name);
        return Ok(());
    }

    let out = agent_bridge::compile(&cfg, &raw, &snapshot)?;

    // Stable output contract for the CI wrapper: three framed sections.
    println!("===PROMPT===");
    println!("{}", out.prompt);
    println!("===ALLOWED_TOOLS===");
    println!("{}", out.allowed_tools);
    println!("===DISALLOWED_TOOLS===");
    println!("{}", out.disallowed_tools);
    Ok(())
}

/// Trigger gate: a direct prompt always acts; comment-carrying events need
/// the trigger phrase in the comment body; assignment events need the
/// assignee to match the configured assignee trigger.
fn should_act(cfg: &BridgeConfig, raw: &RawEvent) -> bool {
    if cfg.direct_prompt.is_some() {
        return true;
    }
    if raw.name == "issues" && raw.action.as_deref() == Some("assigned") {
        return match (&raw.assignee_login, &cfg.assignee_trigger) {
            (Some(assignee), Some(trigger)) => trigger::assignee_matches(assignee, trigger),
            _ => false,
        };
    }
    match raw.comment_body.as_deref() {
        Some(body) => trigger::contains_trigger(body, &cfg.trigger_phrase),
        // Lifecycle events without a body (pull_request, issues/opened with
        // the phrase already vetted upstream) proceed.
        None => true,
    }
}

fn raw_event_from_env() -> Result<RawEvent, Box<dyn Error>> {
    // GITLAB_WEBHOOK_PAYLOAD carries a raw GitLab webhook body; otherwise the
    // wrapper supplies pre-extracted GitHub fields.
    if let Ok(path) = env::var("GITLAB_WEBHOOK_PAYLOAD") {
        let payload = fs::read_to_string(path)?;
        let gitlab_event: agent_bridge::gitlab::GitLabEvent = serde_json::from_str(&payload)?;
        return Ok(agent_bridge::gitlab::to_raw_event(&gitlab_event)?);
    }

    let opt = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());
    Ok(RawEvent {
        name: env::var("EVENT_NAME").unwrap_or_default(),
        action: opt("EVENT_ACTION"),
        is_pr: opt("IS_PR").is_some_and(|v| v == "true"),
        issue_number: opt("ISSUE_NUMBER"),
        pr_number: opt("PR_NUMBER"),
        comment_id: opt("COMMENT_ID"),
        comment_body: opt("COMMENT_BODY"),
        actor: opt("TRIGGER_ACTOR"),
        assignee_login: opt("ASSIGNEE_LOGIN"),
    })
}

fn snapshot_from_env() -> Result<RepositorySnapshot, Box<dyn Error>> {
    match env::var("REPO_SNAPSHOT_FILE") {
        Ok(path) => Ok(serde_json::from_str(&fs::read_to_string(path)?)?),
        Err(_) => Ok(RepositorySnapshot::default()),
    }
}
