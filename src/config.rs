//! Explicit process configuration for the bridge.
//!
//! One struct, constructed once at process start from environment variables
//! and passed by reference into the core — never a module-level singleton.
//! All values are plain scalars supplied by the CI/webhook wrapper.

use std::env;

use crate::errors::{BridgeResult, Error};

/// Default marker that signals the assistant should act.
pub const DEFAULT_TRIGGER_PHRASE: &str = "@claude";

/// Per-invocation configuration gathered from the environment.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// `owner/name` repository identifier.
    pub repository: String,
    /// Id of the tracking comment updated in place with progress/results.
    pub claude_comment_id: String,
    pub trigger_phrase: String,
    /// Assignee login that triggers on `issues`/`assigned`.
    pub assignee_trigger: Option<String>,
    /// Explicit override for the username credited in commit trailers.
    pub trigger_username: Option<String>,
    pub custom_instructions: Option<String>,
    /// Caller instruction overriding prompt inference from the thread.
    pub direct_prompt: Option<String>,
    /// Extra agent tools appended to the baseline allow-list.
    pub allowed_tools: Vec<String>,
    /// Extra agent tools appended to the baseline deny-list.
    pub disallowed_tools: Vec<String>,
    /// Merge target for a freshly created working branch.
    pub base_branch: Option<String>,
    /// Dedicated working branch, when one was created for this run.
    pub claude_branch: Option<String>,
}

impl BridgeConfig {
    /// Build the configuration from process environment variables.
    ///
    /// `REPOSITORY` (falling back to `GITHUB_REPOSITORY`) and
    /// `CLAUDE_COMMENT_ID` are required; everything else is optional with
    /// documented defaults.
    pub fn from_env() -> BridgeResult<Self> {
        let repository = env::var("REPOSITORY")
            .or_else(|_| env::var("GITHUB_REPOSITORY"))
            .map_err(|_| Error::Config("REPOSITORY is not set".into()))?;
        let claude_comment_id = env::var("CLAUDE_COMMENT_ID")
            .map_err(|_| Error::Config("CLAUDE_COMMENT_ID is not set".into()))?;

        Ok(Self {
            repository,
            claude_comment_id,
            trigger_phrase: env::var("TRIGGER_PHRASE")
                .unwrap_or_else(|_| DEFAULT_TRIGGER_PHRASE.to_string()),
            assignee_trigger: opt_env("ASSIGNEE_TRIGGER"),
            trigger_username: opt_env("TRIGGER_USERNAME"),
            custom_instructions: opt_env("CUSTOM_INSTRUCTIONS"),
            direct_prompt: opt_env("DIRECT_PROMPT"),
            allowed_tools: split_tools(&env::var("ALLOWED_TOOLS").unwrap_or_default()),
            disallowed_tools: split_tools(&env::var("DISALLOWED_TOOLS").unwrap_or_default()),
            base_branch: opt_env("BASE_BRANCH"),
            claude_branch: opt_env("CLAUDE_BRANCH"),
        })
    }

    /// Minimal config for a repository, defaults everywhere else.
    pub fn for_repository(repository: impl Into<String>, comment_id: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            claude_comment_id: comment_id.into(),
            trigger_phrase: DEFAULT_TRIGGER_PHRASE.to_string(),
            assignee_trigger: None,
            trigger_username: None,
            custom_instructions: None,
            direct_prompt: None,
            allowed_tools: Vec::new(),
            disallowed_tools: Vec::new(),
            base_branch: None,
            claude_branch: None,
        }
    }
}

fn opt_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Split a comma-joined tool override string, dropping empty segments.
pub fn split_tools(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_tools_drops_empty_segments() {
        assert_eq!(
            split_tools("Bash(git:*), WebSearch,,"),
            vec!["Bash(git:*)".to_string(), "WebSearch".to_string()]
        );
        assert!(split_tools("").is_empty());
    }

    #[test]
    fn minimal_config_defaults_trigger_phrase() {
        let cfg = BridgeConfig::for_repository("octo/repo", "123");
        assert_eq!(cfg.trigger_phrase, "@claude");
        assert!(cfg.direct_prompt.is_none());
    }
}
