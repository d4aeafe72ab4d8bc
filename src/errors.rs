//! Crate-wide error hierarchy for agent-bridge.
//!
//! Goals:
//! - Single root `Error` for all public functions.
//! - Stable, human-readable messages: CI wrappers surface them to logs as-is,
//!   so the exact wording is part of the contract.
//! - No dynamic dispatch, ergonomic `?` via `From` impls.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type BridgeResult<T> = Result<T, Error>;

/// Root error type for the agent-bridge crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A branch field required by the event family was not supplied.
    ///
    /// The message names the exact missing variable and the event family,
    /// e.g. `CLAUDE_BRANCH is required for issue_comment event`.
    #[error("{field} is required for {event} event")]
    MissingBranch {
        field: &'static str,
        event: &'static str,
    },

    /// Event name/action outside the supported closed set.
    ///
    /// Treated as a programming error (a normalizer/classifier gap), not as
    /// user input: extending the set means adding a union variant.
    #[error("Unsupported event type: {0}")]
    UnsupportedEvent(String),

    /// Input validation errors other than the branch rules (missing ids,
    /// missing comment body, malformed payload fields).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration problems (missing required environment variables).
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand used by the normalizer's branch-requirement checks.
    pub(crate) fn missing_branch(field: &'static str, event: &'static str) -> Self {
        Error::MissingBranch { field, event }
    }
}
