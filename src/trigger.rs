//! Trigger-phrase detection on comment and issue bodies.
//!
//! The phrase is user-configurable, so it is regex-escaped and matched with
//! word boundaries: `@claude` must not fire on `@claude-bot` or inside an
//! email address. Matching is case-sensitive, as on the hosting platforms.

use regex::Regex;

/// True when `body` mentions the trigger phrase as a standalone token.
pub fn contains_trigger(body: &str, phrase: &str) -> bool {
    if phrase.trim().is_empty() {
        return false;
    }
    let escaped = regex::escape(phrase.trim());
    // `\b` does not anchor next to '@', and '-' continues a username, so the
    // boundaries are whitespace/sentence punctuation or string edges.
    let pattern = format!(r"(?:^|\s){escaped}(?:$|[\s.,:;!?])");
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(body),
        Err(_) => body.contains(phrase),
    }
}

/// True when the issue assignee matches the configured assignee trigger.
/// A leading `@` on the configured value is tolerated.
pub fn assignee_matches(assignee: &str, trigger: &str) -> bool {
    let trigger = trigger.trim().trim_start_matches('@');
    !trigger.is_empty() && assignee == trigger
}
