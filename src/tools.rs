//! Agent sandbox tool permissions: base policy plus caller overrides.
//!
//! The downstream agent runner takes two comma-joined capability strings.
//! The allow baseline covers the file primitives plus the MCP capabilities
//! for committing/deleting files and updating the tracking comment; the
//! deny baseline blocks network-egress tools. An explicit allow always wins
//! over the default deny, while an explicit custom deny is never dropped.

/// Fixed allow-list baseline, order preserved in the output.
pub const BASE_ALLOWED_TOOLS: [&str; 9] = [
    "Edit",
    "Glob",
    "Grep",
    "LS",
    "Read",
    "Write",
    "mcp__github_file_ops__commit_files",
    "mcp__github_file_ops__delete_files",
    "mcp__github_comment__update_claude_comment",
];

/// Fixed deny-list baseline: network egress is unsafe by default.
pub const BASE_DISALLOWED_TOOLS: [&str; 2] = ["WebSearch", "WebFetch"];

/// Build the comma-joined allow string: baseline, then custom entries in
/// caller order. No deduplication (matches observed behavior).
pub fn build_allowed_tools(custom: &[String]) -> String {
    let mut tools: Vec<&str> = BASE_ALLOWED_TOOLS.to_vec();
    tools.extend(custom.iter().map(String::as_str));
    tools.join(",")
}

/// Build the comma-joined deny string.
///
/// Baseline entries that the caller explicitly allowed are removed first,
/// then custom denied entries are appended. Returns the empty string when
/// nothing remains.
pub fn build_disallowed_tools(custom: &[String], allowed: &[String]) -> String {
    let mut tools: Vec<&str> = BASE_DISALLOWED_TOOLS
        .iter()
        .copied()
        .filter(|base| !allowed.iter().any(|a| a == base))
        .collect();
    tools.extend(custom.iter().map(String::as_str));
    tools.join(",")
}
