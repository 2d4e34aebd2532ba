//! Pre-execution guard: blocks destructive shell commands and access to
//! credential files before the tool runs.

use serde::Serialize;
use serde_json::Value;

use crate::input::HookInput;
use crate::journal::{self, Journal, LogFile};
use crate::outcome::HookOutcome;
use crate::policy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Block(String),
}

impl GuardDecision {
    fn label(&self) -> &'static str {
        match self {
            GuardDecision::Allow => "allow",
            GuardDecision::Block(_) => "block",
        }
    }

    fn reason(&self) -> Option<&str> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::Block(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Serialize)]
struct GuardEntry<'a> {
    timestamp: String,
    event_type: &'a str,
    data: GuardData<'a>,
}

#[derive(Debug, Serialize)]
struct GuardData<'a> {
    tool_name: &'a str,
    tool_input: &'a Value,
    decision: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// Decide whether a tool call may proceed
pub fn evaluate(input: &HookInput) -> GuardDecision {
    let tool_name = input.tool_name();

    if tool_name == "Bash" {
        if let Some(pattern) = policy::dangerous_pattern(input.command()) {
            return GuardDecision::Block(format!(
                "🚫 Security: Blocked dangerous pattern: {}. Please use a safer alternative.",
                pattern
            ));
        }
    }

    if policy::is_file_access_tool(tool_name) {
        if let Some(fragment) = policy::protected_fragment(input.file_path()) {
            return GuardDecision::Block(format!(
                "🔒 Security: Attempted access to sensitive file: {}. This file contains sensitive data.",
                fragment
            ));
        }
    }

    GuardDecision::Allow
}

pub fn run(input: &HookInput, journal: &Journal) -> HookOutcome {
    let decision = evaluate(input);
    tracing::debug!(tool = input.tool_name(), decision = decision.label(), "pre-tool-use evaluated");

    let event_type = match decision {
        GuardDecision::Allow => "pre_tool_use",
        GuardDecision::Block(_) => "blocked",
    };
    journal.append(
        LogFile::PreToolUse,
        &GuardEntry {
            timestamp: journal::timestamp(),
            event_type,
            data: GuardData {
                tool_name: input.tool_name(),
                tool_input: &input.tool_input,
                decision: decision.label(),
                reason: decision.reason(),
            },
        },
    );

    match decision {
        GuardDecision::Allow => HookOutcome::Continue,
        GuardDecision::Block(reason) => HookOutcome::Block(reason),
    }
}
