//! Permission arbiter: approve, block, or leave the request to the human,
//! depending on the compliance tier.

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::ComplianceLevel;
use crate::input::HookInput;
use crate::journal::{self, Journal, LogFile};
use crate::model::PermissionModel;
use crate::outcome::HookOutcome;
use crate::policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Approve,
    Block,
}

/// Outcome of one permission request. `verdict == None` defers to the human.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionDecision {
    #[serde(rename = "decision")]
    pub verdict: Option<Verdict>,
    pub reason: Option<String>,
}

impl PermissionDecision {
    fn approve(reason: String) -> Self {
        Self {
            verdict: Some(Verdict::Approve),
            reason: Some(reason),
        }
    }

    fn block(reason: String) -> Self {
        Self {
            verdict: Some(Verdict::Block),
            reason: Some(reason),
        }
    }

    fn undecided() -> Self {
        Self {
            verdict: None,
            reason: None,
        }
    }

    fn undecided_because(reason: String) -> Self {
        Self {
            verdict: None,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Serialize)]
struct PermissionEntry<'a> {
    timestamp: String,
    event_type: &'a str,
    compliance_level: &'a str,
    data: Value,
}

/// Moderate-tier rules for tools with a known-safe shape
fn moderate_approves(input: &HookInput) -> bool {
    match input.tool_name() {
        "Write" | "Edit" | "MultiEdit" => !policy::is_critical_file(input.file_path()),
        "Bash" => policy::is_safe_command(input.command()),
        _ => false,
    }
}

fn consult_model(input: &HookInput, model: Option<&dyn PermissionModel>) -> PermissionDecision {
    let Some(model) = model else {
        return PermissionDecision::undecided_because(
            "No model credentials configured".to_string(),
        );
    };

    match model.assess(input.tool_name(), &input.tool_input) {
        Ok(assessment) => match assessment.decision.trim().to_ascii_lowercase().as_str() {
            "approve" => PermissionDecision::approve(format!(
                "LLM approved: {}",
                assessment.reason.as_deref().unwrap_or("Safe operation")
            )),
            "block" => PermissionDecision::block(format!(
                "LLM blocked: {}",
                assessment.reason.as_deref().unwrap_or("Potentially dangerous")
            )),
            _ => PermissionDecision::undecided_because(format!(
                "LLM requested review: {}",
                assessment.reason.as_deref().unwrap_or("no reason given")
            )),
        },
        Err(e) => {
            tracing::warn!("model evaluation failed: {:#}", e);
            PermissionDecision::undecided_because(format!("LLM evaluation error: {:#}", e))
        }
    }
}

/// Decide a permission request under `level`
pub fn decide(
    input: &HookInput,
    level: ComplianceLevel,
    model: Option<&dyn PermissionModel>,
) -> PermissionDecision {
    let tool_name = input.tool_name();

    if policy::is_read_only_tool(tool_name) {
        return PermissionDecision::approve(format!(
            "Auto-approved: {} is a safe read-only operation",
            tool_name
        ));
    }

    match level {
        ComplianceLevel::Strict => PermissionDecision::undecided(),
        ComplianceLevel::Moderate if moderate_approves(input) => {
            PermissionDecision::approve(format!(
                "Auto-approved: {} matches safe pattern",
                tool_name
            ))
        }
        ComplianceLevel::Moderate => PermissionDecision::undecided(),
        ComplianceLevel::Permissive => consult_model(input, model),
    }
}

pub fn run(
    input: &HookInput,
    level: ComplianceLevel,
    model: Option<&dyn PermissionModel>,
    journal: &Journal,
) -> HookOutcome {
    let decision = decide(input, level, model);
    tracing::debug!(
        tool = input.tool_name(),
        level = level.as_str(),
        decision = ?decision.verdict,
        "permission request decided"
    );

    journal.append(
        LogFile::PermissionRequest,
        &PermissionEntry {
            timestamp: journal::timestamp(),
            event_type: "permission_request",
            compliance_level: level.as_str(),
            data: json!({
                "tool_name": input.tool_name(),
                "tool_input": input.tool_input,
                "decision": decision.verdict,
                "reason": decision.reason,
            }),
        },
    );

    match decision.verdict {
        // Undecided: print nothing and let the human choose
        None => HookOutcome::Continue,
        Some(_) => HookOutcome::Respond(json!(decision)),
    }
}
