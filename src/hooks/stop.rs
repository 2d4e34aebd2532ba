//! Session stop monitor. Logs the stop and lets the session end; the
//! incomplete-work veto only runs when enabled in config.

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::checks::incomplete;
use crate::config::Settings;
use crate::input::HookInput;
use crate::journal::{self, Journal, LogFile};
use crate::outcome::HookOutcome;

/// Issues listed in a veto message
const MAX_REPORTED_ISSUES: usize = 5;

#[derive(Debug, Serialize)]
struct CompletionEntry<'a> {
    timestamp: String,
    session_id: &'a str,
    stop_reason: &'a str,
    data: &'a Value,
}

fn veto_message(issues: &[String]) -> String {
    let listed: Vec<&str> = issues
        .iter()
        .take(MAX_REPORTED_ISSUES)
        .map(String::as_str)
        .collect();
    format!(
        "Found potentially incomplete work:\n{}\n\nPlease address these before completing.",
        listed.join("\n")
    )
}

fn allow_stop() -> HookOutcome {
    HookOutcome::Respond(json!({"continue": true, "suppressOutput": true}))
}

pub fn run(input: &HookInput, settings: &Settings, journal: &Journal) -> Result<HookOutcome> {
    journal.append(
        LogFile::Completions,
        &CompletionEntry {
            timestamp: journal::timestamp(),
            session_id: input.session_id(),
            stop_reason: input.reason.as_deref().unwrap_or("unknown"),
            data: &input.raw,
        },
    );

    if !settings.stop.check_incomplete {
        return Ok(allow_stop());
    }
    if input.stop_hook_active {
        tracing::debug!("stop hook already active, not scanning again");
        return Ok(allow_stop());
    }

    let window = Duration::from_secs(settings.stop.window_minutes.saturating_mul(60));
    let issues = incomplete::check(
        &settings.project_dir,
        window,
        settings.stop.max_files,
        &[settings.log_dir.as_path()],
    )?;
    tracing::debug!(issues = issues.len(), "incomplete-work scan finished");

    if issues.is_empty() {
        Ok(allow_stop())
    } else {
        Ok(HookOutcome::Respond(json!({
            "decision": "block",
            "reason": veto_message(&issues),
        })))
    }
}
