//! Sub-agent stop monitor. Always lets the sub-agent finish; a veto would be
//! `HookOutcome::Block`, which exits 2 and shows the reason to the sub-agent.

use serde::Serialize;
use serde_json::Value;

use crate::input::HookInput;
use crate::journal::{self, Journal, LogFile};
use crate::outcome::HookOutcome;

#[derive(Debug, Serialize)]
struct SubagentEntry<'a> {
    timestamp: String,
    session_id: &'a str,
    event: &'a str,
    data: &'a Value,
}

pub fn run(input: &HookInput, journal: &Journal) -> HookOutcome {
    journal.append(
        LogFile::SubagentCompletions,
        &SubagentEntry {
            timestamp: journal::timestamp(),
            session_id: input.session_id(),
            event: "subagent_stop",
            data: &input.raw,
        },
    );
    HookOutcome::Continue
}
