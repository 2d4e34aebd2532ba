//! Post-execution logger. The tool already ran, so this never rejects.

use serde::Serialize;
use serde_json::Value;

use crate::input::HookInput;
use crate::journal::{self, Journal, LogFile};
use crate::outcome::HookOutcome;
use crate::policy;

/// Characters of the tool response kept in the usage log
const RESPONSE_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Serialize)]
struct ToolUsageEntry<'a> {
    timestamp: String,
    session_id: &'a str,
    tool_name: &'a str,
    tool_input: &'a Value,
    response_length: usize,
    response_preview: String,
}

#[derive(Debug, Serialize)]
struct FileChangeEntry<'a> {
    timestamp: String,
    operation: &'a str,
    file: &'a str,
}

/// First `max` characters of `text`
fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

pub fn run(input: &HookInput, journal: &Journal) -> HookOutcome {
    let response = input.response_text();
    let tool_name = input.tool_name();

    journal.append(
        LogFile::ToolUsage,
        &ToolUsageEntry {
            timestamp: journal::timestamp(),
            session_id: input.session_id(),
            tool_name,
            tool_input: &input.tool_input,
            response_length: response.chars().count(),
            response_preview: preview(&response, RESPONSE_PREVIEW_CHARS),
        },
    );

    if policy::is_file_mutating_tool(tool_name) {
        tracing::debug!(tool = tool_name, file = input.file_path(), "file change recorded");
        journal.append(
            LogFile::FileChanges,
            &FileChangeEntry {
                timestamp: journal::timestamp(),
                operation: tool_name,
                file: input.file_path(),
            },
        );
    }

    HookOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::tests::read_lines;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_preview_counts_characters() {
        assert_eq!(preview("héllo", 2), "hé");
        assert_eq!(preview("short", 500), "short");
    }

    #[test]
    fn test_usage_entry_truncates_response() {
        let temp = TempDir::new().unwrap();
        let journal = Journal::new(temp.path());
        let long = "x".repeat(1234);
        let event = json!({
            "session_id": "s1",
            "tool_name": "Bash",
            "tool_input": {"command": "cat big.log"},
            "tool_response": long,
        });

        let outcome = run(&HookInput::parse(&event.to_string()).unwrap(), &journal);
        assert_eq!(outcome, HookOutcome::Continue);

        let lines = read_lines(&journal, LogFile::ToolUsage);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["session_id"], "s1");
        assert_eq!(lines[0]["response_length"], 1234);
        assert_eq!(lines[0]["response_preview"].as_str().unwrap().len(), 500);
        assert_eq!(lines[0]["tool_input"]["command"], "cat big.log");

        // Bash does not modify files directly
        assert!(read_lines(&journal, LogFile::FileChanges).is_empty());
    }

    #[test]
    fn test_file_mutations_are_tracked() {
        let temp = TempDir::new().unwrap();
        let journal = Journal::new(temp.path());

        for (tool, path) in [("Write", "src/a.rs"), ("Edit", "src/b.rs"), ("MultiEdit", "src/c.rs")] {
            let event = json!({
                "tool_name": tool,
                "tool_input": {"file_path": path},
                "tool_response": {"success": true},
            });
            run(&HookInput::parse(&event.to_string()).unwrap(), &journal);
        }
        let event = json!({"tool_name": "Read", "tool_input": {"file_path": "src/d.rs"}});
        run(&HookInput::parse(&event.to_string()).unwrap(), &journal);

        let usage = read_lines(&journal, LogFile::ToolUsage);
        assert_eq!(usage.len(), 4);
        assert_eq!(usage[0]["session_id"], "unknown");
        assert_eq!(usage[0]["response_preview"], r#"{"success":true}"#);
        assert_eq!(usage[3]["response_length"], 0);

        let changes = read_lines(&journal, LogFile::FileChanges);
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0]["operation"], "Write");
        assert_eq!(changes[2]["file"], "src/c.rs");
    }
}
