//! Prompt intake: validate, log, and optionally snapshot the prompt and note
//! which agent persona it seems to call for.

use serde::Serialize;

use crate::input::HookInput;
use crate::journal::{self, Journal, LogFile};
use crate::outcome::HookOutcome;
use crate::policy;

/// Longest prompt accepted, in characters
pub const MAX_PROMPT_CHARS: usize = 100_000;

/// Characters of the prompt kept with an agent detection
const AGENT_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptOptions {
    pub store_last_prompt: bool,
    pub name_agent: bool,
}

#[derive(Debug, Serialize)]
struct PromptEntry<'a> {
    timestamp: String,
    session_id: &'a str,
    prompt: &'a str,
    length: usize,
}

#[derive(Debug, Serialize)]
struct AgentEntry<'a> {
    timestamp: String,
    session_id: &'a str,
    detected_agent: &'a str,
    prompt_preview: String,
}

/// Reason the prompt is rejected, if any
pub fn validate(prompt: &str) -> Option<&'static str> {
    if prompt.trim().is_empty() {
        return Some("Empty prompt received");
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Some("Prompt exceeds maximum length (100k characters)");
    }
    None
}

pub fn run(input: &HookInput, options: PromptOptions, journal: &Journal) -> HookOutcome {
    let prompt = input.prompt.as_deref().unwrap_or("");
    let session_id = input.session_id();

    if let Some(reason) = validate(prompt) {
        tracing::debug!(session = session_id, "prompt rejected: {}", reason);
        return HookOutcome::Block(reason.to_string());
    }

    journal.append(
        LogFile::Prompts,
        &PromptEntry {
            timestamp: journal::timestamp(),
            session_id,
            prompt,
            length: prompt.chars().count(),
        },
    );

    if options.store_last_prompt {
        journal.overwrite(LogFile::LastPrompt, prompt);
    }

    if options.name_agent {
        if let Some(agent) = policy::detect_agent(prompt) {
            tracing::debug!(session = session_id, agent, "agent invocation detected");
            journal.append(
                LogFile::AgentInvocations,
                &AgentEntry {
                    timestamp: journal::timestamp(),
                    session_id,
                    detected_agent: agent,
                    prompt_preview: prompt.chars().take(AGENT_PREVIEW_CHARS).collect(),
                },
            );
        }
    }

    HookOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::tests::read_lines;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn prompt_input(prompt: &str) -> HookInput {
        let event = json!({"session_id": "s1", "prompt": prompt});
        HookInput::parse(&event.to_string()).unwrap()
    }

    #[test]
    fn test_validate_boundaries() {
        assert!(validate("").is_some());
        assert!(validate(" \n\t ").is_some());
        assert!(validate(&"a".repeat(MAX_PROMPT_CHARS)).is_none());
        assert!(validate(&"a".repeat(MAX_PROMPT_CHARS + 1)).is_some());
        // Length is measured in characters, not bytes
        assert!(validate(&"é".repeat(MAX_PROMPT_CHARS)).is_none());
    }

    #[test]
    fn test_rejected_prompt_blocks_without_logging() {
        let temp = TempDir::new().unwrap();
        let journal = Journal::new(temp.path());

        let outcome = run(&prompt_input("   "), PromptOptions::default(), &journal);
        assert_eq!(outcome, HookOutcome::Block("Empty prompt received".to_string()));

        let missing = HookInput::parse(r#"{"session_id":"s1"}"#).unwrap();
        assert!(matches!(
            run(&missing, PromptOptions::default(), &journal),
            HookOutcome::Block(_)
        ));

        assert!(read_lines(&journal, LogFile::Prompts).is_empty());
    }

    #[test]
    fn test_prompt_is_logged() {
        let temp = TempDir::new().unwrap();
        let journal = Journal::new(temp.path());

        let outcome = run(&prompt_input("fix the tests"), PromptOptions::default(), &journal);
        assert_eq!(outcome, HookOutcome::Continue);

        let lines = read_lines(&journal, LogFile::Prompts);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["prompt"], "fix the tests");
        assert_eq!(lines[0]["length"], 13);
        assert_eq!(lines[0]["session_id"], "s1");

        // Flags off: no snapshot, no detection
        assert!(!journal.path(LogFile::LastPrompt).exists());
        assert!(!journal.path(LogFile::AgentInvocations).exists());
    }

    #[test]
    fn test_store_last_prompt_overwrites() {
        let temp = TempDir::new().unwrap();
        let journal = Journal::new(temp.path());
        let options = PromptOptions {
            store_last_prompt: true,
            name_agent: false,
        };

        run(&prompt_input("first prompt, quite long"), options, &journal);
        run(&prompt_input("second"), options, &journal);

        let stored = fs::read_to_string(journal.path(LogFile::LastPrompt)).unwrap();
        assert_eq!(stored, "second");
        assert_eq!(read_lines(&journal, LogFile::Prompts).len(), 2);
    }

    #[test]
    fn test_name_agent_records_first_persona() {
        let temp = TempDir::new().unwrap();
        let journal = Journal::new(temp.path());
        let options = PromptOptions {
            store_last_prompt: false,
            name_agent: true,
        };

        run(&prompt_input("Add a new API endpoint for orders"), options, &journal);
        run(&prompt_input("hello"), options, &journal);

        let lines = read_lines(&journal, LogFile::AgentInvocations);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["detected_agent"], "backend-engineer");
        assert_eq!(lines[0]["prompt_preview"], "Add a new API endpoint for orders");
    }
}
