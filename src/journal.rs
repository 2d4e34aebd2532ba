//! Append-only JSON-lines event logs.
//!
//! Writes are best-effort: a failure is reported through tracing and never
//! changes what the hook decides.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// One log file per concern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFile {
    PreToolUse,
    PermissionRequest,
    ToolUsage,
    FileChanges,
    Prompts,
    LastPrompt,
    AgentInvocations,
    Completions,
    SubagentCompletions,
}

impl LogFile {
    pub fn file_name(self) -> &'static str {
        match self {
            LogFile::PreToolUse => "pre_tool_use.jsonl",
            LogFile::PermissionRequest => "permission_request.jsonl",
            LogFile::ToolUsage => "tool_usage.jsonl",
            LogFile::FileChanges => "file_changes.jsonl",
            LogFile::Prompts => "prompts.jsonl",
            LogFile::LastPrompt => "last_prompt.txt",
            LogFile::AgentInvocations => "agent_invocations.jsonl",
            LogFile::Completions => "completions.jsonl",
            LogFile::SubagentCompletions => "subagent_completions.jsonl",
        }
    }
}

/// Local timestamp used in every record
pub fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

#[derive(Debug, Clone)]
pub struct Journal {
    dir: PathBuf,
}

impl Journal {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, file: LogFile) -> PathBuf {
        self.dir.join(file.file_name())
    }

    /// Append one record as a single JSON line
    pub fn append<T: Serialize>(&self, file: LogFile, entry: &T) {
        if let Err(e) = self.try_append(file, entry) {
            tracing::warn!(file = file.file_name(), "failed to append log entry: {:#}", e);
        }
    }

    /// Replace the file's contents
    pub fn overwrite(&self, file: LogFile, contents: &str) {
        if let Err(e) = self.try_overwrite(file, contents) {
            tracing::warn!(file = file.file_name(), "failed to write log file: {:#}", e);
        }
    }

    fn try_append<T: Serialize>(&self, file: LogFile, entry: &T) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        self.ensure_dir()?;
        let path = self.path(file);
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        // One write per record keeps concurrent appends line-aligned
        handle
            .write_all(line.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn try_overwrite(&self, file: LogFile, contents: &str) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path(file);
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create log dir {}", self.dir.display()))
    }
}
