use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod checks;
mod config;
mod hooks;
mod input;
mod journal;
mod model;
mod outcome;
mod policy;

use config::Settings;
use hooks::user_prompt_submit::PromptOptions;
use input::HookInput;
use journal::Journal;
use model::{AnthropicModel, PermissionModel};
use outcome::HookOutcome;

/// Env var holding the tracing filter for diagnostics
const LOG_FILTER_VAR: &str = "HOOKWARDEN_LOG";

#[derive(Parser, Debug)]
#[command(name = "hookwarden")]
#[command(about = "Claude Code lifecycle hooks")]
#[command(version)]
struct Cli {
    /// Hook to run; chosen from the event's hook_event_name when omitted
    #[command(subcommand)]
    hook: Option<Hook>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    /// Block dangerous commands and sensitive file access
    PreToolUse,
    /// Approve, block or defer a permission request
    PermissionRequest,
    /// Log tool usage and file changes
    PostToolUse,
    /// Validate and log a submitted prompt
    UserPromptSubmit {
        /// Keep the prompt as the last known prompt
        #[arg(long)]
        store_last_prompt: bool,
        /// Log which agent persona the prompt seems to invoke
        #[arg(long)]
        name_agent: bool,
        /// Accepted for compatibility; prompts are never modified
        #[arg(long)]
        log_only: bool,
    },
    /// Log a session stop
    Stop,
    /// Log a sub-agent stop
    SubagentStop,
}

impl Hook {
    fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "PreToolUse" => Some(Hook::PreToolUse),
            "PermissionRequest" => Some(Hook::PermissionRequest),
            "PostToolUse" => Some(Hook::PostToolUse),
            "UserPromptSubmit" => Some(Hook::UserPromptSubmit {
                store_last_prompt: false,
                name_agent: false,
                log_only: false,
            }),
            "Stop" => Some(Hook::Stop),
            "SubagentStop" => Some(Hook::SubagentStop),
            _ => None,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();

    // Argument errors must not exit 2, which the host reads as "block"
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    let input = match read_input() {
        Ok(input) => input,
        Err(e) => return outcome::report_fault("Error parsing hook input", format!("{:#}", e)),
    };

    let hook = cli
        .hook
        .or_else(|| input.hook_event_name.as_deref().and_then(Hook::from_event_name));
    let Some(hook) = hook else {
        tracing::debug!(event = ?input.hook_event_name, "unhandled event");
        return ExitCode::SUCCESS;
    };

    match run_hook(hook, &input) {
        Ok(outcome) => outcome.emit(),
        Err(e) => outcome::report_fault("Hook error", format!("{:#}", e)),
    }
}

fn run_hook(hook: Hook, input: &HookInput) -> Result<HookOutcome> {
    let settings = Settings::load()?;
    let journal = Journal::new(&settings.log_dir);
    tracing::debug!(?hook, session = input.session_id(), "running hook");

    let outcome = match hook {
        Hook::PreToolUse => hooks::pre_tool_use::run(input, &journal),
        Hook::PermissionRequest => {
            let model = build_model(&settings);
            hooks::permission_request::run(
                input,
                settings.compliance,
                model.as_ref().map(|m| m as &dyn PermissionModel),
                &journal,
            )
        }
        Hook::PostToolUse => hooks::post_tool_use::run(input, &journal),
        Hook::UserPromptSubmit {
            store_last_prompt,
            name_agent,
            log_only: _,
        } => hooks::user_prompt_submit::run(
            input,
            PromptOptions {
                store_last_prompt,
                name_agent,
            },
            &journal,
        ),
        Hook::Stop => hooks::stop::run(input, &settings, &journal)?,
        Hook::SubagentStop => hooks::subagent_stop::run(input, &journal),
    };

    Ok(outcome)
}

/// The model is only available with credentials and in the permissive tier
fn build_model(settings: &Settings) -> Option<AnthropicModel> {
    if settings.compliance != config::ComplianceLevel::Permissive {
        return None;
    }
    let api_key = settings.api_key.as_deref()?;
    match AnthropicModel::new(api_key, settings.model.clone()) {
        Ok(model) => Some(model),
        Err(e) => {
            tracing::warn!("model unavailable: {:#}", e);
            None
        }
    }
}

fn read_input() -> Result<HookInput> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    let input = HookInput::parse(&buffer)?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_prompt_flags() {
        let cli = Cli::try_parse_from([
            "hookwarden",
            "user-prompt-submit",
            "--store-last-prompt",
            "--name-agent",
        ])
        .unwrap();
        assert_eq!(
            cli.hook,
            Some(Hook::UserPromptSubmit {
                store_last_prompt: true,
                name_agent: true,
                log_only: false,
            })
        );
    }

    #[test]
    fn test_cli_subcommand_names() {
        for (arg, hook) in [
            ("pre-tool-use", Hook::PreToolUse),
            ("permission-request", Hook::PermissionRequest),
            ("post-tool-use", Hook::PostToolUse),
            ("stop", Hook::Stop),
            ("subagent-stop", Hook::SubagentStop),
        ] {
            let cli = Cli::try_parse_from(["hookwarden", arg]).unwrap();
            assert_eq!(cli.hook, Some(hook));
        }
        assert!(Cli::try_parse_from(["hookwarden"]).unwrap().hook.is_none());
    }

    #[test]
    fn test_hook_from_event_name() {
        assert_eq!(Hook::from_event_name("PreToolUse"), Some(Hook::PreToolUse));
        assert_eq!(Hook::from_event_name("SubagentStop"), Some(Hook::SubagentStop));
        assert!(matches!(
            Hook::from_event_name("UserPromptSubmit"),
            Some(Hook::UserPromptSubmit { store_last_prompt: false, .. })
        ));
        assert_eq!(Hook::from_event_name("Notification"), None);
    }

    #[test]
    fn test_build_model_requires_permissive_and_key() {
        let dir = std::env::temp_dir();
        let mut settings = Settings::resolve(&dir, |_| None);
        settings.compliance = config::ComplianceLevel::Permissive;
        assert!(build_model(&settings).is_none());

        settings.api_key = Some("sk-test".to_string());
        assert!(build_model(&settings).is_some());

        settings.compliance = config::ComplianceLevel::Moderate;
        assert!(build_model(&settings).is_none());
    }
}
