//! How a hook reports back to the host. All printing happens here.

use serde_json::Value;
use std::fmt::Display;
use std::process::ExitCode;

/// Exit status the host treats as "block"
const BLOCK_EXIT_CODE: u8 = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum HookOutcome {
    /// Exit 0 with no output
    Continue,
    /// Exit 2; the reason goes to stderr and is shown to the agent
    Block(String),
    /// Exit 0 with a JSON payload on stdout
    Respond(Value),
}

impl HookOutcome {
    pub fn emit(self) -> ExitCode {
        match self {
            HookOutcome::Continue => ExitCode::SUCCESS,
            HookOutcome::Block(reason) => {
                #[allow(clippy::print_stderr)]
                {
                    eprintln!("{}", reason);
                }
                ExitCode::from(BLOCK_EXIT_CODE)
            }
            HookOutcome::Respond(payload) => {
                #[allow(clippy::print_stdout)]
                {
                    println!("{}", payload);
                }
                ExitCode::SUCCESS
            }
        }
    }
}

/// Report a fault on stderr. Faults never block, so this always yields exit 0.
pub fn report_fault(context: &str, err: impl Display) -> ExitCode {
    #[allow(clippy::print_stderr)]
    {
        eprintln!("{}: {}", context, err);
    }
    ExitCode::SUCCESS
}
