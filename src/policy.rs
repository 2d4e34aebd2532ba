//! Static policy tables. These fully determine every decision that does not
//! involve the model.

/// Shell command fragments that are always blocked (compared lower-cased)
pub const DANGEROUS_COMMAND_PATTERNS: &[&str] = &[
    "rm -rf /",
    "rm -rf ~",
    "rm -rf /*",
    "> /dev/sda",
    "mkfs.",
    "dd if=/dev/zero",
    ":(){:|:&};:", // fork bomb
    "chmod -R 777 /",
    "curl | sh",
    "wget | sh",
    "curl | bash",
    "wget | bash",
];

/// Path fragments of credential files that must never be read or written
pub const PROTECTED_PATH_FRAGMENTS: &[&str] = &[
    ".env",
    ".env.local",
    ".env.production",
    "secrets.json",
    "credentials.json",
    ".aws/credentials",
    ".ssh/",
    "id_rsa",
    "id_ed25519",
];

/// Tools whose target path is checked against [`PROTECTED_PATH_FRAGMENTS`]
pub const FILE_ACCESS_TOOLS: &[&str] = &["Read", "Write", "Edit", "MultiEdit"];

/// Read-only tools, approved in every compliance tier
pub const READ_ONLY_TOOLS: &[&str] = &["Read", "Glob", "Grep", "LS"];

/// Tools that modify files
pub const FILE_MUTATING_TOOLS: &[&str] = &["Write", "Edit", "MultiEdit"];

/// Path fragments of build, dependency and CI files that always need a human
pub const CRITICAL_PATH_FRAGMENTS: &[&str] = &[
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "Cargo.toml",
    "Cargo.lock",
    "requirements.txt",
    "pyproject.toml",
    "Dockerfile",
    "docker-compose.yml",
    ".github/",
    "Makefile",
    "tsconfig.json",
];

/// Command prefixes auto-approved in the moderate tier
pub const SAFE_COMMAND_PREFIXES: &[&str] = &[
    "ls",
    "cat",
    "head",
    "tail",
    "grep",
    "find",
    "echo",
    "pwd",
    "which",
    "type",
    "file",
    "wc",
    "sort",
    "uniq",
    "npm run",
    "npm test",
    "npm start",
    "npm build",
    "yarn run",
    "yarn test",
    "yarn start",
    "yarn build",
    "python -m pytest",
    "pytest",
    "python -m unittest",
    "cargo test",
    "cargo build",
    "cargo check",
    "git status",
    "git log",
    "git diff",
    "git branch",
];

/// Lexical markers of unfinished work
pub const INCOMPLETE_MARKERS: &[&str] = &[
    "TODO",
    "FIXME",
    "not implemented",
    "placeholder",
    "will implement",
    "need to add",
    "coming soon",
    "later",
    "skip for now",
];

/// Agent personas and the keywords that suggest a prompt is invoking them.
/// Earlier entries win when several match.
pub const AGENT_TRIGGERS: &[(&str, &[&str])] = &[
    (
        "frontend-engineer",
        &["frontend", "react", "vue", "component", "css", "ui"],
    ),
    (
        "backend-engineer",
        &["backend", "api", "database", "endpoint", "server"],
    ),
    ("principal-engineer-reviewer", &["review", "code review"]),
    (
        "completeness-checker",
        &["check complete", "find placeholders", "find todos"],
    ),
    ("planning-agent", &["plan", "implement feature", "build"]),
];

/// First dangerous pattern contained in `command`, ignoring case
pub fn dangerous_pattern(command: &str) -> Option<&'static str> {
    let command = command.to_lowercase();
    DANGEROUS_COMMAND_PATTERNS
        .iter()
        .copied()
        .find(|p| command.contains(&p.to_lowercase()))
}

/// First protected fragment contained in `path`
pub fn protected_fragment(path: &str) -> Option<&'static str> {
    PROTECTED_PATH_FRAGMENTS
        .iter()
        .copied()
        .find(|f| path.contains(f))
}

pub fn is_critical_file(path: &str) -> bool {
    CRITICAL_PATH_FRAGMENTS.iter().any(|f| path.contains(f))
}

pub fn is_safe_command(command: &str) -> bool {
    let command = command.trim().to_lowercase();
    SAFE_COMMAND_PREFIXES
        .iter()
        .any(|prefix| command.starts_with(prefix))
}

pub fn is_read_only_tool(tool_name: &str) -> bool {
    READ_ONLY_TOOLS.contains(&tool_name)
}

pub fn is_file_access_tool(tool_name: &str) -> bool {
    FILE_ACCESS_TOOLS.contains(&tool_name)
}

pub fn is_file_mutating_tool(tool_name: &str) -> bool {
    FILE_MUTATING_TOOLS.contains(&tool_name)
}

/// First persona whose trigger appears in `prompt`, ignoring case
pub fn detect_agent(prompt: &str) -> Option<&'static str> {
    let prompt = prompt.to_lowercase();
    AGENT_TRIGGERS
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| prompt.contains(t)))
        .map(|(agent, _)| *agent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_defined() {
        assert!(!DANGEROUS_COMMAND_PATTERNS.is_empty());
        assert!(!PROTECTED_PATH_FRAGMENTS.is_empty());
        assert!(!CRITICAL_PATH_FRAGMENTS.is_empty());
        assert!(!SAFE_COMMAND_PREFIXES.is_empty());
        assert!(!INCOMPLETE_MARKERS.is_empty());
        for (agent, triggers) in AGENT_TRIGGERS {
            assert!(!agent.is_empty());
            assert!(!triggers.is_empty());
        }
    }

    #[test]
    fn test_every_dangerous_pattern_matches_in_any_case() {
        for pattern in DANGEROUS_COMMAND_PATTERNS {
            let command = format!("sudo {} now", pattern.to_uppercase());
            assert!(
                dangerous_pattern(&command).is_some(),
                "pattern {} not detected",
                pattern
            );
        }
    }

    #[test]
    fn test_dangerous_pattern_reports_first_match() {
        assert_eq!(
            dangerous_pattern("rm -rf / --no-preserve-root"),
            Some("rm -rf /")
        );
        assert_eq!(dangerous_pattern("CHMOD -r 777 /"), Some("chmod -R 777 /"));
        assert_eq!(dangerous_pattern("rm -rf ./build"), None);
    }

    #[test]
    fn test_protected_fragment() {
        assert_eq!(protected_fragment("/home/me/.ssh/config"), Some(".ssh/"));
        assert_eq!(protected_fragment("config/.env.local"), Some(".env"));
        assert_eq!(protected_fragment("keys/id_ed25519.pub"), Some("id_ed25519"));
        assert_eq!(protected_fragment("src/main.rs"), None);
    }

    #[test]
    fn test_critical_files() {
        assert!(is_critical_file("/repo/Cargo.toml"));
        assert!(is_critical_file(".github/workflows/ci.yml"));
        assert!(is_critical_file("web/package.json"));
        assert!(!is_critical_file("src/lib.rs"));
        assert!(!is_critical_file("README.md"));
    }

    #[test]
    fn test_safe_commands() {
        assert!(is_safe_command("ls -la"));
        assert!(is_safe_command("  Git Status"));
        assert!(is_safe_command("cargo test --all"));
        assert!(!is_safe_command("git push --force"));
        assert!(!is_safe_command("npm install left-pad"));
        assert!(!is_safe_command("make"));
    }

    #[test]
    fn test_tool_classes() {
        for tool in ["Read", "Glob", "Grep", "LS"] {
            assert!(is_read_only_tool(tool));
        }
        assert!(!is_read_only_tool("Write"));
        assert!(is_file_access_tool("Read"));
        assert!(!is_file_access_tool("Bash"));
        assert!(is_file_mutating_tool("MultiEdit"));
        assert!(!is_file_mutating_tool("Read"));
    }

    #[test]
    fn test_detect_agent() {
        assert_eq!(
            detect_agent("Fix the React header"),
            Some("frontend-engineer")
        );
        assert_eq!(
            detect_agent("add a DATABASE index"),
            Some("backend-engineer")
        );
        assert_eq!(
            detect_agent("please do a code review"),
            Some("principal-engineer-reviewer")
        );
        assert_eq!(detect_agent("plan the migration"), Some("planning-agent"));
        assert_eq!(detect_agent("hello there"), None);
    }

    #[test]
    fn test_detect_agent_table_order_wins() {
        // "frontend" and "api" both match; the earlier persona wins
        assert_eq!(
            detect_agent("wire the frontend to the api"),
            Some("frontend-engineer")
        );
    }
}
