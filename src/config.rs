use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "hookwarden.yaml";
const DEFAULT_LOG_DIR: &str = ".claude/logs";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

pub const PROJECT_DIR_VAR: &str = "CLAUDE_PROJECT_DIR";
pub const COMPLIANCE_VAR: &str = "CLAUDE_COMPLIANCE_LEVEL";
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
pub const CONFIG_PATH_VAR: &str = "HOOKWARDEN_CONFIG";

/// How much the permission arbiter decides on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceLevel {
    /// Only read-only tools are approved automatically
    Strict,
    /// Known-safe writes and commands are approved too
    Moderate,
    /// Whatever moderate leaves open is put to the model
    Permissive,
}

impl ComplianceLevel {
    /// Parse a tier name. Unrecognized names fall back to strict.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => ComplianceLevel::Strict,
            "moderate" => ComplianceLevel::Moderate,
            "permissive" => ComplianceLevel::Permissive,
            other => {
                tracing::warn!("unknown compliance level '{}', using strict", other);
                ComplianceLevel::Strict
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComplianceLevel::Strict => "strict",
            ComplianceLevel::Moderate => "moderate",
            ComplianceLevel::Permissive => "permissive",
        }
    }
}

impl fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model used by the permissive tier
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSettings {
    pub name: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub base_url: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            max_tokens: 200,
            timeout_secs: 30,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Incomplete-work scan run by the stop hook
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StopSettings {
    /// Off unless explicitly enabled
    pub check_incomplete: bool,
    /// Only files modified this recently are scanned
    pub window_minutes: u64,
    /// Upper bound on files read per stop
    pub max_files: usize,
}

impl Default for StopSettings {
    fn default() -> Self {
        Self {
            check_incomplete: false,
            window_minutes: 60,
            max_files: 20,
        }
    }
}

/// Raw configuration structure (as parsed from YAML)
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    /// Log directory, relative to the project root
    log_dir: Option<PathBuf>,
    compliance_level: Option<String>,
    model: ModelSettings,
    stop: StopSettings,
}

/// Resolved settings for one hook invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_dir: PathBuf,
    pub log_dir: PathBuf,
    pub compliance: ComplianceLevel,
    pub model: ModelSettings,
    pub stop: StopSettings,
    pub api_key: Option<String>,
}

impl Settings {
    /// Resolve settings from the process environment
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Ok(Self::resolve(&cwd, |key| std::env::var(key).ok()))
    }

    /// Resolve settings from an environment lookup. Environment values win
    /// over the config file; an invalid config file is ignored.
    pub fn resolve(cwd: &Path, env: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let project_dir = lookup(PROJECT_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| cwd.to_path_buf());

        let config_path = lookup(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| project_dir.join(".claude").join(CONFIG_FILENAME));

        let file = if config_path.exists() {
            match load_config(&config_path) {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!("ignoring config: {:#}", e);
                    FileConfig::default()
                }
            }
        } else {
            FileConfig::default()
        };

        let log_dir = project_dir.join(
            file.log_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
        );

        let compliance = lookup(COMPLIANCE_VAR)
            .or(file.compliance_level)
            .map(|level| ComplianceLevel::parse(&level))
            .unwrap_or(ComplianceLevel::Moderate);

        let mut model = file.model;
        if let Some(url) = lookup(BASE_URL_VAR) {
            model.base_url = url;
        }

        Settings {
            project_dir,
            log_dir,
            compliance,
            model,
            stop: file.stop,
            api_key: lookup(API_KEY_VAR),
        }
    }
}

/// Validates a parsed config file
fn validate_config(config: &FileConfig, config_path: &Path) -> Result<()> {
    if config.model.name.is_empty() {
        bail!(
            "Invalid config at {}: 'model.name' must not be empty",
            config_path.display()
        );
    }
    if config.model.max_tokens == 0 {
        bail!(
            "Invalid config at {}: 'model.max_tokens' must be positive",
            config_path.display()
        );
    }
    if config.model.timeout_secs == 0 {
        bail!(
            "Invalid config at {}: 'model.timeout_secs' must be positive",
            config_path.display()
        );
    }
    if config.stop.window_minutes == 0 || config.stop.max_files == 0 {
        bail!(
            "Invalid config at {}: 'stop.window_minutes' and 'stop.max_files' must be positive",
            config_path.display()
        );
    }
    Ok(())
}

/// Loads and validates a hookwarden.yaml config file.
fn load_config(config_path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    // An empty file means "all defaults"
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    let parsed: FileConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    validate_config(&parsed, config_path)?;
    Ok(parsed)
}
