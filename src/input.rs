use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Input JSON from Claude Code hook system
///
/// Scalar fields are read leniently: `null` counts as absent and a number or
/// bool where text is expected is kept as its JSON text, so one odd field
/// never costs the whole event.
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    /// Event name, used to pick a hook when no subcommand is given
    #[serde(default, deserialize_with = "lenient_string")]
    pub hook_event_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub session_id: Option<String>,
    /// Tool name (PreToolUse/PermissionRequest/PostToolUse)
    #[serde(default, deserialize_with = "lenient_string")]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_input: Value,
    /// Tool output; a string for most tools, an object for some
    pub tool_response: Option<Value>,
    /// Prompt text (UserPromptSubmit)
    #[serde(default, deserialize_with = "lenient_string")]
    pub prompt: Option<String>,
    /// Stop reason (Stop/SubagentStop)
    #[serde(default, deserialize_with = "lenient_string")]
    pub reason: Option<String>,
    /// Set by the host when it is already continuing because of a stop hook
    #[serde(default, deserialize_with = "lenient_bool")]
    pub stop_hook_active: bool,
    /// The payload exactly as received
    #[serde(skip)]
    pub raw: Value,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Only a JSON `true` counts as set
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

impl HookInput {
    /// Parse one hook event. Anything that is not a JSON object is rejected.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        let raw: Value = serde_json::from_str(text)?;
        let mut input: HookInput = serde_json::from_value(raw.clone())?;
        input.raw = raw;
        Ok(input)
    }

    pub fn session_id(&self) -> &str {
        self.session_id.as_deref().unwrap_or("unknown")
    }

    pub fn tool_name(&self) -> &str {
        self.tool_name.as_deref().unwrap_or("unknown")
    }

    /// String field of `tool_input`, empty when absent or not a string
    pub fn tool_input_str(&self, key: &str) -> &str {
        self.tool_input
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    /// Target path of a file tool: `file_path`, falling back to `path`
    pub fn file_path(&self) -> &str {
        match self.tool_input_str("file_path") {
            "" => self.tool_input_str("path"),
            path => path,
        }
    }

    pub fn command(&self) -> &str {
        self.tool_input_str("command")
    }

    /// Tool response as text. Non-string responses are rendered as JSON.
    pub fn response_text(&self) -> String {
        match &self.tool_response {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}
