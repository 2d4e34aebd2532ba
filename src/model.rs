//! Language-model delegation for the permissive tier.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::ModelSettings;

const API_VERSION: &str = "2023-06-01";

/// What the model recommends for a tool request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Assessment {
    /// "approve", "block" or "review"; anything else is treated as review
    pub decision: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Something that can judge a tool request
pub trait PermissionModel {
    fn assess(&self, tool_name: &str, tool_input: &Value) -> Result<Assessment>;
}

/// Build the evaluation prompt for one tool request
pub fn build_prompt(tool_name: &str, tool_input: &Value) -> String {
    let input = serde_json::to_string_pretty(tool_input).unwrap_or_else(|_| tool_input.to_string());
    format!(
        r#"You are a security-conscious permission evaluator for a coding assistant.

Evaluate this tool request:
- Tool: {tool_name}
- Input: {input}

Decide if this should be:
1. APPROVED - Safe operation, proceed automatically
2. BLOCKED - Dangerous operation, deny with explanation
3. REVIEW - Needs human review (uncertain or sensitive)

Consider:
- Could this cause data loss?
- Does it access sensitive files?
- Is it a destructive operation?
- Does it make external network calls?

Respond with JSON only:
{{"decision": "approve|block|review", "reason": "brief explanation"}}
"#
    )
}

/// Parse the model's reply: the span from the first `{` to the last `}`
pub fn parse_assessment(text: &str) -> Result<Assessment> {
    let start = text
        .find('{')
        .ok_or_else(|| anyhow!("Could not parse model response: no JSON object"))?;
    let end = text
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| anyhow!("Could not parse model response: unterminated JSON object"))?;

    serde_json::from_str(&text[start..=end]).context("Could not parse model response")
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic Messages API client
pub struct AnthropicModel {
    client: reqwest::blocking::Client,
    api_key: String,
    settings: ModelSettings,
}

impl std::fmt::Debug for AnthropicModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicModel")
            .field("settings", &self.settings)
            .finish()
    }
}

impl AnthropicModel {
    pub fn new(api_key: impl Into<String>, settings: ModelSettings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            settings,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.settings.base_url.trim_end_matches('/'))
    }
}

impl PermissionModel for AnthropicModel {
    fn assess(&self, tool_name: &str, tool_input: &Value) -> Result<Assessment> {
        let prompt = build_prompt(tool_name, tool_input);
        let body = MessagesRequest {
            model: &self.settings.name,
            max_tokens: self.settings.max_tokens,
            messages: [Message {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .context("Model request failed")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            bail!("Model request returned {}: {}", status, text);
        }

        let parsed: MessagesResponse = response.json().context("Malformed model response")?;
        let text = parsed
            .content
            .into_iter()
            .find(|block| block.type_ == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| anyhow!("Model response has no text content"))?;

        parse_assessment(text.trim())
    }
}
