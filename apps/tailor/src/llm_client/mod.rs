/// LLM Client: the single point of entry for all generative-text calls in tailor.
///
/// ARCHITECTURAL RULE: No other module may call the completion API directly.
/// Generation, validation and job summaries all go through `TextGenerator`.
///
/// No retry logic lives here. Retries belong to the orchestrator, which needs to feed
/// each failure back into the next prompt.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::LlmConfig;

pub mod prompts;
#[cfg(test)]
pub(crate) mod testing;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Network-level failure, including transport timeouts.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx status, or a success body without `choices[0].message.content`.
    #[error("service error: {0}")]
    Service(String),
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl SamplingParams {
    /// Generation parameters from config.
    pub fn for_generation(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Validator parameters: same model and budget, validator temperature.
    pub fn for_validation(config: &LlmConfig) -> Self {
        Self {
            temperature: config.validation_temperature,
            ..Self::for_generation(config)
        }
    }
}

/// Generated text with code-fence markers and comment-like lines removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    text: String,
}

impl GenerationResult {
    pub fn from_raw(raw: &str) -> Self {
        Self {
            text: clean_generated_text(raw),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Abstraction over the completion service so the core can run against a fake.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// One completion call. Returns the raw `choices[0].message.content` text.
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String, LlmError>;

    /// Completion call with the response cleaned into a `GenerationResult`.
    async fn generate(
        &self,
        prompt: &str,
        params: &SamplingParams,
    ) -> Result<GenerationResult, LlmError> {
        let raw = self.complete(prompt, params).await?;
        Ok(GenerationResult::from_raw(&raw))
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    messages: Vec<CompletionMessage<'a>>,
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessageBody,
}

#[derive(Debug, Deserialize)]
struct CompletionMessageBody {
    content: Option<String>,
}

/// HTTP implementation of `TextGenerator` for an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String, LlmError> {
        let request_body = CompletionRequest {
            messages: vec![CompletionMessage {
                role: "user",
                content: prompt,
            }],
            model: &params.model,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Service(format!(
                "status {}: {}",
                status.as_u16(),
                body.chars().take(500).collect::<String>()
            )));
        }

        let content = parse_completion(&body)?;
        debug!(
            "Completion succeeded: model={}, chars={}",
            params.model,
            content.len()
        );
        Ok(content)
    }
}

/// Extracts `choices[0].message.content` from a success body.
fn parse_completion(body: &str) -> Result<String, LlmError> {
    let parsed: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::Service(format!("malformed response body: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::Service("response has no choices[0].message.content".into()))
}

/// Strips an enclosing ``` fence (with or without a language tag) from LLM output.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag, if any, up to the end of the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) if !rest[..idx].contains(char::is_whitespace) => &rest[idx + 1..],
        Some(_) => rest,
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    rest.trim_end()
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(rest.trim())
}

fn is_comment_line(line: &str) -> bool {
    let line = line.trim();
    (line.starts_with("<!--") && line.ends_with("-->")) || line.starts_with("//")
}

/// Removes fences, stray fence lines and whole-line comments.
fn clean_generated_text(raw: &str) -> String {
    strip_code_fences(raw)
        .lines()
        .filter(|line| !line.trim_start().starts_with("```") && !is_comment_line(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
