use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";

/// Settings for the generative-text service.
/// Passed into `LlmClient::new`; nothing below the binary entry point reads the environment.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Temperature for validator calls. Kept separate so verdicts stay as stable as possible.
    pub validation_temperature: f32,
    pub timeout_secs: u64,
}

/// Application configuration loaded from environment variables (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub applicant_name: String,
    pub master_resume_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm: LlmConfig {
                api_key: require_env("LLM_API_KEY")?,
                api_url: optional_env("LLM_API_URL", DEFAULT_API_URL),
                model: optional_env("LLM_MODEL", DEFAULT_MODEL),
                max_tokens: parse_env("LLM_MAX_TOKENS", 4096)?,
                temperature: parse_env("LLM_TEMPERATURE", 0.7)?,
                validation_temperature: parse_env("LLM_VALIDATION_TEMPERATURE", 0.0)?,
                timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            },
            applicant_name: require_env("APPLICANT_NAME")?,
            master_resume_path: PathBuf::from(optional_env(
                "MASTER_RESUME_PATH",
                "master_resume.md",
            )),
            output_dir: PathBuf::from(optional_env("OUTPUT_DIR", "applications")),
        })
    }
}

/// Log level used when `RUST_LOG` is not set. Read before `Config` so that
/// commands that need no configuration still get logging.
pub fn log_level() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
