//! Job summary: one unvalidated completion that also names the company and role
//! used for the application's folder and file names.

use tracing::info;

use crate::generation::prompts::build_job_summary_prompt;
use crate::llm_client::{LlmError, SamplingParams, TextGenerator};

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub company: String,
    pub role: String,
    pub text: String,
}

/// Summarizes the target context. `role_hint` (from `--role`) wins over the parsed role.
pub async fn summarize_job(
    generator: &dyn TextGenerator,
    params: &SamplingParams,
    target: &str,
    role_hint: Option<&str>,
) -> Result<JobSummary, LlmError> {
    info!("Summarizing job description...");
    let result = generator
        .generate(&build_job_summary_prompt(target), params)
        .await?;
    Ok(parse_job_summary(result.text(), role_hint))
}

/// Reads the `Company:` and `Role:` header lines; missing values become `Unknown`.
pub fn parse_job_summary(text: &str, role_hint: Option<&str>) -> JobSummary {
    let mut company = None;
    let mut role = None;

    for line in text.lines().take(5) {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("Company:") {
            company.get_or_insert_with(|| value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Role:") {
            role.get_or_insert_with(|| value.trim().to_string());
        }
    }

    let role = role_hint
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .or(role)
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());

    JobSummary {
        company: company
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        role,
        text: text.trim().to_string(),
    }
}
