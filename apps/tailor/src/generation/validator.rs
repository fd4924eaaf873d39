//! Validator: fact-checks a generated document against the master resume.
//!
//! One completion call per validation. The service must answer with `VALID` or
//! `INVALID: <reason>`; anything else is a protocol error, not a verdict.

use thiserror::Error;
use tracing::{debug, info};

use crate::generation::prompts::build_validation_prompt;
use crate::llm_client::{LlmError, SamplingParams, TextGenerator};
use crate::models::DocumentKind;

/// Reason recorded in the retry accumulator when the validator breaks the response contract.
pub const PROTOCOL_VIOLATION_REASON: &str = "validator protocol violation";

/// Used when the validator answers `INVALID:` with nothing after it.
const UNSPECIFIED_REASON: &str = "validator flagged fabricated content without naming it";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    Valid,
    Invalid { reason: String },
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The service answered with something other than `VALID` / `INVALID:`.
    #[error("validator protocol violation: unexpected response {0:?}")]
    Protocol(String),
}

pub struct Validator<'a> {
    generator: &'a dyn TextGenerator,
    params: SamplingParams,
}

impl<'a> Validator<'a> {
    pub fn new(generator: &'a dyn TextGenerator, params: SamplingParams) -> Self {
        Self { generator, params }
    }

    pub async fn validate(
        &self,
        master: &str,
        candidate: &str,
        kind: DocumentKind,
    ) -> Result<ValidationVerdict, ValidationError> {
        let prompt = build_validation_prompt(kind, master, candidate);
        info!("Validating {kind} against master resume...");
        let response = self.generator.generate(&prompt, &self.params).await?;
        let verdict = parse_verdict(response.text())?;
        debug!("Validator verdict for {kind}: {verdict:?}");
        Ok(verdict)
    }
}

/// Parses a validator response into a verdict.
///
/// `VALID` must stand alone as a token (so `VALIDATED` is a protocol error);
/// `INVALID:` carries the reason after the colon.
pub fn parse_verdict(response: &str) -> Result<ValidationVerdict, ValidationError> {
    let response = response.trim_start();

    if let Some(rest) = response.strip_prefix("INVALID:") {
        let reason = rest.trim();
        let reason = if reason.is_empty() {
            UNSPECIFIED_REASON.to_string()
        } else {
            reason.to_string()
        };
        return Ok(ValidationVerdict::Invalid { reason });
    }

    if let Some(rest) = response.strip_prefix("VALID") {
        let boundary = rest.chars().next().map_or(true, |c| !c.is_alphanumeric());
        if boundary {
            return Ok(ValidationVerdict::Valid);
        }
    }

    Err(ValidationError::Protocol(
        response.chars().take(80).collect::<String>(),
    ))
}
