//! Retry Orchestrator: generate-then-validate loop for one document type.
//!
//! State machine per document:
//!
//! ```text
//! Attempting(n) ──Valid──────────────────────────────▶ Succeeded(text)
//!       │
//!       └─Invalid / service error / protocol error──▶ n < max ? Attempting(n+1) : Failed(reason)
//! ```
//!
//! Every rejection reason is appended to the document's accumulator and embedded in the
//! next generation prompt as a "do not repeat this claim" instruction. The accumulator
//! is local to one `run` call, so resume and cover letter never share it.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::{build_generation_prompt, FABRICATED_CLAIM};
use crate::generation::validator::{
    ValidationError, ValidationVerdict, Validator, PROTOCOL_VIOLATION_REASON,
};
use crate::llm_client::{SamplingParams, TextGenerator};
use crate::models::{DocumentKind, GenerationRequest, MasterDocument};

/// Attempt budget per document.
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    Attempting(u32),
    Succeeded(String),
    Failed(String),
}

/// Result of one generate-then-validate attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Accepted(String),
    Rejected(String),
}

/// Ordered rejection reasons for one document's generation.
#[derive(Debug, Default, Clone)]
pub struct FailureLog {
    reasons: Vec<String>,
}

impl FailureLog {
    pub fn record(&mut self, reason: impl Into<String>) {
        self.reasons.push(reason.into());
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

}

/// Pure state transition after attempt `attempt` produced `outcome`.
pub fn advance(
    attempt: u32,
    max_attempts: u32,
    outcome: AttemptOutcome,
    failures: &mut FailureLog,
) -> GenerationState {
    match outcome {
        AttemptOutcome::Accepted(text) => GenerationState::Succeeded(text),
        AttemptOutcome::Rejected(reason) => {
            failures.record(reason.clone());
            if attempt < max_attempts {
                GenerationState::Attempting(attempt + 1)
            } else {
                GenerationState::Failed(reason)
            }
        }
    }
}

/// A document that passed validation. Only the orchestrator can build one,
/// and the output layer only persists this type.
#[derive(Debug, Clone)]
pub struct ValidatedDocument {
    kind: DocumentKind,
    text: String,
    attempts: u32,
}

impl ValidatedDocument {
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// What to generate and against which target.
#[derive(Debug, Clone)]
pub struct DocumentTask<'a> {
    pub kind: DocumentKind,
    pub master: &'a MasterDocument,
    pub target_context: &'a str,
    /// Test-only: append a fabricated claim to attempt 1 before validation.
    pub inject_fabrication: bool,
}

pub struct RetryOrchestrator<'a> {
    generator: &'a dyn TextGenerator,
    validator: Validator<'a>,
    params: SamplingParams,
    max_attempts: u32,
}

impl<'a> RetryOrchestrator<'a> {
    pub fn new(
        generator: &'a dyn TextGenerator,
        generation_params: SamplingParams,
        validation_params: SamplingParams,
    ) -> Self {
        Self {
            generator,
            validator: Validator::new(generator, validation_params),
            params: generation_params,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Runs the state machine to a terminal state.
    ///
    /// Returns the validated document, or `AttemptsExhausted` naming the last reason.
    pub async fn run(&self, task: &DocumentTask<'_>) -> Result<ValidatedDocument, AppError> {
        let mut failures = FailureLog::default();
        let mut state = GenerationState::Attempting(1);

        loop {
            state = match state {
                GenerationState::Attempting(attempt) => {
                    let outcome = self.attempt(task, attempt, failures.reasons()).await;
                    if let AttemptOutcome::Rejected(reason) = &outcome {
                        warn!(
                            "{} attempt {}/{} rejected: {}",
                            task.kind, attempt, self.max_attempts, reason
                        );
                    }
                    advance(attempt, self.max_attempts, outcome, &mut failures)
                }
                GenerationState::Succeeded(text) => {
                    let attempts = failures.reasons().len() as u32 + 1;
                    info!("{} accepted on attempt {}", task.kind, attempts);
                    return Ok(ValidatedDocument {
                        kind: task.kind,
                        text,
                        attempts,
                    });
                }
                GenerationState::Failed(reason) => {
                    return Err(AppError::AttemptsExhausted {
                        kind: task.kind,
                        attempts: self.max_attempts,
                        reason,
                    });
                }
            };
        }
    }

    /// One generate-then-validate cycle. Every failure mode becomes a rejection reason.
    async fn attempt(
        &self,
        task: &DocumentTask<'_>,
        attempt: u32,
        prior_failures: &[String],
    ) -> AttemptOutcome {
        let request = GenerationRequest {
            source_text: task.master.text(),
            target_context: task.target_context,
            prior_failure_reasons: prior_failures,
            attempt_number: attempt,
        };
        let prompt = build_generation_prompt(task.kind, &request);

        info!(
            "Generating {} (attempt {}/{})...",
            task.kind, request.attempt_number, self.max_attempts
        );
        let generated = match self.generator.generate(&prompt, &self.params).await {
            Ok(result) => result.into_text(),
            Err(e) => return AttemptOutcome::Rejected(format!("generation failed: {e}")),
        };

        if generated.is_empty() {
            return AttemptOutcome::Rejected("generation service returned empty text".into());
        }

        let candidate = if task.inject_fabrication && attempt == 1 {
            warn!("Injecting fabricated claim into {} attempt 1", task.kind);
            format!("{generated}{FABRICATED_CLAIM}")
        } else {
            generated
        };

        match self
            .validator
            .validate(task.master.text(), &candidate, task.kind)
            .await
        {
            Ok(ValidationVerdict::Valid) => AttemptOutcome::Accepted(candidate),
            Ok(ValidationVerdict::Invalid { reason }) => AttemptOutcome::Rejected(reason),
            Err(ValidationError::Protocol(response)) => {
                warn!("Validator broke the response contract: {response:?}");
                AttemptOutcome::Rejected(PROTOCOL_VIOLATION_REASON.to_string())
            }
            Err(ValidationError::Llm(e)) => {
                AttemptOutcome::Rejected(format!("validation failed: {e}"))
            }
        }
    }
}
