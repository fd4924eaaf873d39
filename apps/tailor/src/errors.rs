use std::process::ExitCode;

use thiserror::Error;

use crate::llm_client::LlmError;
use crate::models::DocumentKind;
use crate::render::RenderError;

/// Application-level error type.
///
/// Attempt-scoped failures (transport, service, protocol, fabricated content) never
/// reach this type directly during generation: the orchestrator turns them into retry
/// fuel and only surfaces `AttemptsExhausted` once the budget is spent.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input error: {0}")]
    Input(String),

    #[error("Generation service error: {0}")]
    Llm(#[from] LlmError),

    #[error("{kind} generation failed after {attempts} attempts: {reason}")]
    AttemptsExhausted {
        kind: DocumentKind,
        attempts: u32,
        reason: String,
    },

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Every unrecoverable error maps to exit status 1.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::Input(_)
            | AppError::Llm(_)
            | AppError::AttemptsExhausted { .. }
            | AppError::Render(_)
            | AppError::Internal(_) => ExitCode::from(1),
        }
    }
}
