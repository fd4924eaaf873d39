//! One application run: job summary, resume, optional cover letter.
//!
//! Steps run sequentially. A document that exhausts its attempts is recorded as a
//! failure and the run moves on; anything else (summary, filesystem, PDF) aborts.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{error, info};

use crate::errors::AppError;
use crate::generation::job_summary::summarize_job;
use crate::generation::orchestrator::{DocumentTask, RetryOrchestrator, ValidatedDocument};
use crate::layout::{layout_markdown, PageGeometry, StyleSheet};
use crate::llm_client::{SamplingParams, TextGenerator};
use crate::models::{DocumentKind, MasterDocument};
use crate::output::ApplicationFolder;

#[derive(Debug, Clone)]
pub struct ApplicationRequest<'a> {
    pub master: &'a MasterDocument,
    pub target_context: &'a str,
    pub applicant_name: &'a str,
    pub output_dir: &'a Path,
    pub role_hint: Option<&'a str>,
    pub cover_letter: bool,
    /// Test-only: poison the first cover-letter attempt.
    pub inject_fabrication: bool,
    pub date: NaiveDate,
}

#[derive(Debug, Default)]
pub struct ApplicationReport {
    pub folder: PathBuf,
    pub written: Vec<PathBuf>,
    pub failures: Vec<(DocumentKind, String)>,
}

impl ApplicationReport {
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

pub async fn run_application(
    generator: &dyn TextGenerator,
    generation_params: SamplingParams,
    validation_params: SamplingParams,
    request: &ApplicationRequest<'_>,
) -> Result<ApplicationReport, AppError> {
    let summary = summarize_job(
        generator,
        &generation_params,
        request.target_context,
        request.role_hint,
    )
    .await?;
    info!("Target: {} at {}", summary.role, summary.company);

    let folder = ApplicationFolder::new(
        request.output_dir,
        request.applicant_name,
        &summary.company,
        &summary.role,
        request.date,
    );
    folder.create().await?;

    let mut report = ApplicationReport {
        folder: folder.dir().to_path_buf(),
        ..Default::default()
    };
    report.written.push(folder.write_job_summary(&summary.text).await?);

    let orchestrator = RetryOrchestrator::new(generator, generation_params, validation_params);

    let resume = DocumentTask {
        kind: DocumentKind::Resume,
        master: request.master,
        target_context: request.target_context,
        inject_fabrication: false,
    };
    if let Some(document) = settle(&orchestrator, &resume, &mut report).await? {
        report.written.push(folder.write_document(&document).await?);
        let rendered = layout_markdown(
            document.text(),
            &StyleSheet::default(),
            &PageGeometry::default(),
        );
        report.written.push(folder.write_resume_pdf(&rendered).await?);
    }

    if request.cover_letter {
        let letter = DocumentTask {
            kind: DocumentKind::CoverLetter,
            master: request.master,
            target_context: request.target_context,
            inject_fabrication: request.inject_fabrication,
        };
        if let Some(document) = settle(&orchestrator, &letter, &mut report).await? {
            report.written.push(folder.write_document(&document).await?);
        }
    }

    Ok(report)
}

/// Runs one document. Exhaustion is recorded on the report; other errors propagate.
async fn settle(
    orchestrator: &RetryOrchestrator<'_>,
    task: &DocumentTask<'_>,
    report: &mut ApplicationReport,
) -> Result<Option<ValidatedDocument>, AppError> {
    match orchestrator.run(task).await {
        Ok(document) => Ok(Some(document)),
        Err(e @ AppError::AttemptsExhausted { .. }) => {
            error!("{e}");
            report.failures.push((task.kind, e.to_string()));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
