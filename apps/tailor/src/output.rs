//! Application folder on disk: one directory per (company, role, date).
//!
//! Only `ValidatedDocument`s can be written as resume or cover-letter files; the job
//! summary is written as plain text because it makes no claims about the applicant.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;

use crate::errors::AppError;
use crate::generation::orchestrator::ValidatedDocument;
use crate::layout::FinalDocument;
use crate::models::DocumentKind;
use crate::render::write_pdf;

const UNKNOWN_SLUG: &str = "unknown";

/// Lowercase ASCII alphanumerics; every other run collapses to a single `-`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        UNKNOWN_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct ApplicationFolder {
    dir: PathBuf,
    person: String,
    role: String,
    company: String,
    date: NaiveDate,
}

impl ApplicationFolder {
    /// Computes the folder path without touching the filesystem.
    pub fn new(
        output_dir: &Path,
        person: &str,
        company: &str,
        role: &str,
        date: NaiveDate,
    ) -> Self {
        let company = slugify(company);
        let role = slugify(role);
        let dir = output_dir.join(format!("{company}-{role}-{date}"));
        Self {
            dir,
            person: slugify(person),
            role,
            company,
            date,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `{kind}-{person}-{role}-{company}-{date}.{ext}`
    pub fn file_name(&self, kind: &str, ext: &str) -> String {
        format!(
            "{kind}-{}-{}-{}-{}.{ext}",
            self.person, self.role, self.company, self.date
        )
    }

    pub fn path_for(&self, kind: &str, ext: &str) -> PathBuf {
        self.dir.join(self.file_name(kind, ext))
    }

    pub async fn create(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        Ok(())
    }

    pub async fn write_job_summary(&self, text: &str) -> Result<PathBuf, AppError> {
        let path = self.path_for("job-summary", "txt");
        write_text(&path, text).await?;
        Ok(path)
    }

    /// Resumes are saved as Markdown (the PDF source), cover letters as plain text.
    pub async fn write_document(
        &self,
        document: &ValidatedDocument,
    ) -> Result<PathBuf, AppError> {
        let ext = match document.kind() {
            DocumentKind::Resume => "md",
            DocumentKind::CoverLetter => "txt",
        };
        let path = self.path_for(document.kind().slug(), ext);
        write_text(&path, document.text()).await?;
        info!(
            "{} kept after {} attempt(s)",
            document.kind(),
            document.attempts()
        );
        Ok(path)
    }

    pub async fn write_resume_pdf(&self, rendered: &FinalDocument) -> Result<PathBuf, AppError> {
        let path = self.path_for(DocumentKind::Resume.slug(), "pdf");
        let title = format!("Resume - {}", self.person);
        write_pdf(rendered, &title, &path).await?;
        info!("Saved {}", path.display());
        Ok(path)
    }
}

async fn write_text(path: &Path, text: &str) -> Result<(), AppError> {
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {}", path.display());
    Ok(())
}
