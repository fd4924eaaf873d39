use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// The document types produced by a run. Each one gets its own retry accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    /// Slug used in file names: `resume-…`, `cover-letter-…`.
    pub fn slug(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover-letter",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Resume => f.write_str("resume"),
            DocumentKind::CoverLetter => f.write_str("cover letter"),
        }
    }
}

/// The applicant's authoritative resume. Loaded once, never mutated.
#[derive(Debug, Clone)]
pub struct MasterDocument {
    text: String,
}

impl MasterDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Reads the master resume from disk. A missing or blank file is an input error.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Input(format!(
                "Cannot read master resume at {}: {e}",
                path.display()
            ))
        })?;

        if text.trim().is_empty() {
            return Err(AppError::Input(format!(
                "Master resume at {} is empty",
                path.display()
            )));
        }

        Ok(Self::new(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Everything one generation attempt needs. Built fresh for every attempt.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    pub source_text: &'a str,
    /// Job description or role string the document is tailored to.
    pub target_context: &'a str,
    /// Reasons earlier attempts for this document were rejected, oldest first.
    pub prior_failure_reasons: &'a [String],
    pub attempt_number: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_missing_master_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MasterDocument::load(&dir.path().join("nope.md")).await;
        assert!(matches!(result, Err(AppError::Input(_))));
    }

    #[tokio::test]
    async fn test_load_blank_master_is_input_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "   ").unwrap();
        let result = MasterDocument::load(file.path()).await;
        assert!(matches!(result, Err(AppError::Input(_))));
    }

    #[tokio::test]
    async fn test_load_reads_text_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# Jane Doe\n\n## Skills\nPython, Go\n").unwrap();
        let master = MasterDocument::load(file.path()).await.unwrap();
        assert!(master.text().contains("Python, Go"));
    }

    #[test]
    fn test_kind_slugs() {
        assert_eq!(DocumentKind::Resume.slug(), "resume");
        assert_eq!(DocumentKind::CoverLetter.slug(), "cover-letter");
        assert_eq!(DocumentKind::CoverLetter.to_string(), "cover letter");
    }
}
