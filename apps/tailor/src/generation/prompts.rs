// All prompt templates for the generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{
    render_prior_failures, GROUNDING_INSTRUCTION, PLAIN_OUTPUT_INSTRUCTION,
};
use crate::models::{DocumentKind, GenerationRequest};

/// Resume generation prompt.
/// Replace: {grounding_instruction}, {output_instruction}, {target}, {master}, {prior_failures}
pub const RESUME_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer. Tailor the applicant's master resume to the target role below.

{grounding_instruction}

HARD RULES:
1. Output plain Markdown text. No enclosing code fences.
2. Use `# ` for the applicant's name, `## ` for section titles, `### ` for entries (role, employer, dates), `- ` for bullets and `**text**` for emphasis. No other Markdown.
3. Only the professional summary may be rephrased freely toward the target role. Every other section reuses only content present in the master resume.
4. Omit any section for which the master resume has no relevant content. Never pad a section.
5. Copy the contact information line(s) exactly as formatted in the master resume.
6. A professional-experience entry with a single achievement is written as a plain paragraph, never as a one-item bullet list.
7. {output_instruction}

{prior_failures}

TARGET ROLE / JOB DESCRIPTION:
{target}

MASTER RESUME (source of truth):
{master}"#;

/// Cover letter generation prompt.
/// Replace: {grounding_instruction}, {output_instruction}, {target}, {master}, {prior_failures}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are an expert cover letter writer. Write a concise cover letter (three to four paragraphs) for the applicant and the target role below.

{grounding_instruction}

HARD RULES:
1. Plain text only. No Markdown syntax, no code fences.
2. You may state interest in the role and the company, but any statement about the applicant's skills, experience, projects, or credentials must be supported by the master resume.
3. Do not mention skills the job asks for unless the master resume shows them.
4. {output_instruction}

{prior_failures}

TARGET ROLE / JOB DESCRIPTION:
{target}

MASTER RESUME (source of truth):
{master}"#;

/// Job summary prompt. Replace: {target}
pub const JOB_SUMMARY_PROMPT_TEMPLATE: &str = r#"Summarize the job below for an applicant's records.

The FIRST two lines of your answer MUST be exactly:
Company: <company name, or Unknown>
Role: <job title, or Unknown>

Then a blank line, then a short summary: key responsibilities, required skills, nice-to-have skills, and location or work arrangement if stated. Plain text only, no code fences.

JOB:
{target}"#;

/// Validation prompt. Replace: {document_label}, {alignment_note}, {master}, {candidate}
pub const VALIDATION_PROMPT_TEMPLATE: &str = r#"You are a strict fact checker. Compare the CANDIDATE {document_label} against the MASTER RESUME.

Flag ONLY fabricated factual claims, meaning claims in the candidate that the master resume does not support:
- technologies, languages, tools, or skills not in the master resume
- invented or inflated years of experience
- invented projects, achievements, metrics, employers, titles, or certifications

Do NOT flag:
- omissions of master resume content
- reordering of content
- rephrasing or summarizing of supported facts
{alignment_note}

RESPONSE FORMAT (mandatory):
- If there are no fabricated claims, respond with exactly: VALID
- Otherwise respond with: INVALID: <one sentence naming each unsupported claim>
Do not write anything before VALID or INVALID:.

MASTER RESUME:
{master}

CANDIDATE {document_label}:
{candidate}"#;

/// Appended to the first cover-letter attempt when fabrication injection is enabled.
pub const FABRICATED_CLAIM: &str = "\n\nI also hold the Certified Galactic Cloud Architect credential \
and led a 40-person quantum computing team at NASA for six years.";

/// Builds the generation prompt for one attempt of the given document type.
pub fn build_generation_prompt(kind: DocumentKind, request: &GenerationRequest<'_>) -> String {
    let template = match kind {
        DocumentKind::Resume => RESUME_PROMPT_TEMPLATE,
        DocumentKind::CoverLetter => COVER_LETTER_PROMPT_TEMPLATE,
    };

    template
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{output_instruction}", PLAIN_OUTPUT_INSTRUCTION)
        .replace(
            "{prior_failures}",
            &render_prior_failures(request.prior_failure_reasons),
        )
        .replace("{target}", request.target_context.trim())
        .replace("{master}", request.source_text.trim())
}

/// Builds the fact-checking prompt for a candidate document.
pub fn build_validation_prompt(kind: DocumentKind, master: &str, candidate: &str) -> String {
    let (document_label, alignment_note) = match kind {
        DocumentKind::Resume => ("RESUME", ""),
        DocumentKind::CoverLetter => (
            "COVER LETTER",
            "- generic alignment statements such as \"I am applying for X\" or \"I am excited about your company\"",
        ),
    };

    VALIDATION_PROMPT_TEMPLATE
        .replace("{document_label}", document_label)
        .replace("{alignment_note}", alignment_note)
        .replace("{master}", master.trim())
        .replace("{candidate}", candidate.trim())
}

pub fn build_job_summary_prompt(target: &str) -> String {
    JOB_SUMMARY_PROMPT_TEMPLATE.replace("{target}", target.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(reasons: &'a [String]) -> GenerationRequest<'a> {
        GenerationRequest {
            source_text: "# Jane Doe\n## Skills\nPython, Go",
            target_context: "Senior Rust Engineer at Acme",
            prior_failure_reasons: reasons,
            attempt_number: 1,
        }
    }

    #[test]
    fn test_resume_prompt_fills_every_placeholder() {
        let prompt = build_generation_prompt(DocumentKind::Resume, &request(&[]));
        assert!(!prompt.contains("{master}"));
        assert!(!prompt.contains("{target}"));
        assert!(!prompt.contains("{prior_failures}"));
        assert!(!prompt.contains("{grounding_instruction}"));
        assert!(prompt.contains("Python, Go"));
        assert!(prompt.contains("Senior Rust Engineer at Acme"));
    }

    #[test]
    fn test_resume_prompt_carries_content_rules() {
        let prompt = build_generation_prompt(DocumentKind::Resume, &request(&[]));
        assert!(prompt.contains("No enclosing code fences"));
        assert!(prompt.contains("Omit any section"));
        assert!(prompt.contains("contact information"));
        assert!(prompt.contains("single achievement is written as a plain paragraph"));
    }

    #[test]
    fn test_prompt_embeds_prior_failures() {
        let reasons = vec!["Rust is not in the master resume".to_string()];
        let prompt = build_generation_prompt(DocumentKind::CoverLetter, &request(&reasons));
        assert!(prompt.contains("Do not repeat this claim: Rust is not in the master resume"));
    }

    #[test]
    fn test_validation_prompt_cover_letter_allows_alignment_statements() {
        let prompt = build_validation_prompt(DocumentKind::CoverLetter, "master", "letter");
        assert!(prompt.contains("I am applying for X"));
        assert!(prompt.contains("CANDIDATE COVER LETTER"));
        assert!(prompt.contains("INVALID:"));
    }

    #[test]
    fn test_validation_prompt_resume_has_master_and_candidate() {
        let prompt =
            build_validation_prompt(DocumentKind::Resume, "Python, Go", "Python, Go, Rust");
        assert!(prompt.contains("MASTER RESUME:\nPython, Go"));
        assert!(prompt.contains("CANDIDATE RESUME:\nPython, Go, Rust"));
        assert!(!prompt.contains("{alignment_note}"));
    }
}
