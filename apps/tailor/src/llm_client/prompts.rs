// Shared prompt fragments used by more than one generation prompt.
// Each document prompt lives in generation/prompts.rs.

/// Output-format rule shared by every document prompt.
pub const PLAIN_OUTPUT_INSTRUCTION: &str = "\
    Return ONLY the document text. \
    Do NOT wrap it in markdown code fences. \
    Do NOT add commentary, notes, or explanations before or after it.";

/// Grounding rule shared by resume and cover-letter prompts.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every factual claim (skills, technologies, employers, titles, dates, years of \
    experience, projects, achievements, certifications, education) must come from the \
    MASTER RESUME below. Do NOT infer, interpolate, or invent details. \
    If the master resume does not support a claim, leave it out.";

/// Header placed above the enumerated reasons earlier attempts were rejected.
pub const PRIOR_FAILURES_HEADER: &str = "\
    PREVIOUS ATTEMPTS WERE REJECTED by a fact checker. \
    Each item below is a separate instruction. Do NOT repeat these claims:";

/// Renders accumulated failure reasons as numbered "do not repeat" instructions.
/// Returns an empty string when there are none.
pub fn render_prior_failures(reasons: &[String]) -> String {
    if reasons.is_empty() {
        return String::new();
    }

    let items = reasons
        .iter()
        .enumerate()
        .map(|(i, reason)| format!("{}. Do not repeat this claim: {}", i + 1, reason.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{PRIOR_FAILURES_HEADER}\n{items}")
}
