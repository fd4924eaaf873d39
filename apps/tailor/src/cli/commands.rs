// Subcommand handlers. `main` maps their errors to exit status 1.

use anyhow::Context;
use tracing::{error, info};

use crate::cli::{read_until_end, ConvertArgs, GenerateArgs, END_MARKER};
use crate::config::Config;
use crate::errors::AppError;
use crate::generation::pipeline::{run_application, ApplicationReport, ApplicationRequest};
use crate::layout::{layout_markdown, PageGeometry, StyleSheet};
use crate::llm_client::{LlmClient, SamplingParams};
use crate::models::MasterDocument;
use crate::render::write_pdf;

pub async fn generate(args: GenerateArgs) -> Result<ApplicationReport, AppError> {
    let config = Config::from_env().map_err(|e| AppError::Input(format!("{e:#}")))?;

    let master_path = args
        .master
        .clone()
        .unwrap_or_else(|| config.master_resume_path.clone());
    let master = MasterDocument::load(&master_path).await?;
    info!("Loaded master resume from {}", master_path.display());

    let target = match &args.role {
        Some(role) => format!("Target role: {role}"),
        None => read_job_description().await?,
    };
    if target.trim().is_empty() {
        return Err(AppError::Input("Job description is empty".to_string()));
    }

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    let client = LlmClient::new(&config.llm)?;

    let request = ApplicationRequest {
        master: &master,
        target_context: &target,
        applicant_name: &config.applicant_name,
        output_dir: &output_dir,
        role_hint: args.role.as_deref(),
        cover_letter: args.cover_letter,
        inject_fabrication: args.inject_fabrication,
        date: chrono::Local::now().date_naive(),
    };
    let report = run_application(
        &client,
        SamplingParams::for_generation(&config.llm),
        SamplingParams::for_validation(&config.llm),
        &request,
    )
    .await?;

    if report.succeeded() {
        info!("Application saved to {}", report.folder.display());
    } else {
        for (kind, reason) in &report.failures {
            error!("No {kind} was saved: {reason}");
        }
    }
    Ok(report)
}

async fn read_job_description() -> Result<String, AppError> {
    eprintln!("Paste the job description, then a line containing only {END_MARKER}:");
    let text = tokio::task::spawn_blocking(|| read_until_end(std::io::stdin().lock()))
        .await
        .context("stdin reader task failed")?
        .context("Failed to read job description from stdin")?;
    Ok(text)
}

pub async fn convert(args: ConvertArgs) -> Result<(), AppError> {
    let (input, output) = args.resolve().map_err(AppError::Input)?;
    let markdown = tokio::fs::read_to_string(&input)
        .await
        .map_err(|e| AppError::Input(format!("Cannot read {}: {e}", input.display())))?;

    let document = layout_markdown(&markdown, &StyleSheet::default(), &PageGeometry::default());
    let title = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Resume".to_string());
    write_pdf(&document, &title, &output).await?;

    info!(
        "Converted {} -> {} ({} page(s))",
        input.display(),
        output.display(),
        document.pages.len()
    );
    Ok(())
}
