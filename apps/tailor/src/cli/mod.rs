// Command-line surface: `generate` and `convert`.

pub mod commands;

use std::io::BufRead;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Line that ends interactive job-description input.
pub const END_MARKER: &str = "END";

#[derive(Parser, Debug)]
#[command(name = "tailor", version)]
#[command(about = "Tailor a master resume and cover letter to a job, then render a PDF")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a validated resume (and optionally a cover letter) for one job
    Generate(GenerateArgs),

    /// Convert a Markdown resume to PDF
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Target role; when omitted the job description is read from stdin
    #[arg(long)]
    pub role: Option<String>,

    /// Also generate a cover letter
    #[arg(long)]
    pub cover_letter: bool,

    /// Master resume path (overrides MASTER_RESUME_PATH)
    #[arg(long)]
    pub master: Option<PathBuf>,

    /// Output root directory (overrides OUTPUT_DIR)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Append a fabricated claim to the first cover-letter attempt
    #[arg(long, hide = true)]
    pub inject_fabrication: bool,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Markdown file to convert
    pub input: PathBuf,

    /// Output PDF path; defaults to the input with a .pdf extension
    pub output: Option<PathBuf>,
}

impl ConvertArgs {
    /// Checks the input and resolves the output path. Nothing is created on error.
    pub fn resolve(&self) -> Result<(PathBuf, PathBuf), String> {
        if !self.input.is_file() {
            return Err(format!("Input file not found: {}", self.input.display()));
        }
        let is_markdown = self
            .input
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
        if !is_markdown {
            return Err(format!("Input must be a .md file: {}", self.input.display()));
        }
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("pdf"));
        Ok((self.input.clone(), output))
    }
}

/// Reads lines until one that is exactly `END` (after trimming) or EOF.
pub fn read_until_end<R: BufRead>(reader: R) -> std::io::Result<String> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim() == END_MARKER {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n").trim().to_string())
}
