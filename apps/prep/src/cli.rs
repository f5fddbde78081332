//! Command-line surface: where the job text comes from and how results are printed.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};

use crate::errors::PipelineFailure;
use crate::pipeline::state::PipelineState;

/// Turn a job description into a summary and a list of interview questions.
#[derive(Debug, Parser)]
#[command(name = "interview-prep", version)]
pub struct Cli {
    /// Job description text. Read from stdin when no source is given.
    #[arg(conflicts_with_all = ["file", "sample_role"])]
    pub text: Option<String>,

    /// Read the job description from a file
    #[arg(short, long, conflicts_with = "sample_role")]
    pub file: Option<PathBuf>,

    /// Have the model write a sample posting for this role and use it as input
    #[arg(long)]
    pub sample_role: Option<String>,

    /// Print every turn of the conversation log after the questions
    #[arg(long)]
    pub show_messages: bool,

    /// Print the final state as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

/// Where the raw job text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSource {
    Inline(String),
    File(PathBuf),
    Sample(String),
    Stdin,
}

impl Cli {
    pub fn source(&self) -> JobSource {
        if let Some(text) = &self.text {
            JobSource::Inline(text.clone())
        } else if let Some(path) = &self.file {
            JobSource::File(path.clone())
        } else if let Some(role) = &self.sample_role {
            JobSource::Sample(role.clone())
        } else {
            JobSource::Stdin
        }
    }
}

/// Reads job text from any source that does not need the model.
pub fn read_job_text(source: &JobSource) -> Result<String> {
    match source {
        JobSource::Inline(text) => Ok(text.clone()),
        JobSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job description from {}", path.display())),
        JobSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read job description from stdin")?;
            Ok(buf)
        }
        JobSource::Sample(role) => {
            anyhow::bail!("Sample posting for '{role}' must be generated by the model")
        }
    }
}

/// One question per line, exactly as split by the question generator.
pub fn render_questions(state: &PipelineState) -> String {
    state
        .interview_questions()
        .map(|qs| qs.join("\n"))
        .unwrap_or_default()
}

/// The conversation log, one `[role]` header per turn.
pub fn render_messages(state: &PipelineState) -> String {
    state
        .messages()
        .iter()
        .map(|t| format!("[{}]\n{}", t.role, t.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn failure_json(failure: &PipelineFailure) -> Value {
    json!({
        "stage": failure.stage,
        "error": failure.error.to_string(),
        "state": failure.state,
    })
}
