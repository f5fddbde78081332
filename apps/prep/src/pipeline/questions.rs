//! Question generator — turns the summary into a list of interview questions.

use tracing::info;

use crate::errors::PipelineError;
use crate::llm_client::ChatModel;
use crate::pipeline::prompts::QUESTIONS_SYSTEM;
use crate::pipeline::state::PipelineState;
use crate::pipeline::{invoke, Stage};

/// Splits a raw reply into entries, one per line.
///
/// Purely mechanical: nothing is trimmed or filtered, so blank lines and
/// non-question text come through as entries of their own.
pub fn split_questions(raw: &str) -> Vec<String> {
    raw.split('\n').map(str::to_string).collect()
}

pub async fn generate_questions(
    model: &dyn ChatModel,
    state: &PipelineState,
) -> Result<PipelineState, PipelineError> {
    let summary = state.job_summary().ok_or(PipelineError::Precondition {
        stage: Stage::QuestionGenerator,
        missing: "job summary",
    })?;

    let raw = invoke(model, QUESTIONS_SYSTEM, summary, None)
        .await?
        .into_text();
    let questions = split_questions(&raw);

    info!(count = questions.len(), "Generated interview questions");
    state.with_questions(raw, questions)
}
