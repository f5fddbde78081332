//! Summarizer — turns a `JobBreakdown` into a prose summary.

use tracing::info;

use crate::errors::PipelineError;
use crate::llm_client::ChatModel;
use crate::pipeline::prompts::SUMMARY_SYSTEM;
use crate::pipeline::state::PipelineState;
use crate::pipeline::{invoke, Stage};

pub async fn summarize(
    model: &dyn ChatModel,
    state: &PipelineState,
) -> Result<PipelineState, PipelineError> {
    let breakdown = state.job_breakdown().ok_or(PipelineError::Precondition {
        stage: Stage::Summarizer,
        missing: "job breakdown",
    })?;

    let summary = invoke(model, SUMMARY_SYSTEM, &breakdown.to_string(), None)
        .await?
        .into_text();

    info!(chars = summary.len(), "Generated job summary");
    state.with_summary(summary)
}
