//! Extractor — turns the latest human turn into a structured `JobBreakdown`.

use tracing::info;

use crate::errors::PipelineError;
use crate::llm_client::{ChatModel, FieldSpec, OutputShape};
use crate::models::job::JobBreakdown;
use crate::pipeline::prompts::EXTRACT_SYSTEM;
use crate::pipeline::state::PipelineState;
use crate::pipeline::{invoke, Stage};

/// Structured target shape requested from the model.
pub const JOB_BREAKDOWN_SHAPE: OutputShape = OutputShape {
    name: "JobBreakdown",
    fields: &[
        FieldSpec {
            name: "title",
            aliases: &["job_title"],
            description: "The title of the position given.",
        },
        FieldSpec {
            name: "description",
            aliases: &["job_description"],
            description: "A description of the position given.",
        },
        FieldSpec {
            name: "requirements",
            aliases: &["job_requirements"],
            description: "A list of requirements for the position given.",
        },
    ],
};

pub async fn extract(
    model: &dyn ChatModel,
    state: &PipelineState,
) -> Result<PipelineState, PipelineError> {
    let posting = state
        .last_human_turn()
        .ok_or(PipelineError::Precondition {
            stage: Stage::Extractor,
            missing: "a human turn",
        })?;

    let value = invoke(
        model,
        EXTRACT_SYSTEM,
        &posting.content,
        Some(&JOB_BREAKDOWN_SHAPE),
    )
    .await?
    .into_structured(&JOB_BREAKDOWN_SHAPE)?;

    let breakdown: JobBreakdown =
        serde_json::from_value(value).map_err(|e| PipelineError::Decoding {
            shape: JOB_BREAKDOWN_SHAPE.name,
            reason: e.to_string(),
        })?;

    info!(title = %breakdown.title, "Extracted job breakdown");
    Ok(state.with_breakdown(breakdown))
}
