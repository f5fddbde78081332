//! Sample postings for trying the pipeline without a real job description.

use tracing::info;

use crate::llm_client::{ChatModel, LlmError};
use crate::models::turn::Turn;
use crate::pipeline::prompts::{SAMPLE_POSTING_PROMPT_TEMPLATE, SAMPLE_POSTING_SYSTEM};

/// Asks the model to write a plausible posting for `role`.
///
/// This runs before the pipeline and its turns are not part of the run's log.
pub async fn generate_sample_posting(
    model: &dyn ChatModel,
    role: &str,
) -> Result<String, LlmError> {
    let prompt = SAMPLE_POSTING_PROMPT_TEMPLATE.replace("{role}", role);
    let turns = [Turn::system(SAMPLE_POSTING_SYSTEM), Turn::human(prompt)];

    let posting = model.complete(&turns, None).await?.into_text();
    info!(role, chars = posting.len(), "Generated sample posting");
    Ok(posting)
}
