use thiserror::Error;

use crate::llm_client::LlmError;
use crate::pipeline::state::PipelineState;
use crate::pipeline::Stage;

/// Why a single stage could not produce its output.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The reply could not be read as the requested structured shape.
    #[error("Decoding error ({shape}): {reason}")]
    Decoding { shape: &'static str, reason: String },

    /// The model call itself failed (transport, quota, timeout, empty reply).
    #[error("Completion error: {0}")]
    Completion(LlmError),

    /// A stage ran before its predecessor's output existed.
    #[error("Precondition failed: {stage} requires {missing}")]
    Precondition { stage: Stage, missing: &'static str },
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Decode { shape, reason } => PipelineError::Decoding { shape, reason },
            other => PipelineError::Completion(other),
        }
    }
}

/// Terminal failure of a pipeline run.
///
/// Carries the stage that failed and the state as it stood when that stage
/// was invoked, so callers can inspect whatever had already been produced.
/// The cause is folded into the message rather than exposed as a source, so
/// error reporters print it once.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {error}")]
pub struct PipelineFailure {
    pub stage: Stage,
    pub error: PipelineError,
    pub state: PipelineState,
}
