//! Pipeline state — the single value threaded through every stage.
//!
//! Fields are private: the only way to fill a later field is through a
//! constructor that checks the earlier one, so a summary can never exist
//! without a breakdown and questions never without a summary. Each
//! constructor returns a new state; the previous one is left untouched.

use serde::Serialize;

use crate::errors::PipelineError;
use crate::models::job::JobBreakdown;
use crate::models::turn::{Role, Turn};
use crate::pipeline::Stage;

/// How far a state has progressed. `Failed` is not a phase of the state
/// itself; it is the `PipelineFailure` error wrapping the last good state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Phase {
    Start,
    Extracted,
    Summarized,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineState {
    messages: Vec<Turn>,
    job_breakdown: Option<JobBreakdown>,
    job_summary: Option<String>,
    interview_questions: Option<Vec<String>>,
}

impl PipelineState {
    /// A fresh state whose log holds one human turn with the raw job text.
    pub fn seeded(raw_job_text: impl Into<String>) -> Self {
        Self {
            messages: vec![Turn::human(raw_job_text)],
            job_breakdown: None,
            job_summary: None,
            interview_questions: None,
        }
    }

    pub fn messages(&self) -> &[Turn] {
        &self.messages
    }

    pub fn job_breakdown(&self) -> Option<&JobBreakdown> {
        self.job_breakdown.as_ref()
    }

    pub fn job_summary(&self) -> Option<&str> {
        self.job_summary.as_deref()
    }

    pub fn interview_questions(&self) -> Option<&[String]> {
        self.interview_questions.as_deref()
    }

    pub fn last_human_turn(&self) -> Option<&Turn> {
        self.messages.iter().rev().find(|t| t.role == Role::Human)
    }

    pub fn phase(&self) -> Phase {
        if self.interview_questions.is_some() {
            Phase::Complete
        } else if self.job_summary.is_some() {
            Phase::Summarized
        } else if self.job_breakdown.is_some() {
            Phase::Extracted
        } else {
            Phase::Start
        }
    }

    /// Records the extractor's output and appends its rendering to the log.
    pub fn with_breakdown(&self, breakdown: JobBreakdown) -> Self {
        let mut next = self.clone();
        next.messages.push(Turn::assistant(breakdown.to_string()));
        next.job_breakdown = Some(breakdown);
        next
    }

    /// Records the summarizer's output. Requires a breakdown.
    pub fn with_summary(&self, summary: String) -> Result<Self, PipelineError> {
        if self.job_breakdown.is_none() {
            return Err(PipelineError::Precondition {
                stage: Stage::Summarizer,
                missing: "job breakdown",
            });
        }

        let mut next = self.clone();
        next.messages.push(Turn::assistant(summary.clone()));
        next.job_summary = Some(summary);
        Ok(next)
    }

    /// Records the question generator's output. Requires a summary.
    ///
    /// `raw_response` goes into the log unsplit; `questions` is stored as given.
    pub fn with_questions(
        &self,
        raw_response: String,
        questions: Vec<String>,
    ) -> Result<Self, PipelineError> {
        if self.job_summary.is_none() {
            return Err(PipelineError::Precondition {
                stage: Stage::QuestionGenerator,
                missing: "job summary",
            });
        }

        let mut next = self.clone();
        next.messages.push(Turn::assistant(raw_response));
        next.interview_questions = Some(questions);
        Ok(next)
    }
}
