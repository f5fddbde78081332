//! Interview prep pipeline: Extractor → Summarizer → Question Generator.
//!
//! Strictly sequential. Each stage reads the previous stage's output from the
//! state, makes exactly one model call, and returns a new state with one more
//! assistant turn in the log. The first failure ends the run.

use std::fmt;

use serde::Serialize;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::{PipelineError, PipelineFailure};
use crate::llm_client::{ChatModel, Completion, OutputShape};
use crate::models::turn::Turn;

pub mod extractor;
pub mod prompts;
pub mod questions;
pub mod sample;
pub mod state;
pub mod summarizer;

use state::PipelineState;

/// Identity of a pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extractor,
    Summarizer,
    QuestionGenerator,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Extractor => "extractor",
            Stage::Summarizer => "summarizer",
            Stage::QuestionGenerator => "question generator",
        };
        f.write_str(label)
    }
}

impl Stage {
    async fn run(
        self,
        model: &dyn ChatModel,
        state: &PipelineState,
    ) -> Result<PipelineState, PipelineError> {
        match self {
            Stage::Extractor => extractor::extract(model, state).await,
            Stage::Summarizer => summarizer::summarize(model, state).await,
            Stage::QuestionGenerator => questions::generate_questions(model, state).await,
        }
    }
}

/// Sends one instruction plus one user turn to the model.
///
/// Every stage goes through here; they differ only in instruction, input and
/// whether a structured shape is requested.
pub(crate) async fn invoke(
    model: &dyn ChatModel,
    instruction: &str,
    input: &str,
    shape: Option<&OutputShape>,
) -> Result<Completion, PipelineError> {
    let turns = [Turn::system(instruction), Turn::human(input)];
    Ok(model.complete(&turns, shape).await?)
}

/// Runs the full pipeline over one raw job description.
///
/// Seeds the log with a single human turn holding `raw_job_text`. On failure the
/// returned `PipelineFailure` carries the stage that failed and the state as it
/// was handed to that stage.
///
/// The text is not validated; blank input is sent as-is and the API's
/// rejection surfaces as a `Completion` error from the extractor.
pub async fn run_pipeline(
    model: &dyn ChatModel,
    raw_job_text: &str,
) -> Result<PipelineState, PipelineFailure> {
    let run_id = Uuid::new_v4();
    let span = info_span!("pipeline_run", %run_id);

    async move {
        info!(input_chars = raw_job_text.len(), "Pipeline started");
        let state = PipelineState::seeded(raw_job_text);

        let state = step(model, Stage::Extractor, state).await?;
        let state = step(model, Stage::Summarizer, state).await?;
        let state = step(model, Stage::QuestionGenerator, state).await?;

        info!(messages = state.messages().len(), "Pipeline complete");
        Ok::<_, PipelineFailure>(state)
    }
    .instrument(span)
    .await
}

async fn step(
    model: &dyn ChatModel,
    stage: Stage,
    state: PipelineState,
) -> Result<PipelineState, PipelineFailure> {
    info!(%stage, "Stage started");
    match stage.run(model, &state).await {
        Ok(next) => Ok(next),
        Err(err) => {
            error!(%stage, phase = ?state.phase(), "Stage failed: {err}");
            Err(PipelineFailure {
                stage,
                error: err,
                state,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::scripted::{overloaded, ScriptedModel};
    use crate::models::turn::Role;
    use crate::pipeline::state::Phase;

    const SCENARIO_INPUT: &str =
        "Senior Backend Engineer, 5 years Go experience, distributed systems";

    const BREAKDOWN_JSON: &str = r#"{
        "title": "Senior Backend Engineer",
        "description": "Design, build and operate distributed backend services written in Go.",
        "requirements": "5+ years of Go; experience with distributed systems"
    }"#;

    const SUMMARY: &str = "The Senior Backend Engineer designs and operates distributed Go services \
        and needs five years of Go plus distributed systems experience.";

    const QUESTIONS: &str = "Tell me about a time you debugged a production outage.\n\
        How would you design a rate limiter for a distributed Go service?\n\
        Explain how goroutines differ from OS threads.";

    fn happy_model() -> ScriptedModel {
        ScriptedModel::replying(&[BREAKDOWN_JSON, SUMMARY, QUESTIONS])
    }

    fn assert_structurally_valid(result: &Result<PipelineState, PipelineFailure>) {
        match result {
            Ok(state) => {
                assert_eq!(state.phase(), Phase::Complete);
                assert!(state.job_breakdown().is_some());
                assert!(state.job_summary().is_some());
                assert!(state.interview_questions().is_some());
                assert_eq!(state.messages().len(), 4);
            }
            Err(failure) => {
                let state = &failure.state;
                if state.job_summary().is_some() {
                    assert!(state.job_breakdown().is_some());
                }
                if state.interview_questions().is_some() {
                    assert!(state.job_summary().is_some());
                }
            }
        }
    }

    #[tokio::test]
    async fn test_scenario_senior_backend_engineer() {
        let model = happy_model();

        let state = run_pipeline(&model, SCENARIO_INPUT).await.unwrap();

        let breakdown = state.job_breakdown().unwrap();
        assert!(!breakdown.title.is_empty());
        assert!(!breakdown.description.is_empty());
        assert!(!breakdown.requirements.is_empty());

        let summary = state.job_summary().unwrap();
        assert!(summary.contains("Senior Backend Engineer"));

        let questions = state.interview_questions().unwrap();
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().all(|q| !q.is_empty()));

        assert_eq!(model.calls().len(), 3);
        assert_eq!(model.remaining(), 0);
    }

    #[tokio::test]
    async fn test_message_log_is_seed_then_one_turn_per_stage() {
        let model = happy_model();

        let state = run_pipeline(&model, SCENARIO_INPUT).await.unwrap();

        let roles: Vec<Role> = state.messages().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::Human, Role::Assistant, Role::Assistant, Role::Assistant]
        );
        assert_eq!(state.messages()[0].content, SCENARIO_INPUT);
        assert_eq!(
            state.messages()[1].content,
            state.job_breakdown().unwrap().to_string()
        );
        assert_eq!(state.messages()[2].content, SUMMARY);
        assert_eq!(state.messages()[3].content, QUESTIONS);
    }

    #[tokio::test]
    async fn test_each_stage_consumes_previous_output() {
        let model = happy_model();

        let state = run_pipeline(&model, SCENARIO_INPUT).await.unwrap();

        let calls = model.calls();
        assert_eq!(calls[0].turns[1].content, SCENARIO_INPUT);
        assert_eq!(
            calls[1].turns[1].content,
            state.job_breakdown().unwrap().to_string()
        );
        assert_eq!(calls[2].turns[1].content, SUMMARY);
    }

    #[tokio::test]
    async fn test_questions_are_split_verbatim() {
        let model = ScriptedModel::replying(&[BREAKDOWN_JSON, SUMMARY, "Q1\nQ2\n\nQ3"]);

        let state = run_pipeline(&model, SCENARIO_INPUT).await.unwrap();
        assert_eq!(
            state.interview_questions().unwrap(),
            ["Q1", "Q2", "", "Q3"]
        );
    }

    #[tokio::test]
    async fn test_extractor_failure_leaves_only_seed() {
        let model = ScriptedModel::new(vec![Err(overloaded())]);

        let failure = run_pipeline(&model, SCENARIO_INPUT).await.unwrap_err();

        assert_eq!(failure.stage, Stage::Extractor);
        assert!(matches!(failure.error, PipelineError::Completion(_)));
        assert_eq!(failure.state.phase(), Phase::Start);
        assert!(failure.state.job_breakdown().is_none());
        assert!(failure.state.job_summary().is_none());
        assert!(failure.state.interview_questions().is_none());
        assert_eq!(failure.state.messages(), &[Turn::human(SCENARIO_INPUT)]);
        assert_eq!(model.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_extractor_decoding_failure_stops_run() {
        let model = ScriptedModel::replying(&["I could not find a job in there.", SUMMARY]);

        let failure = run_pipeline(&model, SCENARIO_INPUT).await.unwrap_err();

        assert_eq!(failure.stage, Stage::Extractor);
        assert!(matches!(failure.error, PipelineError::Decoding { .. }));
        assert!(failure.state.job_breakdown().is_none());
        assert_eq!(model.remaining(), 1);
    }

    #[tokio::test]
    async fn test_summarizer_failure_keeps_breakdown() {
        let model = ScriptedModel::new(vec![Ok(BREAKDOWN_JSON.to_string()), Err(overloaded())]);

        let failure = run_pipeline(&model, SCENARIO_INPUT).await.unwrap_err();

        assert_eq!(failure.stage, Stage::Summarizer);
        assert_eq!(failure.state.phase(), Phase::Extracted);
        assert!(failure.state.job_breakdown().is_some());
        assert!(failure.state.job_summary().is_none());
        assert_eq!(failure.state.messages().len(), 2);
        assert_eq!(
            failure.to_string(),
            "summarizer stage failed: Completion error: API error (status 529): Overloaded"
        );
    }

    #[tokio::test]
    async fn test_question_generator_failure_keeps_summary() {
        let model = ScriptedModel::new(vec![
            Ok(BREAKDOWN_JSON.to_string()),
            Ok(SUMMARY.to_string()),
            Err(overloaded()),
        ]);

        let failure = run_pipeline(&model, SCENARIO_INPUT).await.unwrap_err();

        assert_eq!(failure.stage, Stage::QuestionGenerator);
        assert_eq!(failure.state.phase(), Phase::Summarized);
        assert!(failure.state.interview_questions().is_none());
        assert_eq!(failure.state.messages().len(), 3);
    }

    #[tokio::test]
    async fn test_rerun_is_structurally_identical() {
        let first = run_pipeline(&happy_model(), SCENARIO_INPUT).await;
        let second = run_pipeline(
            &ScriptedModel::replying(&[
                BREAKDOWN_JSON,
                "A different wording of the summary for the Senior Backend Engineer.",
                "Why Go?\nWhat is consensus?",
            ]),
            SCENARIO_INPUT,
        )
        .await;

        assert_structurally_valid(&first);
        assert_structurally_valid(&second);
        let (first, second) = (first.unwrap(), second.unwrap());
        assert_eq!(first.phase(), second.phase());
        assert_eq!(first.messages().len(), second.messages().len());
        assert_ne!(first.job_summary(), second.job_summary());
    }

    #[tokio::test]
    async fn test_message_log_never_shrinks_across_stages() {
        let model = happy_model();
        let mut state = PipelineState::seeded(SCENARIO_INPUT);
        let mut previous = state.messages().to_vec();

        for stage in [Stage::Extractor, Stage::Summarizer, Stage::QuestionGenerator] {
            state = stage.run(&model, &state).await.unwrap();
            assert!(state.messages().len() > previous.len());
            assert_eq!(&state.messages()[..previous.len()], previous.as_slice());
            previous = state.messages().to_vec();
        }
    }

    #[test]
    fn test_stage_display_and_serde_names() {
        assert_eq!(Stage::QuestionGenerator.to_string(), "question generator");
        assert_eq!(
            serde_json::to_string(&Stage::QuestionGenerator).unwrap(),
            r#""question_generator""#
        );
    }
}
