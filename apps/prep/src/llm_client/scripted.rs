//! Scripted `ChatModel` for deterministic, network-free tests.
//!
//! Replays canned replies in order and records every request it receives.
//! Replies for calls that request a shape go through `OutputShape::decode`,
//! so decoding behaves exactly as it does against the real API.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{ChatModel, Completion, LlmError, OutputShape};
use crate::models::turn::Turn;

/// A single request observed by the scripted model.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub turns: Vec<Turn>,
    pub shape: Option<&'static str>,
}

pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call succeeds with the given texts, in order.
    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

/// A stand-in transport failure.
pub fn overloaded() -> LlmError {
    LlmError::Api {
        status: 529,
        message: "Overloaded".to_string(),
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        turns: &[Turn],
        shape: Option<&OutputShape>,
    ) -> Result<Completion, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            turns: turns.to_vec(),
            shape: shape.map(|s| s.name),
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))?;

        match shape {
            Some(shape) => shape.decode(&reply).map(Completion::Structured),
            None => Ok(Completion::Text(reply)),
        }
    }
}
