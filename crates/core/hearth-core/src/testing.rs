//! Testing utilities

use crate::responder::{AnswerRequest, AnswerService};
use crate::{HearthError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Semaphore;

/// Answer service that replays scripted results and records every request.
///
/// When built with [`ScriptedAnswerService::held`], calls block until
/// [`ScriptedAnswerService::release`] is called, which lets tests observe a
/// session while a response is pending.
pub struct ScriptedAnswerService {
    answers: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<AnswerRequest>>,
    gate: Option<Semaphore>,
}

impl ScriptedAnswerService {
    /// Replay `answers` in order; once exhausted every call fails
    pub fn new(answers: Vec<Result<String>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Like [`ScriptedAnswerService::new`], but calls wait for [`release`](Self::release)
    pub fn held(answers: Vec<Result<String>>) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(answers)
        }
    }

    /// Always fail, as if the service were unreachable
    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    /// Let `n` held calls proceed
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<AnswerRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AnswerService for ScriptedAnswerService {
    async fn generate(&self, request: AnswerRequest) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| HearthError::other(e.to_string()))?;
            permit.forget();
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or_else(|| Err(HearthError::model("service unavailable")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AnswerRequest {
        AnswerRequest {
            model: "test-model".into(),
            max_tokens: 10,
            prompt: "hi".into(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_replays_then_fails() {
        let service = ScriptedAnswerService::new(vec![Ok("one".into())]);
        assert_eq!(service.generate(request()).await.unwrap(), "one");
        assert!(service.generate(request()).await.is_err());
        assert_eq!(service.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_held_calls_wait_for_release() {
        let service = std::sync::Arc::new(ScriptedAnswerService::held(vec![Ok("late".into())]));
        let task = tokio::spawn({
            let service = service.clone();
            async move { service.generate(request()).await }
        });
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        service.release(1);
        assert_eq!(task.await.unwrap().unwrap(), "late");
    }
}
