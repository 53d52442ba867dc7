use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use quiz_core::model::{
    AttemptId, AttemptSummary, GeneratedQuiz, QuizRequest, QuizResult, SubmissionPayload,
    TopicSummary,
};

use super::QuizApi;
use crate::error::ApiError;

/// A request observed by [`ScriptedQuizApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Generate(QuizRequest),
    Submit(SubmissionPayload),
    ListTopics,
    History,
    AttemptResult(AttemptId),
    SendResultEmail(String),
}

type Reply<T> = Result<T, ApiError>;

#[derive(Default)]
struct Script {
    generate: VecDeque<Reply<GeneratedQuiz>>,
    submit: VecDeque<Reply<QuizResult>>,
    topics: VecDeque<Reply<Vec<TopicSummary>>>,
    history: VecDeque<Reply<Vec<AttemptSummary>>>,
    results: VecDeque<Reply<QuizResult>>,
    emails: VecDeque<Reply<String>>,
    calls: Vec<ApiCall>,
}

/// In-memory `QuizApi` that replays queued replies and records every call.
///
/// An endpoint with nothing queued answers `503` without a message.
#[derive(Default)]
pub struct ScriptedQuizApi {
    script: Mutex<Script>,
    delay: Option<Duration>,
}

impl ScriptedQuizApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push_generate(&self, reply: Reply<GeneratedQuiz>) {
        self.script().generate.push_back(reply);
    }

    pub fn push_submit(&self, reply: Reply<QuizResult>) {
        self.script().submit.push_back(reply);
    }

    pub fn push_topics(&self, reply: Reply<Vec<TopicSummary>>) {
        self.script().topics.push_back(reply);
    }

    pub fn push_history(&self, reply: Reply<Vec<AttemptSummary>>) {
        self.script().history.push_back(reply);
    }

    pub fn push_attempt_result(&self, reply: Reply<QuizResult>) {
        self.script().results.push_back(reply);
    }

    pub fn push_email(&self, reply: Reply<String>) {
        self.script().emails.push_back(reply);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.script().calls.clone()
    }

    #[must_use]
    pub fn submissions(&self) -> Vec<SubmissionPayload> {
        self.script()
            .calls
            .iter()
            .filter_map(|call| match call {
                ApiCall::Submit(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    async fn answer<T>(
        &self,
        call: ApiCall,
        pick: impl FnOnce(&mut Script) -> Option<Reply<T>>,
    ) -> Reply<T> {
        let reply = {
            let mut script = self.script();
            script.calls.push(call);
            pick(&mut script)
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        reply.unwrap_or(Err(ApiError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: None,
        }))
    }
}

#[async_trait]
impl QuizApi for ScriptedQuizApi {
    async fn generate_quiz(&self, request: &QuizRequest) -> Result<GeneratedQuiz, ApiError> {
        self.answer(ApiCall::Generate(request.clone()), |s| s.generate.pop_front())
            .await
    }

    async fn submit_quiz(&self, payload: &SubmissionPayload) -> Result<QuizResult, ApiError> {
        self.answer(ApiCall::Submit(payload.clone()), |s| s.submit.pop_front())
            .await
    }

    async fn list_topics(&self) -> Result<Vec<TopicSummary>, ApiError> {
        self.answer(ApiCall::ListTopics, |s| s.topics.pop_front()).await
    }

    async fn history(&self) -> Result<Vec<AttemptSummary>, ApiError> {
        self.answer(ApiCall::History, |s| s.history.pop_front()).await
    }

    async fn attempt_result(&self, attempt_id: AttemptId) -> Result<QuizResult, ApiError> {
        self.answer(ApiCall::AttemptResult(attempt_id), |s| s.results.pop_front())
            .await
    }

    async fn send_result_email(
        &self,
        email: &str,
        _result: &QuizResult,
    ) -> Result<String, ApiError> {
        self.answer(ApiCall::SendResultEmail(email.to_owned()), |s| {
            s.emails.pop_front()
        })
        .await
    }
}
