//! Boundary to the quiz backend.

mod admin;
mod http;
mod memory;

use async_trait::async_trait;

use quiz_core::model::{
    AttemptId, AttemptSummary, GeneratedQuiz, QuizRequest, QuizResult, SubmissionPayload,
    TopicSummary,
};

use crate::error::ApiError;

pub use admin::{AdminApi, HttpAdminApi};
pub(crate) use http::ApiMessage;
pub use http::{HttpQuizApi, RestClient};
pub use memory::{ApiCall, ScriptedQuizApi};

/// Quiz endpoints consumed by the client.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// `POST api/quiz/generate`
    async fn generate_quiz(&self, request: &QuizRequest) -> Result<GeneratedQuiz, ApiError>;

    /// `POST api/quiz/submit`
    async fn submit_quiz(&self, payload: &SubmissionPayload) -> Result<QuizResult, ApiError>;

    /// `GET api/quiz/topics`
    async fn list_topics(&self) -> Result<Vec<TopicSummary>, ApiError>;

    /// `GET api/quiz/history`
    async fn history(&self) -> Result<Vec<AttemptSummary>, ApiError>;

    /// `GET api/quiz/result/{attempt_id}`
    async fn attempt_result(&self, attempt_id: AttemptId) -> Result<QuizResult, ApiError>;

    /// `POST api/quiz/send-quiz-result?email=…`, returning the backend's message.
    async fn send_result_email(&self, email: &str, result: &QuizResult)
    -> Result<String, ApiError>;
}
