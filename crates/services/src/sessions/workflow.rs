use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::Clock;
use quiz_core::model::{DifficultyLevel, QuestionCount, QuizRequest, TopicId};

use super::service::QuizSession;
use super::state::{Advance, Disposition, RequestTicket};
use crate::api::QuizApi;
use crate::error::{ApiError, SessionError};

/// Result of one [`QuizSessionLoop::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved { index: usize },
    /// The quiz was submitted and scored; the result is on the session.
    Completed,
}

/// Runs the network side of a [`QuizSession`]: generation, submission and
/// their timeouts.
#[derive(Clone)]
pub struct QuizSessionLoop {
    api: Arc<dyn QuizApi>,
    request_timeout: Duration,
    clock: Clock,
}

impl QuizSessionLoop {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>, request_timeout: Duration) -> Self {
        Self {
            api,
            request_timeout,
            clock: Clock::default(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn api(&self) -> &Arc<dyn QuizApi> {
        &self.api
    }

    #[must_use]
    pub fn new_session(&self) -> QuizSession {
        QuizSession::new(self.clock)
    }

    /// Requests a quiz and installs it on `session`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Validation` or `SessionError::Busy` without
    /// issuing a request, and `SessionError::Request` when generation failed
    /// (the session is then `Failed`).
    pub async fn start(
        &self,
        session: &mut QuizSession,
        topic_ids: impl IntoIterator<Item = TopicId>,
        difficulty: DifficultyLevel,
        count: QuestionCount,
    ) -> Result<(), SessionError> {
        let (ticket, request) = session.begin_start(topic_ids, difficulty, count)?;
        self.run_start(session, ticket, request).await
    }

    /// Same as [`start`](Self::start) for a request built elsewhere.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start).
    pub async fn start_request(
        &self,
        session: &mut QuizSession,
        request: QuizRequest,
    ) -> Result<(), SessionError> {
        let (ticket, request) = session.begin_request(request)?;
        self.run_start(session, ticket, request).await
    }

    /// Moves to the next question, submitting when the last one is confirmed.
    ///
    /// # Errors
    ///
    /// Returns the session's own rejection (`Incomplete`, `InvalidState`) and
    /// `SessionError::Request` when the submission failed.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<StepOutcome, SessionError> {
        match session.advance()? {
            Advance::Moved { index } => Ok(StepOutcome::Moved { index }),
            Advance::Submit { ticket, payload } => {
                let outcome = self.bounded(self.api.submit_quiz(&payload)).await;
                if session.finish_submit(ticket, outcome) == Disposition::Discarded {
                    return Err(SessionError::InvalidState(session.phase()));
                }
                match session.failure() {
                    Some(failure) => Err(SessionError::Request(failure.clone())),
                    None => Ok(StepOutcome::Completed),
                }
            }
        }
    }

    /// Re-sends a submission that failed, with the answers it had.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` when there is nothing to retry,
    /// otherwise as [`advance`](Self::advance).
    pub async fn retry_submission(
        &self,
        session: &mut QuizSession,
    ) -> Result<StepOutcome, SessionError> {
        session.resume()?;
        tracing::info!(session = %session.id(), "retrying submission");
        self.advance(session).await
    }

    async fn run_start(
        &self,
        session: &mut QuizSession,
        ticket: RequestTicket,
        request: QuizRequest,
    ) -> Result<(), SessionError> {
        let outcome = self.bounded(self.api.generate_quiz(&request)).await;
        if session.finish_start(ticket, outcome) == Disposition::Discarded {
            return Err(SessionError::InvalidState(session.phase()));
        }
        match session.failure() {
            Some(failure) => Err(SessionError::Request(failure.clone())),
            None => Ok(()),
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(timeout = ?self.request_timeout, "quiz request timed out");
                Err(ApiError::Timeout(self.request_timeout))
            }
        }
    }
}

impl std::fmt::Debug for QuizSessionLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSessionLoop")
            .field("request_timeout", &self.request_timeout)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
