use std::fmt;

use quiz_core::model::{
    AnswerMap, GeneratedQuiz, QuizRequest, QuizResult, SessionId, SubmissionPayload,
};

/// Quiz being answered: the questions, the position and the selections.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub(crate) quiz: GeneratedQuiz,
    pub(crate) current: usize,
    pub(crate) answers: AnswerMap,
}

impl Attempt {
    pub(crate) fn new(quiz: GeneratedQuiz) -> Self {
        Self {
            quiz,
            current: 0,
            answers: AnswerMap::new(),
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &GeneratedQuiz {
        &self.quiz
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.quiz.len()
    }

    #[must_use]
    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload::from_answers(&self.quiz, &self.answers)
    }
}

/// Which request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Generation,
    Submission,
}

impl FailedStage {
    pub(crate) fn fallback_message(self) -> &'static str {
        match self {
            FailedStage::Generation => "Failed to load quiz questions",
            FailedStage::Submission => "Quiz submission failed",
        }
    }
}

/// A failed generation or submission, as surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub stage: FailedStage,
    /// Backend message when one was sent, otherwise a generic fallback.
    pub message: String,
    pub retryable: bool,
}

/// Lifecycle of one quiz session. Each variant carries only the data valid in it.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Fresh session, nothing requested yet.
    Idle,
    Initializing {
        request: QuizRequest,
    },
    InProgress(Attempt),
    Submitting(Attempt),
    Completed {
        quiz: GeneratedQuiz,
        result: QuizResult,
    },
    Failed {
        failure: Failure,
        /// Answers kept from a failed submission so it can be re-issued.
        resume: Option<Attempt>,
    },
}

impl SessionState {
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Initializing { .. } => SessionPhase::Initializing,
            SessionState::InProgress(_) => SessionPhase::InProgress,
            SessionState::Submitting(_) => SessionPhase::Submitting,
            SessionState::Completed { .. } => SessionPhase::Completed,
            SessionState::Failed { .. } => SessionPhase::Failed,
        }
    }
}

/// Tag of [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Initializing,
    InProgress,
    Submitting,
    Completed,
    Failed,
}

impl SessionPhase {
    /// A new quiz may be started from this phase.
    #[must_use]
    pub fn can_start(self) -> bool {
        matches!(
            self,
            SessionPhase::Idle | SessionPhase::Completed | SessionPhase::Failed
        )
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Initializing => "initializing",
            SessionPhase::InProgress => "in progress",
            SessionPhase::Submitting => "submitting",
            SessionPhase::Completed => "completed",
            SessionPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tag carried by an in-flight request. A response is applied only if its
/// ticket still matches the live session and request generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub(crate) session: SessionId,
    pub(crate) generation: u64,
}

/// Whether a response was installed or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Applied,
    Discarded,
}

/// Outcome of [`QuizSession::advance`](super::QuizSession::advance).
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Moved { index: usize },
    /// The last question was confirmed; the payload must be sent with the ticket.
    Submit {
        ticket: RequestTicket,
        payload: SubmissionPayload,
    },
}
