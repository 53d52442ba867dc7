use std::fmt;
use std::mem;

use chrono::{DateTime, TimeDelta, Utc};
use quiz_core::Clock;
use quiz_core::model::{
    DifficultyLevel, GeneratedQuiz, OptionId, QuestionCount, QuestionId, Question, QuizRequest,
    QuizResult, SessionId, TopicId,
};

use super::progress::SessionProgress;
use super::state::{
    Advance, Attempt, Disposition, FailedStage, Failure, RequestTicket, SessionPhase,
    SessionState,
};
use crate::error::{ApiError, SessionError};

/// One quiz attempt, from the generation request to the scored result.
///
/// The session never performs I/O itself. Starting and submitting hand out a
/// [`RequestTicket`]; the caller performs the request and feeds the outcome
/// back with the same ticket. Outcomes carrying a stale ticket are dropped.
pub struct QuizSession {
    id: SessionId,
    generation: u64,
    state: SessionState,
    clock: Clock,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            id: SessionId::random(),
            generation: 0,
            state: SessionState::Idle,
            clock,
            started_at: None,
            finished_at: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Time between the quiz arriving and its result, once completed.
    #[must_use]
    pub fn elapsed(&self) -> Option<TimeDelta> {
        Some(self.finished_at? - self.started_at?)
    }

    //
    // ─── START ──────────────────────────────────────────────────────────────────
    //

    /// Validates the selection and moves to `Initializing`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Validation` when no topic is selected (state is
    /// left untouched) and `SessionError::Busy` unless the session is idle,
    /// completed or failed.
    pub fn begin_start(
        &mut self,
        topic_ids: impl IntoIterator<Item = TopicId>,
        difficulty: DifficultyLevel,
        count: QuestionCount,
    ) -> Result<(RequestTicket, QuizRequest), SessionError> {
        self.ensure_can_start()?;
        let request = QuizRequest::new(topic_ids, difficulty, count)?;
        self.begin_request(request)
    }

    /// Same as [`begin_start`](Self::begin_start) for an already built request.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` unless the session is idle, completed or failed.
    pub fn begin_request(
        &mut self,
        request: QuizRequest,
    ) -> Result<(RequestTicket, QuizRequest), SessionError> {
        self.ensure_can_start()?;
        let ticket = self.issue_ticket();
        self.started_at = None;
        self.finished_at = None;
        self.state = SessionState::Initializing {
            request: request.clone(),
        };
        tracing::info!(
            session = %self.id,
            topics = request.topic_ids().len(),
            difficulty = %request.difficulty_level(),
            count = request.question_count().get(),
            "requesting quiz"
        );
        Ok((ticket, request))
    }

    /// Installs the generation outcome.
    pub fn finish_start(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<GeneratedQuiz, ApiError>,
    ) -> Disposition {
        if !self.accepts(ticket, SessionPhase::Initializing) {
            return Disposition::Discarded;
        }

        let quiz = outcome.and_then(|quiz| match quiz.validate() {
            Ok(()) => Ok(quiz),
            Err(err) => {
                tracing::warn!(session = %self.id, error = %err, "backend returned an unusable quiz");
                Err(ApiError::Decode(err.to_string()))
            }
        });

        match quiz {
            Ok(quiz) => {
                tracing::info!(session = %self.id, questions = quiz.len(), "quiz ready");
                self.started_at = Some(self.clock.now());
                self.state = SessionState::InProgress(Attempt::new(quiz));
            }
            Err(err) => self.fail(FailedStage::Generation, &err, None),
        }
        Disposition::Applied
    }

    //
    // ─── ANSWERING ──────────────────────────────────────────────────────────────
    //

    /// Records `option` for `question`, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `InProgress`, and
    /// `UnknownQuestion`/`UnknownOption` for ids not in the quiz.
    pub fn select_answer(
        &mut self,
        question: QuestionId,
        option: OptionId,
    ) -> Result<(), SessionError> {
        let phase = self.phase();
        let SessionState::InProgress(attempt) = &mut self.state else {
            return Err(SessionError::InvalidState(phase));
        };
        let entry = attempt
            .quiz
            .question(question)
            .ok_or(SessionError::UnknownQuestion(question))?;
        if !entry.has_option(option) {
            return Err(SessionError::UnknownOption { question, option });
        }
        attempt.answers.select(question, option);
        Ok(())
    }

    /// Moves to the next question, or on the last question checks that every
    /// question is answered and moves to `Submitting`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `InProgress` and
    /// `SessionError::Incomplete` (state unchanged) when answers are missing.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let phase = self.phase();
        let SessionState::InProgress(attempt) = &mut self.state else {
            return Err(SessionError::InvalidState(phase));
        };

        if !attempt.is_last() {
            attempt.current += 1;
            return Ok(Advance::Moved {
                index: attempt.current,
            });
        }

        let payload = attempt.payload();
        if !payload.is_complete() {
            return Err(SessionError::Incomplete {
                unanswered: payload.unanswered(),
            });
        }

        let ticket = self.issue_ticket();
        if let SessionState::InProgress(attempt) = mem::replace(&mut self.state, SessionState::Idle)
        {
            self.state = SessionState::Submitting(attempt);
        }
        tracing::info!(session = %self.id, answers = payload.answers.len(), "submitting quiz");
        Ok(Advance::Submit { ticket, payload })
    }

    /// Steps back one question. A no-op on the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `InProgress`.
    pub fn retreat(&mut self) -> Result<(), SessionError> {
        let phase = self.phase();
        let SessionState::InProgress(attempt) = &mut self.state else {
            return Err(SessionError::InvalidState(phase));
        };
        attempt.current = attempt.current.saturating_sub(1);
        Ok(())
    }

    //
    // ─── SUBMISSION ─────────────────────────────────────────────────────────────
    //

    /// Installs the submission outcome. On failure the answers are kept so the
    /// caller can [`resume`](Self::resume) and submit again.
    pub fn finish_submit(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<QuizResult, ApiError>,
    ) -> Disposition {
        if !self.accepts(ticket, SessionPhase::Submitting) {
            return Disposition::Discarded;
        }
        let SessionState::Submitting(attempt) = mem::replace(&mut self.state, SessionState::Idle)
        else {
            return Disposition::Discarded;
        };

        match outcome {
            Ok(result) => {
                tracing::info!(
                    session = %self.id,
                    score = result.score,
                    total = result.total_questions,
                    "quiz completed"
                );
                self.finished_at = Some(self.clock.now());
                self.state = SessionState::Completed {
                    quiz: attempt.quiz,
                    result,
                };
            }
            Err(err) => self.fail(FailedStage::Submission, &err, Some(attempt)),
        }
        Disposition::Applied
    }

    /// Returns a failed submission to `InProgress` with its answers intact.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session failed during
    /// submission.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        match mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Failed {
                resume: Some(attempt),
                ..
            } => {
                self.state = SessionState::InProgress(attempt);
                Ok(())
            }
            other => {
                let phase = other.phase();
                self.state = other;
                Err(SessionError::InvalidState(phase))
            }
        }
    }

    /// Drops the current quiz. Responses still in flight are discarded when
    /// they arrive.
    pub fn abandon(&mut self) {
        self.generation += 1;
        self.state = SessionState::Idle;
        self.started_at = None;
        self.finished_at = None;
        tracing::debug!(session = %self.id, "session abandoned");
    }

    //
    // ─── READS ──────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn attempt(&self) -> Option<&Attempt> {
        match &self.state {
            SessionState::InProgress(attempt) | SessionState::Submitting(attempt) => Some(attempt),
            _ => None,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&GeneratedQuiz> {
        match &self.state {
            SessionState::InProgress(attempt) | SessionState::Submitting(attempt) => {
                Some(&attempt.quiz)
            }
            SessionState::Completed { quiz, .. } => Some(quiz),
            SessionState::Failed {
                resume: Some(attempt),
                ..
            } => Some(&attempt.quiz),
            _ => None,
        }
    }

    /// Question on screen; only while `InProgress`.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            SessionState::InProgress(attempt) => attempt.quiz.questions.get(attempt.current),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match &self.state {
            SessionState::InProgress(attempt) => Some(attempt.current),
            _ => None,
        }
    }

    #[must_use]
    pub fn selected_option(&self, question: QuestionId) -> Option<OptionId> {
        self.attempt().and_then(|attempt| attempt.answers.get(question))
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.attempt().map_or(0, |attempt| attempt.answers.len())
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        match &self.state {
            SessionState::InProgress(attempt) => Some(SessionProgress {
                index: attempt.current,
                total: attempt.quiz.len(),
                answered: attempt.answers.len(),
                is_last: attempt.is_last(),
            }),
            _ => None,
        }
    }

    /// `(current_index + 1) / total_questions`; only while `InProgress`.
    #[must_use]
    pub fn progress_fraction(&self) -> Option<f64> {
        self.progress().map(|progress| progress.fraction())
    }

    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match &self.state {
            SessionState::Failed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.failure().map(|failure| failure.message.as_str())
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        match &self.state {
            SessionState::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    //
    // ─── INTERNALS ──────────────────────────────────────────────────────────────
    //

    fn ensure_can_start(&self) -> Result<(), SessionError> {
        if self.phase().can_start() {
            Ok(())
        } else {
            Err(SessionError::Busy)
        }
    }

    fn issue_ticket(&mut self) -> RequestTicket {
        self.generation += 1;
        RequestTicket {
            session: self.id,
            generation: self.generation,
        }
    }

    fn accepts(&self, ticket: RequestTicket, expected: SessionPhase) -> bool {
        let live = ticket.session == self.id && ticket.generation == self.generation;
        if !live || self.phase() != expected {
            tracing::debug!(
                session = %self.id,
                ticket_session = %ticket.session,
                ticket_generation = ticket.generation,
                generation = self.generation,
                "discarding stale response"
            );
            return false;
        }
        true
    }

    fn fail(&mut self, stage: FailedStage, err: &ApiError, resume: Option<Attempt>) {
        let message = err
            .server_message()
            .unwrap_or_else(|| stage.fallback_message())
            .to_owned();
        tracing::warn!(session = %self.id, ?stage, error = %err, "quiz request failed");
        self.state = SessionState::Failed {
            failure: Failure {
                stage,
                message,
                retryable: err.is_retryable(),
            },
            resume,
        };
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("phase", &self.phase())
            .field("current", &self.current_index())
            .field("started_at", &self.started_at)
            .field("finished_at", &self.finished_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOption, QuizId};
    use quiz_core::time::{fixed_clock, fixed_now};
    use reqwest::StatusCode;

    fn quiz(n: u64) -> GeneratedQuiz {
        GeneratedQuiz {
            quiz_id: QuizId::new("quiz-7"),
            topic_names: vec!["Java".into()],
            difficulty_level: DifficultyLevel::Moderate,
            questions: (1..=n)
                .map(|id| Question {
                    question_id: QuestionId::new(id),
                    text: format!("Question {id}"),
                    topic_name: None,
                    options: (0..4)
                        .map(|o| AnswerOption {
                            option_id: OptionId::new(id * 10 + o),
                            text: format!("Option {o}"),
                        })
                        .collect(),
                })
                .collect(),
            total_questions: n as usize,
        }
    }

    fn result(total: u32) -> QuizResult {
        QuizResult {
            attempt_id: None,
            score: total,
            total_questions: total,
            correct_answers: total,
            wrong_answers: 0,
            percentage: 100.0,
            topic_names: vec!["Java".into()],
            difficulty_level: DifficultyLevel::Moderate,
            question_reviews: Vec::new(),
            email_sent: None,
        }
    }

    fn bad_request(message: &str) -> ApiError {
        ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: Some(message.into()),
        }
    }

    fn started(n: u64) -> QuizSession {
        let mut session = QuizSession::new(fixed_clock());
        let (ticket, _) = session
            .begin_start([TopicId::new(1)], DifficultyLevel::Moderate, QuestionCount::default())
            .unwrap();
        assert_eq!(session.finish_start(ticket, Ok(quiz(n))), Disposition::Applied);
        session
    }

    fn answer_all(session: &mut QuizSession, n: u64) {
        for id in 1..=n {
            session
                .select_answer(QuestionId::new(id), OptionId::new(id * 10))
                .unwrap();
        }
    }

    fn go_to_last(session: &mut QuizSession, n: u64) {
        for _ in 1..n {
            assert!(matches!(session.advance().unwrap(), Advance::Moved { .. }));
        }
    }

    #[test]
    fn empty_topics_fail_validation_without_leaving_idle() {
        let mut session = QuizSession::new(fixed_clock());
        let err = session
            .begin_start(Vec::<TopicId>::new(), DifficultyLevel::Beginner, QuestionCount::default())
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn start_installs_quiz_at_first_question() {
        let session = started(3);
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(session.current_question().unwrap().question_id, QuestionId::new(1));
        assert_eq!(session.started_at(), Some(fixed_now()));
        assert_eq!(session.attempt().unwrap().answers().len(), 0);
    }

    #[test]
    fn start_while_busy_is_rejected() {
        let mut session = QuizSession::new(fixed_clock());
        session
            .begin_start([TopicId::new(1)], DifficultyLevel::Expert, QuestionCount::default())
            .unwrap();
        let err = session
            .begin_start([TopicId::new(2)], DifficultyLevel::Expert, QuestionCount::default())
            .unwrap_err();
        assert!(matches!(err, SessionError::Busy));

        let mut running = started(2);
        assert!(matches!(
            running.begin_start([TopicId::new(1)], DifficultyLevel::Expert, QuestionCount::default()),
            Err(SessionError::Busy)
        ));
    }

    #[test]
    fn generation_error_keeps_backend_message() {
        let mut session = QuizSession::new(fixed_clock());
        let (ticket, _) = session
            .begin_start([TopicId::new(1)], DifficultyLevel::Expert, QuestionCount::default())
            .unwrap();
        session.finish_start(ticket, Err(bad_request("No questions available")));

        assert_eq!(session.phase(), SessionPhase::Failed);
        assert_eq!(session.error_message(), Some("No questions available"));
        assert!(session.result().is_none());
        assert_eq!(session.failure().unwrap().stage, FailedStage::Generation);
    }

    #[test]
    fn generation_error_without_message_uses_fallback() {
        let mut session = QuizSession::new(fixed_clock());
        let (ticket, _) = session
            .begin_start([TopicId::new(1)], DifficultyLevel::Expert, QuestionCount::default())
            .unwrap();
        session.finish_start(
            ticket,
            Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: None,
            }),
        );
        let failure = session.failure().unwrap();
        assert_eq!(failure.message, "Failed to load quiz questions");
        assert!(failure.retryable);
    }

    #[test]
    fn malformed_quiz_fails_the_start() {
        let mut session = QuizSession::new(fixed_clock());
        let (ticket, _) = session
            .begin_start([TopicId::new(1)], DifficultyLevel::Expert, QuestionCount::default())
            .unwrap();
        let mut broken = quiz(2);
        broken.total_questions = 5;
        session.finish_start(ticket, Ok(broken));
        assert_eq!(session.phase(), SessionPhase::Failed);
    }

    #[test]
    fn advancing_through_questions_never_submits() {
        let mut session = started(5);
        for expected in 1..5 {
            assert_eq!(session.advance().unwrap(), Advance::Moved { index: expected });
        }
        assert_eq!(session.current_index(), Some(4));
        assert_eq!(session.phase(), SessionPhase::InProgress);
    }

    #[test]
    fn incomplete_answers_block_submission() {
        let mut session = started(3);
        session
            .select_answer(QuestionId::new(1), OptionId::new(10))
            .unwrap();
        go_to_last(&mut session, 3);

        let err = session.advance().unwrap_err();
        match err {
            SessionError::Incomplete { unanswered } => {
                assert_eq!(unanswered, vec![QuestionId::new(2), QuestionId::new(3)]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.current_index(), Some(2));
    }

    #[test]
    fn payload_uses_quiz_order_not_answer_order() {
        let mut session = started(3);
        session.select_answer(QuestionId::new(3), OptionId::new(31)).unwrap();
        session.select_answer(QuestionId::new(1), OptionId::new(12)).unwrap();
        session.select_answer(QuestionId::new(2), OptionId::new(20)).unwrap();
        go_to_last(&mut session, 3);

        let Advance::Submit { payload, .. } = session.advance().unwrap() else {
            panic!("expected submission");
        };
        let order: Vec<_> = payload.answers.iter().map(|a| a.question_id).collect();
        assert_eq!(
            order,
            vec![QuestionId::new(1), QuestionId::new(2), QuestionId::new(3)]
        );
        assert_eq!(payload.answers[2].selected_option_id, Some(OptionId::new(31)));
        assert_eq!(session.phase(), SessionPhase::Submitting);
    }

    #[test]
    fn reselecting_overwrites_and_keeps_position() {
        let mut session = started(2);
        session.select_answer(QuestionId::new(1), OptionId::new(10)).unwrap();
        session.select_answer(QuestionId::new(1), OptionId::new(11)).unwrap();
        session.select_answer(QuestionId::new(1), OptionId::new(11)).unwrap();
        assert_eq!(session.selected_option(QuestionId::new(1)), Some(OptionId::new(11)));
        assert_eq!(session.answered_count(), 1);
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut session = started(2);
        assert!(matches!(
            session.select_answer(QuestionId::new(99), OptionId::new(10)),
            Err(SessionError::UnknownQuestion(_))
        ));
        assert!(matches!(
            session.select_answer(QuestionId::new(1), OptionId::new(20)),
            Err(SessionError::UnknownOption { .. })
        ));
    }

    #[test]
    fn retreat_at_first_question_is_a_no_op() {
        let mut session = started(3);
        session.retreat().unwrap();
        assert_eq!(session.current_index(), Some(0));

        session.advance().unwrap();
        session.retreat().unwrap();
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn operations_outside_in_progress_are_rejected() {
        let mut session = QuizSession::new(fixed_clock());
        assert!(matches!(
            session.advance(),
            Err(SessionError::InvalidState(SessionPhase::Idle))
        ));
        assert!(matches!(
            session.retreat(),
            Err(SessionError::InvalidState(SessionPhase::Idle))
        ));
        assert!(session.progress_fraction().is_none());
    }

    #[test]
    fn progress_fraction_tracks_position() {
        let mut session = started(4);
        assert_eq!(session.progress_fraction(), Some(0.25));
        go_to_last(&mut session, 4);
        assert_eq!(session.progress_fraction(), Some(1.0));
    }

    #[test]
    fn successful_submission_completes_with_result_unchanged() {
        let mut session = started(2);
        answer_all(&mut session, 2);
        go_to_last(&mut session, 2);
        let Advance::Submit { ticket, .. } = session.advance().unwrap() else {
            panic!("expected submission");
        };

        let expected = result(2);
        assert_eq!(
            session.finish_submit(ticket, Ok(expected.clone())),
            Disposition::Applied
        );
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.result(), Some(&expected));
        assert!(session.error_message().is_none());
        assert_eq!(session.finished_at(), Some(fixed_now()));
        assert_eq!(session.elapsed(), Some(TimeDelta::zero()));
    }

    #[test]
    fn failed_submission_can_resume_and_resubmit() {
        let mut session = started(2);
        answer_all(&mut session, 2);
        go_to_last(&mut session, 2);
        let Advance::Submit { ticket, .. } = session.advance().unwrap() else {
            panic!("expected submission");
        };
        session.finish_submit(ticket, Err(bad_request("Quiz expired")));
        assert_eq!(session.phase(), SessionPhase::Failed);
        assert_eq!(session.error_message(), Some("Quiz expired"));

        session.resume().unwrap();
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.current_index(), Some(1));
        assert_eq!(session.selected_option(QuestionId::new(2)), Some(OptionId::new(20)));
        assert!(matches!(session.advance().unwrap(), Advance::Submit { .. }));
    }

    #[test]
    fn failed_generation_cannot_resume_but_can_restart() {
        let mut session = QuizSession::new(fixed_clock());
        let (ticket, _) = session
            .begin_start([TopicId::new(1)], DifficultyLevel::Expert, QuestionCount::default())
            .unwrap();
        session.finish_start(ticket, Err(bad_request("nope")));

        assert!(matches!(
            session.resume(),
            Err(SessionError::InvalidState(SessionPhase::Failed))
        ));
        assert_eq!(session.phase(), SessionPhase::Failed);
        assert!(
            session
                .begin_start([TopicId::new(1)], DifficultyLevel::Expert, QuestionCount::default())
                .is_ok()
        );
    }

    #[test]
    fn stale_generation_response_is_discarded() {
        let mut session = QuizSession::new(fixed_clock());
        let (old_ticket, _) = session
            .begin_start([TopicId::new(1)], DifficultyLevel::Expert, QuestionCount::default())
            .unwrap();
        session.abandon();
        let (ticket, _) = session
            .begin_start([TopicId::new(2)], DifficultyLevel::Expert, QuestionCount::default())
            .unwrap();

        assert_eq!(session.finish_start(old_ticket, Ok(quiz(3))), Disposition::Discarded);
        assert_eq!(session.phase(), SessionPhase::Initializing);

        assert_eq!(session.finish_start(ticket, Ok(quiz(2))), Disposition::Applied);
        assert_eq!(session.attempt().unwrap().quiz().len(), 2);
    }

    #[test]
    fn responses_for_another_session_are_discarded() {
        let mut first = QuizSession::new(fixed_clock());
        let (ticket, _) = first
            .begin_start([TopicId::new(1)], DifficultyLevel::Expert, QuestionCount::default())
            .unwrap();

        let mut second = QuizSession::new(fixed_clock());
        second
            .begin_start([TopicId::new(1)], DifficultyLevel::Expert, QuestionCount::default())
            .unwrap();

        assert_eq!(second.finish_start(ticket, Ok(quiz(1))), Disposition::Discarded);
        assert_eq!(second.phase(), SessionPhase::Initializing);
    }

    #[test]
    fn late_submission_result_after_abandon_is_dropped() {
        let mut session = started(1);
        answer_all(&mut session, 1);
        let Advance::Submit { ticket, .. } = session.advance().unwrap() else {
            panic!("expected submission");
        };
        session.abandon();
        assert_eq!(session.finish_submit(ticket, Ok(result(1))), Disposition::Discarded);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.result().is_none());
    }
}
